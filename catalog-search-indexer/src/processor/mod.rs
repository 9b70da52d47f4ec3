//! Processor module for the catalog search indexer.
//!
//! Projects source records into search documents. Every projection is a pure
//! function of the record: the same record always yields the same document.

mod datadoc;
mod names;
mod table;
mod text;
mod user;

pub use datadoc::{project_data_doc, UNPARSABLE_CELL_PLACEHOLDER};
pub use names::tokenize_names;
pub use table::project_table;
pub use text::{escape_html, flatten_rich_text};
pub use user::project_user;

use async_trait::async_trait;

use catalog_search_repository::{RecordStore, RecordStoreError};
use catalog_search_shared::{IndexKind, SearchDocument};

/// A source record that has a search index of its own.
///
/// Ties each record type to its index kind, its projection and the record store
/// queries that load it, so paging, syncing and bootstrapping can be written once.
#[async_trait]
pub trait Indexable: Sized + Send + Sync + 'static {
    /// Document stored in the index for this record.
    type Document: SearchDocument + Send + Sync;

    /// Index holding this kind of record.
    fn kind() -> IndexKind;

    /// Source record ID, also the document ID.
    fn id(&self) -> i64;

    /// Whether the record should be searchable (exists and is not soft-deleted).
    fn is_live(&self) -> bool;

    /// Project the record into its search document.
    fn project(&self) -> Self::Document;

    /// Load one page of records.
    async fn fetch_page(
        store: &dyn RecordStore,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, RecordStoreError>;

    /// Load a single record, soft-deleted or not.
    async fn fetch_by_id(store: &dyn RecordStore, id: i64)
        -> Result<Option<Self>, RecordStoreError>;
}
