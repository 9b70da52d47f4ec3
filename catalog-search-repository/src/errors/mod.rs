//! Error types for the catalog search repository.
//!
//! One error type per collaborator: the search index backend and the relational
//! record store.

mod record_store_error;
mod search_index_error;

pub use record_store_error::RecordStoreError;
pub use search_index_error::SearchIndexError;
