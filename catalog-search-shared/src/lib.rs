//! # Catalog Search Shared
//!
//! This crate defines shared data structures used across the catalog search indexer.
//! It includes the relational source records (data docs, tables, users), the
//! denormalized documents stored in the search index, and the index kinds.

pub mod types;

pub use types::documents::{
    Completion, DataDocDocument, SearchDocument, TableCompletionContext, TableDocument,
    UserDocument,
};
pub use types::index_kind::IndexKind;
pub use types::records::{
    DataCell, DataCellType, DataDoc, DataSchema, DataTable, User,
};
