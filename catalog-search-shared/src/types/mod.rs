//! This module defines the core data structures used across the catalog search indexer.
//! It re-exports the record, document and index kind types.

pub mod documents;
pub mod index_kind;
pub mod records;

pub use documents::{DataDocDocument, SearchDocument, TableDocument, UserDocument};
pub use index_kind::IndexKind;
pub use records::{DataCell, DataCellType, DataDoc, DataSchema, DataTable, User};
