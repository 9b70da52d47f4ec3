//! Interface definitions for the search index and the record store.
//!
//! These traits allow for dependency injection and swappable backends: the
//! indexer only talks to a `SearchIndexProvider` and a `RecordStore`.

mod record_store;
mod search_index_provider;

pub use record_store::RecordStore;
pub use search_index_provider::SearchIndexProvider;
