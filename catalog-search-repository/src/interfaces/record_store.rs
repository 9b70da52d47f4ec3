use async_trait::async_trait;

use catalog_search_shared::{DataDoc, DataTable, User};

use crate::errors::RecordStoreError;

/// Trait for reading source records from the relational store.
///
/// Paginated queries return at most `limit` records starting at `offset`, ordered by
/// ID, and leave out soft-deleted records. Lookups by ID return soft-deleted records
/// as-is so callers can tell "archived" from "gone".
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_data_docs(&self, limit: i64, offset: i64)
        -> Result<Vec<DataDoc>, RecordStoreError>;
    async fn get_data_doc_by_id(&self, id: i64) -> Result<Option<DataDoc>, RecordStoreError>;

    async fn get_tables(&self, limit: i64, offset: i64)
        -> Result<Vec<DataTable>, RecordStoreError>;
    async fn get_table_by_id(&self, id: i64) -> Result<Option<DataTable>, RecordStoreError>;

    async fn get_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, RecordStoreError>;
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, RecordStoreError>;
}
