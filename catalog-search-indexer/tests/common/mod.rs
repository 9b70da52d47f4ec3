//! In-memory collaborators shared by the integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

use catalog_search_indexer::loader::{LoaderConfig, SearchSync};
use catalog_search_repository::{
    IndexConfig, RecordStore, RecordStoreError, SearchIndexError, SearchIndexProvider,
    SearchIndicesConfig,
};
use catalog_search_shared::{DataCell, DataCellType, DataDoc, DataSchema, DataTable, User};

/// Search index kept in memory, keyed by index name then document id.
#[derive(Default)]
pub struct InMemorySearchProvider {
    indices: Mutex<HashMap<String, BTreeMap<i64, Value>>>,
    /// Number of document writes left to fail.
    failures_left: AtomicUsize,
}

impl InMemorySearchProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that already holds `index` with no documents.
    pub fn with_index(index: &str) -> Self {
        let provider = Self::new();
        provider.lock().insert(index.to_string(), BTreeMap::new());
        provider
    }

    /// Fail the next `count` document writes.
    pub fn fail_next_writes(&self, count: usize) {
        self.failures_left.store(count, Ordering::SeqCst);
    }

    pub fn document(&self, index: &str, id: i64) -> Option<Value> {
        self.lock().get(index).and_then(|docs| docs.get(&id).cloned())
    }

    pub fn put_document(&self, index: &str, id: i64, document: Value) {
        self.lock()
            .entry(index.to_string())
            .or_default()
            .insert(id, document);
    }

    pub fn document_count(&self, index: &str) -> usize {
        self.lock().get(index).map(BTreeMap::len).unwrap_or(0)
    }

    pub fn index_names(&self) -> HashSet<String> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, BTreeMap<i64, Value>>> {
        self.indices.lock().unwrap()
    }

    fn take_failure(&self) -> bool {
        self.failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl SearchIndexProvider for InMemorySearchProvider {
    async fn index_exists(&self, index: &IndexConfig) -> Result<bool, SearchIndexError> {
        Ok(self.lock().contains_key(&index.index_name))
    }

    async fn create_index(&self, index: &IndexConfig) -> Result<(), SearchIndexError> {
        let mut indices = self.lock();
        if indices.contains_key(&index.index_name) {
            return Err(SearchIndexError::index_creation(format!(
                "index {} already exists",
                index.index_name
            )));
        }
        indices.insert(index.index_name.clone(), BTreeMap::new());
        Ok(())
    }

    async fn delete_index(&self, index: &IndexConfig) -> Result<(), SearchIndexError> {
        self.lock().remove(&index.index_name);
        Ok(())
    }

    async fn index_document(
        &self,
        index: &IndexConfig,
        id: i64,
        document: &Value,
    ) -> Result<(), SearchIndexError> {
        if self.take_failure() {
            return Err(SearchIndexError::index("injected failure"));
        }
        self.put_document(&index.index_name, id, document.clone());
        Ok(())
    }

    async fn upsert_document(
        &self,
        index: &IndexConfig,
        id: i64,
        document: &Value,
    ) -> Result<(), SearchIndexError> {
        if self.take_failure() {
            return Err(SearchIndexError::update("injected failure"));
        }
        let mut indices = self.lock();
        let docs = indices.entry(index.index_name.clone()).or_default();
        match (docs.get_mut(&id), document) {
            (Some(Value::Object(existing)), Value::Object(fields)) => {
                for (key, value) in fields {
                    existing.insert(key.clone(), value.clone());
                }
            }
            _ => {
                docs.insert(id, document.clone());
            }
        }
        Ok(())
    }

    async fn delete_document(&self, index: &IndexConfig, id: i64) -> Result<(), SearchIndexError> {
        if self.take_failure() {
            return Err(SearchIndexError::delete("injected failure"));
        }
        if let Some(docs) = self.lock().get_mut(&index.index_name) {
            docs.remove(&id);
        }
        Ok(())
    }
}

/// Record store over fixed vectors. Pages follow the SQL store: ordered by id, archived
/// docs and deleted users left out.
#[derive(Default)]
pub struct InMemoryRecordStore {
    pub data_docs: Vec<DataDoc>,
    pub tables: Vec<DataTable>,
    pub users: Vec<User>,
    /// Fail page reads starting at this offset.
    pub fail_from_offset: Option<i64>,
    pub page_requests: AtomicUsize,
}

impl InMemoryRecordStore {
    fn page<T: Clone>(
        &self,
        records: impl Iterator<Item = T>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<T>, RecordStoreError> {
        self.page_requests.fetch_add(1, Ordering::SeqCst);
        if self.fail_from_offset.is_some_and(|from| offset >= from) {
            return Err(RecordStoreError::decode("injected failure"));
        }
        Ok(records
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get_data_docs(&self, limit: i64, offset: i64) -> Result<Vec<DataDoc>, RecordStoreError> {
        let mut docs: Vec<_> = self.data_docs.iter().filter(|d| !d.archived).cloned().collect();
        docs.sort_by_key(|d| d.id);
        self.page(docs.into_iter(), limit, offset)
    }

    async fn get_data_doc_by_id(&self, id: i64) -> Result<Option<DataDoc>, RecordStoreError> {
        Ok(self.data_docs.iter().find(|d| d.id == id).cloned())
    }

    async fn get_tables(&self, limit: i64, offset: i64) -> Result<Vec<DataTable>, RecordStoreError> {
        let mut tables = self.tables.clone();
        tables.sort_by_key(|t| t.id);
        self.page(tables.into_iter(), limit, offset)
    }

    async fn get_table_by_id(&self, id: i64) -> Result<Option<DataTable>, RecordStoreError> {
        Ok(self.tables.iter().find(|t| t.id == id).cloned())
    }

    async fn get_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, RecordStoreError> {
        let mut users: Vec<_> = self.users.iter().filter(|u| !u.deleted).cloned().collect();
        users.sort_by_key(|u| u.id);
        self.page(users.into_iter(), limit, offset)
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, RecordStoreError> {
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }
}

pub fn data_doc(id: i64, archived: bool) -> DataDoc {
    DataDoc {
        id,
        environment_id: 1,
        owner_uid: 10,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        title: format!("Doc {}", id),
        archived,
        cells: vec![
            DataCell {
                id: id * 10,
                cell_type: DataCellType::Query,
                context: "SELECT 1".to_string(),
                meta: json!({"title": "Count"}),
            },
            DataCell {
                id: id * 10 + 1,
                cell_type: DataCellType::Text,
                context: json!({"blocks": [{"text": "a < b"}]}).to_string(),
                meta: json!({}),
            },
        ],
    }
}

pub fn table(id: i64) -> DataTable {
    DataTable {
        id,
        name: format!("fact_orders_{}", id),
        created_at: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
        golden: false,
        schema: DataSchema {
            id: 1,
            name: "sales".to_string(),
            metastore_id: 3,
        },
        columns: vec!["order_id".to_string(), "amount".to_string()],
        description: None,
    }
}

pub fn user(id: i64, deleted: bool) -> User {
    User {
        id,
        username: Some(format!("user{}", id)),
        fullname: Some("John Smith 123".to_string()),
        deleted,
    }
}

/// Loader over in-memory collaborators with small pages.
pub fn search_sync(
    provider: Arc<InMemorySearchProvider>,
    store: Arc<InMemoryRecordStore>,
) -> SearchSync {
    SearchSync::with_config(
        provider,
        store,
        SearchIndicesConfig::default(),
        LoaderConfig { batch_size: 2 },
    )
}
