//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchIndexError;
use crate::index_config::IndexConfig;

/// Abstracts the underlying search index implementation (OpenSearch, Elasticsearch, etc.).
///
/// Every call is addressed by an `IndexConfig` and, for document operations, the
/// source record ID. Implementations are injected into the indexer so tests can use
/// in-memory or failing providers.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Check whether the index exists.
    async fn index_exists(&self, index: &IndexConfig) -> Result<bool, SearchIndexError>;

    /// Create the index with its settings and mappings.
    ///
    /// Fails if the index already exists.
    async fn create_index(&self, index: &IndexConfig) -> Result<(), SearchIndexError>;

    /// Delete the index and every document in it.
    ///
    /// Deleting an index that does not exist is considered successful.
    async fn delete_index(&self, index: &IndexConfig) -> Result<(), SearchIndexError>;

    /// Index (insert or fully replace) a document under `id`.
    async fn index_document(
        &self,
        index: &IndexConfig,
        id: i64,
        document: &Value,
    ) -> Result<(), SearchIndexError>;

    /// Merge `document` into the stored document, creating it if it doesn't exist (upsert).
    async fn upsert_document(
        &self,
        index: &IndexConfig,
        id: i64,
        document: &Value,
    ) -> Result<(), SearchIndexError>;

    /// Delete a document from the index.
    ///
    /// If the document doesn't exist, the operation is considered successful.
    async fn delete_document(&self, index: &IndexConfig, id: i64) -> Result<(), SearchIndexError>;
}
