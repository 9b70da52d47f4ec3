//! Static per-index configuration.
//!
//! Each index kind gets an index name, a document type name and the settings and
//! mappings used when the index is created.

use catalog_search_shared::IndexKind;
use serde_json::{json, Value};

/// Configuration for one search index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexConfig {
    /// Which records this index holds.
    pub kind: IndexKind,
    /// Name of the index in the search backend.
    pub index_name: String,
    /// Document type name. Backends without mapping types only use it for logging
    /// and to route bulk population.
    pub type_name: String,
    /// Body sent when creating the index (`settings` and `mappings`).
    pub settings: Value,
}

impl IndexConfig {
    /// Create an index configuration with the default settings for `kind`.
    ///
    /// # Arguments
    ///
    /// * `kind` - The record kind stored in the index
    /// * `index_name` - The index name in the search backend
    pub fn new(kind: IndexKind, index_name: impl Into<String>) -> Self {
        Self {
            kind,
            index_name: index_name.into(),
            type_name: kind.as_str().to_string(),
            settings: get_index_settings(kind),
        }
    }

    /// Default configuration for `kind` (e.g. `search_tables_v1`).
    pub fn default_for(kind: IndexKind) -> Self {
        Self::new(kind, get_default_index_name(kind))
    }
}

/// Configuration for every index the indexer maintains.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchIndicesConfig {
    pub datadocs: IndexConfig,
    pub tables: IndexConfig,
    pub users: IndexConfig,
}

impl Default for SearchIndicesConfig {
    fn default() -> Self {
        Self {
            datadocs: IndexConfig::default_for(IndexKind::DataDocs),
            tables: IndexConfig::default_for(IndexKind::Tables),
            users: IndexConfig::default_for(IndexKind::Users),
        }
    }
}

impl SearchIndicesConfig {
    /// Configuration of the index holding `kind`.
    pub fn get(&self, kind: IndexKind) -> &IndexConfig {
        match kind {
            IndexKind::DataDocs => &self.datadocs,
            IndexKind::Tables => &self.tables,
            IndexKind::Users => &self.users,
        }
    }

    /// Rename the index holding `kind`, keeping its settings.
    pub fn with_index_name(mut self, kind: IndexKind, index_name: impl Into<String>) -> Self {
        let config = match kind {
            IndexKind::DataDocs => &mut self.datadocs,
            IndexKind::Tables => &mut self.tables,
            IndexKind::Users => &mut self.users,
        };
        config.index_name = index_name.into();
        self
    }

    /// All index configurations in bootstrap order.
    pub fn iter(&self) -> impl Iterator<Item = &IndexConfig> {
        IndexKind::ALL.into_iter().map(move |kind| self.get(kind))
    }
}

/// Default index name for `kind`.
pub fn get_default_index_name(kind: IndexKind) -> String {
    format!("search_{}_v1", kind.as_str())
}

/// Get the index settings and mappings for `kind`.
///
/// - **text** fields hold flattened content for full-text search
/// - **completion** fields back the table and user suggesters
/// - **keyword** and numeric fields are used for filtering
pub fn get_index_settings(kind: IndexKind) -> Value {
    let properties = match kind {
        IndexKind::DataDocs => json!({
            "id": { "type": "long" },
            "environment_id": { "type": "long" },
            "owner_uid": { "type": "long" },
            "created_at": { "type": "date", "format": "epoch_second" },
            "title": {
                "type": "text",
                "fields": { "keyword": { "type": "keyword", "ignore_above": 256 } }
            },
            "cells": { "type": "text" }
        }),
        IndexKind::Tables => json!({
            "id": { "type": "long" },
            "metastore_id": { "type": "long" },
            "schema": { "type": "keyword" },
            "name": { "type": "keyword" },
            "full_name": { "type": "text" },
            "completion_name": {
                "type": "completion",
                "contexts": [
                    { "name": "metastore_id", "type": "category" }
                ]
            },
            "description": { "type": "text" },
            "created_at": { "type": "date", "format": "epoch_second" },
            "columns": { "type": "text" },
            "golden": { "type": "boolean" }
        }),
        IndexKind::Users => json!({
            "id": { "type": "long" },
            "username": { "type": "keyword" },
            "fullname": { "type": "text" },
            "suggest": { "type": "completion" }
        }),
    };

    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "properties": properties
        }
    })
}
