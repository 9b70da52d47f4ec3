//! Relational source records.
//!
//! These are the rows the catalog application owns. The indexer only reads them;
//! creation, mutation and (soft) deletion happen in the relational store.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of content held by a data doc cell.
///
/// Cell types the indexer does not know are kept as [`DataCellType::Other`] so a doc
/// with such a cell still loads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataCellType {
    Query,
    Text,
    Chart,
    Other(String),
}

impl DataCellType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Query => "query",
            Self::Text => "text",
            Self::Chart => "chart",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for DataCellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for DataCellType {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "query" => Self::Query,
            "text" => Self::Text,
            "chart" => Self::Chart,
            _ => Self::Other(s.to_string()),
        }
    }
}

impl From<String> for DataCellType {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<DataCellType> for String {
    fn from(cell_type: DataCellType) -> Self {
        match cell_type {
            DataCellType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// One cell of a data doc, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataCell {
    pub id: i64,
    pub cell_type: DataCellType,
    /// Raw cell content: SQL for query cells, rich-text content state (or legacy
    /// plain text) for text cells.
    pub context: String,
    /// Free-form cell metadata. Query cells may carry a `title`.
    #[serde(default)]
    pub meta: serde_json::Value,
}

/// A data doc with its ordered cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataDoc {
    pub id: i64,
    pub environment_id: i64,
    pub owner_uid: i64,
    pub created_at: DateTime<Utc>,
    pub title: String,
    /// Soft-delete flag. Archived docs must not be searchable.
    pub archived: bool,
    pub cells: Vec<DataCell>,
}

/// The schema a table lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSchema {
    pub id: i64,
    pub name: String,
    pub metastore_id: i64,
}

/// A metastore table with its schema, column names and optional description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub golden: bool,
    pub schema: DataSchema,
    pub columns: Vec<String>,
    pub description: Option<String>,
}

/// An application user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub fullname: Option<String>,
    /// Soft-delete flag. Deleted users must not be searchable.
    pub deleted: bool,
}
