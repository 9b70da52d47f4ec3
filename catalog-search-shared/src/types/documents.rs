//! Search document types.
//!
//! Each document is a flat, denormalized projection of one source record. Documents
//! have no identity of their own: the document ID is always the source record's ID,
//! which makes repeated upserts of the same record idempotent.

use serde::{Deserialize, Serialize};

/// A document that can be written to a search index.
pub trait SearchDocument: Serialize {
    /// ID under which the document is stored. Equal to the source record's ID.
    fn document_id(&self) -> i64;
}

/// Completion suggester input.
///
/// Serialized in the shape the completion field type expects:
/// `{"input": [...], "weight": n, "contexts": {...}}`, omitting absent parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion<C = ()> {
    pub input: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contexts: Option<C>,
}

impl Completion<()> {
    /// Completion input with neither weight nor contexts.
    pub fn from_input(input: Vec<String>) -> Self {
        Self {
            input,
            weight: None,
            contexts: None,
        }
    }
}

/// Category context used to scope table suggestions to a metastore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCompletionContext {
    pub metastore_id: i64,
}

/// Search document for a data doc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataDocDocument {
    pub id: i64,
    pub environment_id: i64,
    pub owner_uid: i64,
    /// Creation time in unix seconds.
    pub created_at: i64,
    /// All cells flattened to plain text, one cell per line, HTML escaped.
    pub cells: String,
    pub title: String,
}

/// Search document for a metastore table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDocument {
    pub id: i64,
    pub metastore_id: i64,
    pub schema: String,
    pub name: String,
    /// Schema and table name words separated by spaces.
    pub full_name: String,
    pub completion_name: Completion<TableCompletionContext>,
    pub description: String,
    pub created_at: i64,
    /// Column name words separated by spaces.
    pub columns: String,
    pub golden: bool,
}

/// Search document for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDocument {
    pub id: i64,
    pub username: String,
    pub fullname: String,
    pub suggest: Completion,
}

impl SearchDocument for DataDocDocument {
    fn document_id(&self) -> i64 {
        self.id
    }
}

impl SearchDocument for TableDocument {
    fn document_id(&self) -> i64 {
        self.id
    }
}

impl SearchDocument for UserDocument {
    fn document_id(&self) -> i64 {
        self.id
    }
}
