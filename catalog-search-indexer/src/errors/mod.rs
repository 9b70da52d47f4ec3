//! Error types for the catalog search sync.

use thiserror::Error;

use catalog_search_repository::{RecordStoreError, SearchIndexError};

/// Errors that can occur while synchronizing records into the search index.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Error from the search index backend.
    #[error("Search index error: {0}")]
    SearchIndex(#[from] SearchIndexError),

    /// Error reading source records.
    #[error("Record store error: {0}")]
    RecordStore(#[from] RecordStoreError),

    /// A projected document could not be serialized.
    #[error("Projection error: {0}")]
    ProjectionError(String),

    /// A job could not be parsed or read.
    #[error("Job error: {0}")]
    JobError(String),
}

impl SyncError {
    /// Create a job error.
    pub fn job(msg: impl Into<String>) -> Self {
        Self::JobError(msg.into())
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::ProjectionError(err.to_string())
    }
}
