use thiserror::Error;

#[derive(Debug, Error)]
/// Represents errors that can occur while reading source records.
///
/// Wraps SQLx errors from the database and decode failures for rows whose
/// contents cannot be mapped onto the record types.
pub enum RecordStoreError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Decode error: {0}")]
    DecodeError(String),
}

impl RecordStoreError {
    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::DecodeError(msg.into())
    }
}
