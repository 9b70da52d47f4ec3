//! Explicit results of per-record synchronization.

use std::fmt;

use catalog_search_shared::IndexKind;

use crate::errors::SyncError;

/// Step of a per-record sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// Reading the record from the store.
    Fetch,
    /// Writing the projected document.
    Upsert,
    /// Removing the document.
    Delete,
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetch => "fetch",
            Self::Upsert => "upsert",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Outcome of synchronizing one record.
///
/// Failures are recoverable from the caller's point of view: nothing was retried, and
/// the index entry for the record is whatever it was before the failed step.
#[derive(Debug)]
pub enum SyncOutcome {
    /// The record is live and its document was written.
    Upserted { kind: IndexKind, id: i64 },
    /// The record is gone or soft-deleted and its document was removed.
    Deleted { kind: IndexKind, id: i64 },
    /// A step failed.
    Failed {
        kind: IndexKind,
        id: i64,
        action: SyncAction,
        error: SyncError,
    },
}

impl SyncOutcome {
    pub fn id(&self) -> i64 {
        match self {
            Self::Upserted { id, .. } | Self::Deleted { id, .. } | Self::Failed { id, .. } => *id,
        }
    }

    pub fn kind(&self) -> IndexKind {
        match self {
            Self::Upserted { kind, .. }
            | Self::Deleted { kind, .. }
            | Self::Failed { kind, .. } => *kind,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Convert into a `Result`, keeping the failure reason.
    pub fn into_result(self) -> Result<(), SyncError> {
        match self {
            Self::Failed { error, .. } => Err(error),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_search_repository::SearchIndexError;

    #[test]
    fn test_success_outcomes() {
        let outcome = SyncOutcome::Upserted {
            kind: IndexKind::Users,
            id: 3,
        };
        assert!(outcome.is_success());
        assert_eq!(outcome.id(), 3);
        assert_eq!(outcome.kind(), IndexKind::Users);
        assert!(outcome.into_result().is_ok());

        let outcome = SyncOutcome::Deleted {
            kind: IndexKind::Tables,
            id: 4,
        };
        assert!(outcome.is_success());
    }

    #[test]
    fn test_failed_outcome_keeps_reason() {
        let outcome = SyncOutcome::Failed {
            kind: IndexKind::DataDocs,
            id: 9,
            action: SyncAction::Delete,
            error: SearchIndexError::delete("status 500").into(),
        };
        assert!(!outcome.is_success());

        let err = outcome.into_result().unwrap_err();
        assert!(matches!(
            err,
            SyncError::SearchIndex(SearchIndexError::DeleteError(_))
        ));
    }

    #[test]
    fn test_action_display() {
        assert_eq!(SyncAction::Upsert.to_string(), "upsert");
        assert_eq!(SyncAction::Fetch.to_string(), "fetch");
    }
}
