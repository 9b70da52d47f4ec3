//! Sync jobs and their execution.
//!
//! A job names one unit of sync work: refreshing a single record or rebuilding the
//! indices. Jobs arrive from a [`JobSource`] and run through a [`JobExecutor`].

mod source;

pub use source::{ChannelJobSource, JobSource, LineJobSource};

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bootstrap::IndexBootstrapper;
use crate::errors::SyncError;
use crate::loader::SearchSync;

/// A unit of sync work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "job", rename_all = "snake_case")]
pub enum SyncJob {
    UpdateDataDoc { id: i64 },
    UpdateTable { id: i64 },
    DeleteTable { id: i64 },
    UpdateUser { id: i64 },
    CreateIndices,
    CreateIndicesIfMissing,
    DeleteIndices,
}

impl SyncJob {
    /// Job name as it appears on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            SyncJob::UpdateDataDoc { .. } => "update_data_doc",
            SyncJob::UpdateTable { .. } => "update_table",
            SyncJob::DeleteTable { .. } => "delete_table",
            SyncJob::UpdateUser { .. } => "update_user",
            SyncJob::CreateIndices => "create_indices",
            SyncJob::CreateIndicesIfMissing => "create_indices_if_missing",
            SyncJob::DeleteIndices => "delete_indices",
        }
    }
}

impl fmt::Display for SyncJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncJob::UpdateDataDoc { id }
            | SyncJob::UpdateTable { id }
            | SyncJob::DeleteTable { id }
            | SyncJob::UpdateUser { id } => write!(f, "{}({})", self.name(), id),
            _ => f.write_str(self.name()),
        }
    }
}

/// Runs jobs against the search index.
pub struct JobExecutor {
    sync: SearchSync,
}

impl JobExecutor {
    pub fn new(sync: SearchSync) -> Self {
        Self { sync }
    }

    pub fn sync(&self) -> &SearchSync {
        &self.sync
    }

    /// Execute a single job once.
    pub async fn execute(&self, job: &SyncJob) -> Result<(), SyncError> {
        debug!(job = %job, "Executing job");

        match *job {
            SyncJob::UpdateDataDoc { id } => self.sync.update_data_doc(id).await.into_result(),
            SyncJob::UpdateTable { id } => self.sync.update_table(id).await.into_result(),
            SyncJob::DeleteTable { id } => self.sync.delete_table(id).await.into_result(),
            SyncJob::UpdateUser { id } => self.sync.update_user(id).await.into_result(),
            SyncJob::CreateIndices => {
                let summaries = IndexBootstrapper::new(&self.sync).create_indices().await?;
                info!(indices = summaries.len(), "Indices created and populated");
                Ok(())
            }
            SyncJob::CreateIndicesIfMissing => {
                let summaries = IndexBootstrapper::new(&self.sync)
                    .create_indices_if_missing()
                    .await?;
                info!(indices = summaries.len(), "Missing indices created and populated");
                Ok(())
            }
            SyncJob::DeleteIndices => IndexBootstrapper::new(&self.sync).delete_indices().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_wire_format() {
        let job: SyncJob = serde_json::from_value(json!({"job": "update_table", "id": 12})).unwrap();
        assert_eq!(job, SyncJob::UpdateTable { id: 12 });

        let job: SyncJob =
            serde_json::from_value(json!({"job": "create_indices_if_missing"})).unwrap();
        assert_eq!(job, SyncJob::CreateIndicesIfMissing);

        let value = serde_json::to_value(SyncJob::UpdateDataDoc { id: 3 }).unwrap();
        assert_eq!(value, json!({"job": "update_data_doc", "id": 3}));
    }

    #[test]
    fn test_unknown_job_is_rejected() {
        let result: Result<SyncJob, _> = serde_json::from_value(json!({"job": "reindex_all"}));
        assert!(result.is_err());

        let result: Result<SyncJob, _> = serde_json::from_value(json!({"job": "update_user"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_job_display() {
        assert_eq!(SyncJob::UpdateUser { id: 7 }.to_string(), "update_user(7)");
        assert_eq!(SyncJob::DeleteIndices.to_string(), "delete_indices");
    }
}
