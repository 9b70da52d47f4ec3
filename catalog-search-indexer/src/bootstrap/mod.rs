//! Bulk bootstrap of the search indices.

use tracing::{info, instrument, warn};

use catalog_search_shared::IndexKind;

use crate::errors::SyncError;
use crate::loader::{PopulateSummary, SearchSync};

/// Creates, fills and drops whole indices.
pub struct IndexBootstrapper<'a> {
    sync: &'a SearchSync,
}

impl<'a> IndexBootstrapper<'a> {
    pub fn new(sync: &'a SearchSync) -> Self {
        Self { sync }
    }

    /// Create every configured index, then populate datadocs, tables and users in order.
    ///
    /// Returns the first creation or population error.
    #[instrument(skip(self))]
    pub async fn create_indices(&self) -> Result<Vec<PopulateSummary>, SyncError> {
        for index in self.sync.indices().iter() {
            self.sync.provider().create_index(index).await?;
            info!(index = %index.index_name, "Index created");
        }

        let mut summaries = Vec::with_capacity(IndexKind::ALL.len());
        for kind in IndexKind::ALL {
            summaries.push(self.sync.populate_kind(kind).await?);
        }
        Ok(summaries)
    }

    /// Create and populate only the indices that do not exist yet.
    #[instrument(skip(self))]
    pub async fn create_indices_if_missing(&self) -> Result<Vec<PopulateSummary>, SyncError> {
        let mut summaries = Vec::new();

        for index in self.sync.indices().iter() {
            if self.sync.provider().index_exists(index).await? {
                info!(index = %index.index_name, "Index already exists, leaving it untouched");
                continue;
            }

            self.sync.provider().create_index(index).await?;
            info!(index = %index.index_name, "Index created");
            summaries.push(self.sync.populate_kind(index.kind).await?);
        }

        Ok(summaries)
    }

    /// Delete every configured index. Missing indices are not an error.
    #[instrument(skip(self))]
    pub async fn delete_indices(&self) -> Result<(), SyncError> {
        for index in self.sync.indices().iter() {
            if let Err(e) = self.sync.provider().delete_index(index).await {
                warn!(index = %index.index_name, error = %e, "Failed to delete index");
                return Err(e.into());
            }
            info!(index = %index.index_name, "Index deleted");
        }
        Ok(())
    }
}
