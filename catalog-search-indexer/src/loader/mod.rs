//! Loader module for the catalog search indexer.
//!
//! Writes projected documents into the search index: per-record upserts and deletes
//! driven by record changes, and full population of an index from the record store.

mod outcome;

pub use outcome::{SyncAction, SyncOutcome};

use std::sync::Arc;

use futures::{pin_mut, TryStreamExt};
use serde_json::Value;
use tracing::{debug, error, info, instrument};

use catalog_search_repository::{
    IndexConfig, RecordStore, SearchIndexProvider, SearchIndicesConfig,
};
use catalog_search_shared::{DataDoc, DataTable, IndexKind, SearchDocument, User};

use crate::errors::SyncError;
use crate::iterator::{record_stream, DEFAULT_BATCH_SIZE};
use crate::processor::Indexable;

/// Configuration for the search loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Number of records read per page during population.
    pub batch_size: i64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Counts from populating one index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulateSummary {
    pub kind: IndexKind,
    /// Documents written.
    pub indexed: usize,
    /// Records left out because they are soft-deleted.
    pub skipped: usize,
    /// Documents that could not be written.
    pub failed: usize,
}

impl PopulateSummary {
    fn new(kind: IndexKind) -> Self {
        Self {
            kind,
            indexed: 0,
            skipped: 0,
            failed: 0,
        }
    }
}

/// Keeps search documents in line with their source records.
///
/// Per-record operations never retry and never panic; they report what happened as a
/// [`SyncOutcome`] and log failures.
pub struct SearchSync {
    provider: Arc<dyn SearchIndexProvider>,
    store: Arc<dyn RecordStore>,
    indices: SearchIndicesConfig,
    config: LoaderConfig,
}

impl SearchSync {
    /// Create a loader with default configuration.
    pub fn new(
        provider: Arc<dyn SearchIndexProvider>,
        store: Arc<dyn RecordStore>,
        indices: SearchIndicesConfig,
    ) -> Self {
        Self::with_config(provider, store, indices, LoaderConfig::default())
    }

    /// Create a loader with custom configuration.
    pub fn with_config(
        provider: Arc<dyn SearchIndexProvider>,
        store: Arc<dyn RecordStore>,
        indices: SearchIndicesConfig,
        config: LoaderConfig,
    ) -> Self {
        Self {
            provider,
            store,
            indices,
            config,
        }
    }

    pub fn provider(&self) -> &dyn SearchIndexProvider {
        self.provider.as_ref()
    }

    pub fn indices(&self) -> &SearchIndicesConfig {
        &self.indices
    }

    /// Bring the data doc's index entry in line with the store.
    pub async fn update_data_doc(&self, id: i64) -> SyncOutcome {
        self.sync_record::<DataDoc>(id).await
    }

    /// Bring the table's index entry in line with the store.
    pub async fn update_table(&self, id: i64) -> SyncOutcome {
        self.sync_record::<DataTable>(id).await
    }

    /// Bring the user's index entry in line with the store.
    pub async fn update_user(&self, id: i64) -> SyncOutcome {
        self.sync_record::<User>(id).await
    }

    /// Remove a table's document without consulting the store.
    pub async fn delete_table(&self, id: i64) -> SyncOutcome {
        self.remove_document(IndexKind::Tables, id).await
    }

    /// Fetch the record; upsert it when live, delete its document otherwise.
    async fn sync_record<R: Indexable>(&self, id: i64) -> SyncOutcome {
        let kind = R::kind();

        let record = match R::fetch_by_id(self.store.as_ref(), id).await {
            Ok(record) => record,
            Err(e) => {
                error!(kind = %kind, id = id, error = %e, "Failed to fetch record");
                return SyncOutcome::Failed {
                    kind,
                    id,
                    action: SyncAction::Fetch,
                    error: e.into(),
                };
            }
        };

        match record {
            Some(record) if record.is_live() => self.write_document(&record).await,
            _ => self.remove_document(kind, id).await,
        }
    }

    async fn write_document<R: Indexable>(&self, record: &R) -> SyncOutcome {
        let kind = R::kind();
        let id = record.id();
        let index = self.indices.get(kind);

        let result = match document_body(record.project()) {
            Ok((document_id, body)) => self
                .provider
                .upsert_document(index, document_id, &body)
                .await
                .map_err(SyncError::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                debug!(index = %index.index_name, id = id, "Document upserted");
                SyncOutcome::Upserted { kind, id }
            }
            Err(e) => {
                error!(index = %index.index_name, id = id, error = %e, "Failed to upsert document");
                SyncOutcome::Failed {
                    kind,
                    id,
                    action: SyncAction::Upsert,
                    error: e,
                }
            }
        }
    }

    async fn remove_document(&self, kind: IndexKind, id: i64) -> SyncOutcome {
        let index = self.indices.get(kind);

        match self.provider.delete_document(index, id).await {
            Ok(()) => {
                debug!(index = %index.index_name, id = id, "Document deleted");
                SyncOutcome::Deleted { kind, id }
            }
            Err(e) => {
                error!(index = %index.index_name, id = id, error = %e, "Failed to delete document");
                SyncOutcome::Failed {
                    kind,
                    id,
                    action: SyncAction::Delete,
                    error: e.into(),
                }
            }
        }
    }

    /// Populate the index for `kind` from every record in the store.
    pub async fn populate_kind(&self, kind: IndexKind) -> Result<PopulateSummary, SyncError> {
        match kind {
            IndexKind::DataDocs => self.populate::<DataDoc>().await,
            IndexKind::Tables => self.populate::<DataTable>().await,
            IndexKind::Users => self.populate::<User>().await,
        }
    }

    /// Stream every record of kind `R` into its index.
    ///
    /// Soft-deleted records are skipped. A failed document write is logged and counted
    /// without stopping the run; a record store failure stops it. Nothing is rolled
    /// back, so a stopped run leaves the index partially populated.
    #[instrument(skip(self), fields(kind = %R::kind()))]
    pub async fn populate<R: Indexable>(&self) -> Result<PopulateSummary, SyncError> {
        let index = self.indices.get(R::kind());
        let mut summary = PopulateSummary::new(R::kind());

        let records = record_stream::<R>(self.store.as_ref(), self.config.batch_size);
        pin_mut!(records);

        loop {
            let record = match records.try_next().await {
                Ok(Some(record)) => record,
                Ok(None) => break,
                Err(e) => {
                    error!(
                        index = %index.index_name,
                        indexed = summary.indexed,
                        error = %e,
                        "Record iteration failed, index left partially populated"
                    );
                    return Err(e.into());
                }
            };

            if !record.is_live() {
                summary.skipped += 1;
                continue;
            }

            match self.insert_document(index, &record).await {
                Ok(()) => summary.indexed += 1,
                Err(e) => {
                    summary.failed += 1;
                    error!(
                        index = %index.index_name,
                        id = record.id(),
                        error = %e,
                        "Failed to index document"
                    );
                }
            }
        }

        info!(
            index = %index.index_name,
            indexed = summary.indexed,
            skipped = summary.skipped,
            failed = summary.failed,
            "Index populated"
        );
        Ok(summary)
    }

    async fn insert_document<R: Indexable>(
        &self,
        index: &IndexConfig,
        record: &R,
    ) -> Result<(), SyncError> {
        let (document_id, body) = document_body(record.project())?;
        self.provider
            .index_document(index, document_id, &body)
            .await?;
        Ok(())
    }
}

/// Serialize a projected document, returning it with the id it is stored under.
fn document_body<D: SearchDocument>(document: D) -> Result<(i64, Value), SyncError> {
    let body = serde_json::to_value(&document)?;
    Ok((document.document_id(), body))
}
