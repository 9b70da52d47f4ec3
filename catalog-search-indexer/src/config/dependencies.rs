//! Dependency initialization and wiring for the catalog search indexer.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use catalog_search_repository::{
    OpenSearchProvider, PostgresRecordStore, RecordStore, SearchIndexProvider,
};

use super::{ConnectionMode, IndexerConfig};
use crate::jobs::JobExecutor;
use crate::loader::{LoaderConfig, SearchSync};
use crate::IndexingError;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Executor wired to the search index and the record store.
    pub executor: JobExecutor,
}

impl Dependencies {
    /// Connect to OpenSearch and PostgreSQL and wire the executor.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If initialization fails (only in fail-fast mode)
    pub async fn new(config: &IndexerConfig) -> Result<Self, IndexingError> {
        info!(
            opensearch_url = %config.opensearch_url,
            connection_type = ?config.connection_type,
            connection_mode = ?config.connection_mode,
            retry_interval_secs = config.retry_interval.as_secs(),
            batch_size = config.batch_size,
            "Initializing dependencies"
        );

        let search_provider = connect_with_retry(
            "OpenSearch",
            config.connection_mode,
            config.retry_interval,
            || Self::try_connect_opensearch(config),
        )
        .await?;
        info!("OpenSearch connection established");

        let record_store = connect_with_retry(
            "PostgreSQL",
            config.connection_mode,
            config.retry_interval,
            || Self::try_connect_postgres(config),
        )
        .await?;
        info!("PostgreSQL connection established");

        let sync = SearchSync::with_config(
            Arc::new(search_provider) as Arc<dyn SearchIndexProvider>,
            Arc::new(record_store) as Arc<dyn RecordStore>,
            config.indices.clone(),
            LoaderConfig {
                batch_size: config.batch_size,
            },
        );

        Ok(Self {
            executor: JobExecutor::new(sync),
        })
    }

    /// Create the provider and make one request to confirm the cluster answers.
    async fn try_connect_opensearch(
        config: &IndexerConfig,
    ) -> Result<OpenSearchProvider, IndexingError> {
        let provider =
            OpenSearchProvider::new(&config.opensearch_url, config.opensearch_auth.clone())
                .await
                .map_err(|e| {
                    IndexingError::config(format!("Failed to create OpenSearch provider: {}", e))
                })?;

        provider
            .index_exists(&config.indices.datadocs)
            .await
            .map_err(|e| IndexingError::config(format!("OpenSearch is not reachable: {}", e)))?;

        Ok(provider)
    }

    async fn try_connect_postgres(
        config: &IndexerConfig,
    ) -> Result<PostgresRecordStore, IndexingError> {
        PostgresRecordStore::connect(&config.database_url)
            .await
            .map_err(|e| IndexingError::config(format!("Failed to connect to PostgreSQL: {}", e)))
    }
}

/// Run `connect` until it succeeds, or once in fail-fast mode.
async fn connect_with_retry<T, F, Fut>(
    service: &str,
    mode: ConnectionMode,
    retry_interval: Duration,
    mut connect: F,
) -> Result<T, IndexingError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, IndexingError>>,
{
    loop {
        match connect().await {
            Ok(connection) => return Ok(connection),
            Err(e) => match mode {
                ConnectionMode::FailFast => return Err(e),
                ConnectionMode::Retry => {
                    warn!(
                        service = service,
                        error = %e,
                        retry_interval_secs = retry_interval.as_secs(),
                        "Connection failed, retrying..."
                    );
                    sleep(retry_interval).await;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_retry_mode_keeps_trying() {
        let attempts = AtomicUsize::new(0);

        let result = connect_with_retry("test", ConnectionMode::Retry, Duration::from_secs(15), || {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 2 {
                    Err(IndexingError::config("down"))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_fail_fast_mode_returns_first_error() {
        let attempts = AtomicUsize::new(0);

        let result: Result<(), _> =
            connect_with_retry("test", ConnectionMode::FailFast, Duration::from_secs(15), || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(IndexingError::config("down")) }
            })
            .await;

        assert!(matches!(result, Err(IndexingError::ConfigError(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
