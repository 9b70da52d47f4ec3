//! Configuration and dependency initialization for the catalog search indexer.

mod dependencies;

pub use dependencies::Dependencies;

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use catalog_search_repository::{BasicAuth, SearchAuth, SearchIndicesConfig};
use catalog_search_shared::IndexKind;

use crate::iterator::DEFAULT_BATCH_SIZE;
use crate::orchestrator::OrchestratorConfig;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default PostgreSQL connection string.
const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/catalog";

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Default pause between job attempts in milliseconds.
const DEFAULT_JOB_RETRY_DELAY_MS: u64 = 1000;

/// Region used to sign requests to AWS-hosted clusters when none is configured.
const DEFAULT_AWS_REGION: &str = "us-east-1";

/// How the indexer reaches the OpenSearch cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionType {
    /// Plain HTTP(S), with basic auth when credentials are configured.
    Basic,
    /// AWS-hosted domain, requests signed with SigV4.
    Aws,
}

impl ConnectionType {
    /// Parse a connection type, case-insensitive.
    ///
    /// Unset or unrecognized values fall back to [`ConnectionType::Basic`].
    fn parse(value: Option<&str>) -> Self {
        match value.map(str::to_lowercase).as_deref() {
            Some("aws") => Self::Aws,
            Some("basic") | Some("naive") | None => Self::Basic,
            Some(other) => {
                warn!(value = other, "Invalid OPENSEARCH_CONNECTION_TYPE, defaulting to 'basic'");
                Self::Basic
            }
        }
    }
}

/// Connection mode for the backing services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry connection at a fixed interval until successful.
    Retry,
}

impl ConnectionMode {
    /// Parse a connection mode, case-insensitive.
    ///
    /// Unset or unrecognized values fall back to [`ConnectionMode::Retry`].
    fn parse(value: Option<&str>) -> Self {
        match value.map(str::to_lowercase).as_deref() {
            Some("fail-fast") | Some("failfast") | Some("fail_fast") => Self::FailFast,
            Some("retry") | None => Self::Retry,
            Some(other) => {
                warn!(value = other, "Invalid OPENSEARCH_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Settings for the indexer, read from the environment.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    pub opensearch_url: String,
    pub connection_type: ConnectionType,
    pub opensearch_auth: SearchAuth,
    pub connection_mode: ConnectionMode,
    pub retry_interval: Duration,
    pub database_url: String,
    /// Page size used when populating indices.
    pub batch_size: i64,
    pub indices: SearchIndicesConfig,
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl IndexerConfig {
    /// Read configuration from process environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `OPENSEARCH_CONNECTION_TYPE`: "basic" or "aws" (default: basic)
    /// - `OPENSEARCH_USERNAME` / `OPENSEARCH_PASSWORD`: basic auth, used when both are set
    /// - `OPENSEARCH_AWS_REGION`: signing region for "aws" (default: us-east-1)
    /// - `OPENSEARCH_CONNECTION_MODE`: "fail-fast" or "retry" (default: retry)
    /// - `OPENSEARCH_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    /// - `DATABASE_URL`: PostgreSQL URL (default: postgres://localhost:5432/catalog)
    /// - `SYNC_BATCH_SIZE`: records per page during population (default: 5000)
    /// - `DATADOCS_INDEX_NAME`, `TABLES_INDEX_NAME`, `USERS_INDEX_NAME`: index names
    /// - `JOB_MAX_ATTEMPTS`: attempts per job (default: 1)
    /// - `JOB_RETRY_DELAY_MS`: pause between attempts (default: 1000)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Values that fail to parse are logged and replaced by their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let connection_type = ConnectionType::parse(lookup("OPENSEARCH_CONNECTION_TYPE").as_deref());
        let opensearch_auth = match connection_type {
            ConnectionType::Aws => SearchAuth::AwsSigV4 {
                region: lookup("OPENSEARCH_AWS_REGION")
                    .filter(|region| !region.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_AWS_REGION.to_string()),
            },
            ConnectionType::Basic => {
                match (lookup("OPENSEARCH_USERNAME"), lookup("OPENSEARCH_PASSWORD")) {
                    (Some(username), Some(password)) => {
                        SearchAuth::Basic(BasicAuth { username, password })
                    }
                    _ => SearchAuth::None,
                }
            }
        };

        let mut indices = SearchIndicesConfig::default();
        for (key, kind) in [
            ("DATADOCS_INDEX_NAME", IndexKind::DataDocs),
            ("TABLES_INDEX_NAME", IndexKind::Tables),
            ("USERS_INDEX_NAME", IndexKind::Users),
        ] {
            if let Some(name) = lookup(key).filter(|name| !name.trim().is_empty()) {
                indices = indices.with_index_name(kind, name);
            }
        }

        Self {
            opensearch_url: lookup("OPENSEARCH_URL")
                .unwrap_or_else(|| DEFAULT_OPENSEARCH_URL.to_string()),
            connection_type,
            opensearch_auth,
            connection_mode: ConnectionMode::parse(lookup("OPENSEARCH_CONNECTION_MODE").as_deref()),
            retry_interval: Duration::from_secs(parse_or(
                &lookup,
                "OPENSEARCH_RETRY_INTERVAL_SECS",
                DEFAULT_RETRY_INTERVAL_SECS,
            )),
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            batch_size: parse_or(&lookup, "SYNC_BATCH_SIZE", DEFAULT_BATCH_SIZE).max(1),
            indices,
            max_attempts: parse_or(&lookup, "JOB_MAX_ATTEMPTS", 1u32).max(1),
            retry_delay: Duration::from_millis(parse_or(
                &lookup,
                "JOB_RETRY_DELAY_MS",
                DEFAULT_JOB_RETRY_DELAY_MS,
            )),
        }
    }

    /// Retry policy for the orchestrator.
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            max_attempts: self.max_attempts,
            retry_delay: self.retry_delay,
            ..OrchestratorConfig::default()
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key = key, value = %raw, "Invalid value, using default");
            default
        }),
        None => default,
    }
}
