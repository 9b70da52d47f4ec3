//! # Catalog Search Indexer
//!
//! Keeps the data catalog search indices (data docs, tables, users) in line with the
//! relational store they are projected from.
//!
//! ## Architecture
//!
//! The indexer follows a Source-Processor-Loader pattern:
//!
//! 1. **Iterator**: Pages through records in the store
//! 2. **Processor**: Projects records into search documents
//! 3. **Loader**: Writes documents to OpenSearch, one record or a whole index at a time
//! 4. **Orchestrator**: Runs sync jobs from a job source
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`iterator`]: Paged iteration over store records
//! - [`processor`]: Record to document projection
//! - [`loader`]: Per-record sync and index population
//! - [`bootstrap`]: Index creation, population and deletion
//! - [`jobs`]: Sync jobs, job sources and the executor
//! - [`orchestrator`]: Runs jobs with retries
//! - [`errors`]: Error types for the indexer

pub mod bootstrap;
pub mod config;
pub mod errors;
pub mod iterator;
pub mod jobs;
pub mod loader;
pub mod orchestrator;
pub mod processor;

pub use config::{Dependencies, IndexerConfig};
pub use errors::SyncError;

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Sync error.
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
