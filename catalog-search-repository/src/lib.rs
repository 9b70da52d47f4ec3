//! # Catalog Search Repository
//!
//! This crate provides traits and implementations for the two collaborators of the
//! catalog search indexer: the search index and the relational record store. It
//! includes definitions for errors, interfaces, index configuration, and concrete
//! implementations for OpenSearch and PostgreSQL.

pub mod errors;
pub mod index_config;
pub mod interfaces;
pub mod opensearch;
pub mod postgres;
pub mod utils;

pub use errors::{RecordStoreError, SearchIndexError};
pub use index_config::{IndexConfig, SearchIndicesConfig};
pub use interfaces::{RecordStore, SearchIndexProvider};
pub use opensearch::{BasicAuth, OpenSearchProvider, SearchAuth};
pub use postgres::PostgresRecordStore;
pub use utils::{normalize_aws_search_url, normalize_search_url};
