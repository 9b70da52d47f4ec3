//! OpenSearch implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! using OpenSearch as the backend.

mod provider;

pub use provider::{BasicAuth, OpenSearchProvider, SearchAuth};
