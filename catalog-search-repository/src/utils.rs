//! Utility functions for the catalog search repository.

use url::Url;

use crate::errors::SearchIndexError;

/// Port used when the configured search host has none.
pub const DEFAULT_SEARCH_PORT: u16 = 9200;

/// Port used for AWS-hosted search domains when the host has none.
pub const DEFAULT_AWS_SEARCH_PORT: u16 = 443;

/// Turn a configured search host into a URL.
///
/// Accepts a full URL (`https://search.internal:443`), a `host:port` pair or a bare
/// host. Values without a scheme use `http`; a bare host gets port 9200.
///
/// # Example
///
/// ```
/// use catalog_search_repository::normalize_search_url;
///
/// let url = normalize_search_url("search.internal").expect("valid host");
/// assert_eq!(url.as_str(), "http://search.internal:9200/");
/// ```
pub fn normalize_search_url(host: &str) -> Result<Url, SearchIndexError> {
    normalize_with(host, "http", DEFAULT_SEARCH_PORT)
}

/// Turn an AWS-hosted search domain into a URL.
///
/// Same rules as [`normalize_search_url`], but values without a scheme use `https`
/// and a bare host gets port 443.
pub fn normalize_aws_search_url(host: &str) -> Result<Url, SearchIndexError> {
    normalize_with(host, "https", DEFAULT_AWS_SEARCH_PORT)
}

fn normalize_with(host: &str, scheme: &str, default_port: u16) -> Result<Url, SearchIndexError> {
    let host = host.trim();
    if host.is_empty() {
        return Err(SearchIndexError::validation("Search host is required"));
    }

    let candidate = if host.contains("://") {
        host.to_string()
    } else if host.contains(':') {
        format!("{}://{}", scheme, host)
    } else {
        format!("{}://{}:{}", scheme, host, default_port)
    };

    Url::parse(&candidate)
        .map_err(|e| SearchIndexError::validation(format!("Invalid search host '{}': {}", host, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_url_is_kept() {
        let url = normalize_search_url("https://search.internal:443").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("search.internal"));
    }

    #[test]
    fn test_host_and_port() {
        let url = normalize_search_url("localhost:9201").unwrap();
        assert_eq!(url.as_str(), "http://localhost:9201/");
    }

    #[test]
    fn test_bare_host_gets_default_port() {
        let url = normalize_search_url("opensearch").unwrap();
        assert_eq!(url.port(), Some(9200));
        assert_eq!(url.scheme(), "http");
    }

    #[test]
    fn test_aws_host_uses_tls_on_443() {
        let url = normalize_aws_search_url("search-catalog.us-east-1.es.amazonaws.com").unwrap();
        assert_eq!(url.scheme(), "https");
        // 443 is the https default, so the URL reports it as implicit.
        assert_eq!(url.port_or_known_default(), Some(443));
        assert_eq!(url.port(), None);

        let url = normalize_aws_search_url("http://localhost:9200").unwrap();
        assert_eq!(url.as_str(), "http://localhost:9200/");
    }

    #[test]
    fn test_empty_host() {
        let result = normalize_search_url("  ");
        assert!(matches!(
            result.unwrap_err(),
            SearchIndexError::ValidationError(_)
        ));
    }

    #[test]
    fn test_invalid_port() {
        assert!(normalize_search_url("localhost:notaport").is_err());
    }
}
