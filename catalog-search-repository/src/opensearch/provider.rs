//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use opensearch::{
    auth::Credentials,
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts},
    DeleteParts, IndexParts, OpenSearch, UpdateParts,
};
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::errors::SearchIndexError;
use crate::index_config::IndexConfig;
use crate::interfaces::SearchIndexProvider;
use crate::utils::{normalize_aws_search_url, normalize_search_url};

/// Username and password for HTTP basic authentication.
#[derive(Debug, Clone)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

/// How requests to the cluster are authenticated.
#[derive(Debug, Clone)]
pub enum SearchAuth {
    None,
    Basic(BasicAuth),
    /// AWS SigV4 request signing with credentials from the default AWS provider chain.
    AwsSigV4 { region: String },
}

/// Signing name of the AWS OpenSearch service.
const AWS_SERVICE_NAME: &str = "es";

/// OpenSearch provider implementation.
///
/// # Example
///
/// ```ignore
/// use catalog_search_repository::{IndexConfig, OpenSearchProvider, SearchAuth, SearchIndexProvider};
/// use catalog_search_shared::IndexKind;
///
/// let provider = OpenSearchProvider::new("localhost:9200", SearchAuth::None).await?;
/// let index = IndexConfig::default_for(IndexKind::Users);
/// provider.upsert_document(&index, 42, &serde_json::json!({ "id": 42 })).await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the specified host.
    ///
    /// # Arguments
    ///
    /// * `host` - URL, `host:port` or bare host of the OpenSearch server
    /// * `auth` - How requests are authenticated. AWS-hosted domains default to
    ///   https on port 443.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If the host is invalid or transport setup fails
    pub async fn new(host: &str, auth: SearchAuth) -> Result<Self, SearchIndexError> {
        let url = match auth {
            SearchAuth::AwsSigV4 { .. } => normalize_aws_search_url(host)?,
            _ => normalize_search_url(host)?,
        };

        let conn_pool = SingleNodeConnectionPool::new(url.clone());
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();
        match auth {
            SearchAuth::None => {}
            SearchAuth::Basic(basic) => {
                builder = builder.auth(Credentials::Basic(basic.username, basic.password));
            }
            SearchAuth::AwsSigV4 { region } => {
                builder = builder
                    .auth(Self::aws_credentials(region).await?)
                    .service_name(AWS_SERVICE_NAME);
            }
        }
        let transport = builder
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %url, "Created OpenSearch provider");

        Ok(Self { client })
    }

    /// Load SigV4 credentials for `region` from the default AWS provider chain.
    async fn aws_credentials(region: String) -> Result<Credentials, SearchIndexError> {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region))
            .load()
            .await;

        let credentials = sdk_config
            .credentials_provider()
            .ok_or_else(|| SearchIndexError::connection("No AWS credentials provider available"))?;
        let region = sdk_config
            .region()
            .cloned()
            .ok_or_else(|| SearchIndexError::connection("No AWS region configured"))?;

        Ok(Credentials::AwsSigV4(credentials, region))
    }

    /// Turn a non-success response into an error built by `to_error`.
    ///
    /// A 404 is accepted when `allow_not_found` is set.
    async fn check_response(
        response: Response,
        allow_not_found: bool,
        action: &str,
        to_error: fn(String) -> SearchIndexError,
    ) -> Result<(), SearchIndexError> {
        let status = response.status_code();
        if status.is_success() || (allow_not_found && status.as_u16() == 404) {
            return Ok(());
        }

        let error_body = response.text().await.unwrap_or_default();
        error!(status = %status, body = %error_body, action = action, "Request failed");
        Err(to_error(format!(
            "{} failed with status {}: {}",
            action, status, error_body
        )))
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    async fn index_exists(&self, index: &IndexConfig) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index.index_name.as_str()]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        match response.status_code().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => Err(SearchIndexError::parse(format!(
                "Unexpected status {} checking index {}",
                status, index.index_name
            ))),
        }
    }

    async fn create_index(&self, index: &IndexConfig) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&index.index_name))
            .body(index.settings.clone())
            .send()
            .await
            .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        Self::check_response(
            response,
            false,
            "Create index",
            SearchIndexError::IndexCreationError,
        )
        .await?;

        info!(
            index = %index.index_name,
            type_name = %index.type_name,
            "Index created"
        );
        Ok(())
    }

    async fn delete_index(&self, index: &IndexConfig) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index.index_name.as_str()]))
            .send()
            .await
            .map_err(|e| SearchIndexError::index_deletion(e.to_string()))?;

        // 404 is acceptable - index may not exist
        Self::check_response(
            response,
            true,
            "Delete index",
            SearchIndexError::IndexDeletionError,
        )
        .await?;

        info!(index = %index.index_name, "Index deleted");
        Ok(())
    }

    async fn index_document(
        &self,
        index: &IndexConfig,
        id: i64,
        document: &Value,
    ) -> Result<(), SearchIndexError> {
        let doc_id = id.to_string();

        let response = self
            .client
            .index(IndexParts::IndexId(&index.index_name, &doc_id))
            .body(document)
            .send()
            .await
            .map_err(|e| SearchIndexError::index(e.to_string()))?;

        Self::check_response(response, false, "Index", SearchIndexError::IndexError).await?;

        debug!(index = %index.index_name, doc_id = %doc_id, "Document indexed");
        Ok(())
    }

    async fn upsert_document(
        &self,
        index: &IndexConfig,
        id: i64,
        document: &Value,
    ) -> Result<(), SearchIndexError> {
        let doc_id = id.to_string();

        // API reference: https://docs.opensearch.org/latest/api-reference/document-apis/update-document/#using-the-upsert-operation
        let response = self
            .client
            .update(UpdateParts::IndexId(&index.index_name, &doc_id))
            .body(json!({
                "doc": document,
                "doc_as_upsert": true
            }))
            .send()
            .await
            .map_err(|e| SearchIndexError::update(e.to_string()))?;

        Self::check_response(response, false, "Update", SearchIndexError::UpdateError).await?;

        debug!(index = %index.index_name, doc_id = %doc_id, "Document updated/created");
        Ok(())
    }

    async fn delete_document(&self, index: &IndexConfig, id: i64) -> Result<(), SearchIndexError> {
        let doc_id = id.to_string();

        let response = self
            .client
            .delete(DeleteParts::IndexId(&index.index_name, &doc_id))
            .send()
            .await
            .map_err(|e| SearchIndexError::delete(e.to_string()))?;

        // 404 is acceptable - document may not exist
        Self::check_response(response, true, "Delete", SearchIndexError::DeleteError).await?;

        debug!(index = %index.index_name, doc_id = %doc_id, "Document deleted");
        Ok(())
    }
}
