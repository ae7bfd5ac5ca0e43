//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `DocumentStore` using
//! the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    auth::Credentials,
    cert::CertificateValidation,
    cluster::ClusterHealthParts,
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts},
    BulkParts, GetParts, IndexParts, OpenSearch, SearchParts,
};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::config::StoreConfig;
use crate::errors::StoreError;
use crate::interfaces::DocumentStore;
use crate::opensearch::bulk::{bulk_lines, parse_bulk_response};
use crate::opensearch::index_config::index_mapping;
use crate::opensearch::queries::build_search_query;
use crate::types::BulkIndexSummary;
use abstracts_shared::{Article, SearchQuery};

/// OpenSearch client implementation.
///
/// Every operation targets the single collection named in the configuration.
///
/// # Example
///
/// ```ignore
/// let config = StoreConfig::from_env()?;
/// let client = OpenSearchClient::new(&config)?;
///
/// client.ensure_index_exists().await?;
/// let id = client.index_document(&Article::new("Foo", "http://x/Foo", "...")).await?;
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
    index: String,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client from the store configuration.
    ///
    /// No request is made here; an unreachable store shows up on first use.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(StoreError)` - If the URL is invalid or the transport cannot be built
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let parsed_url =
            Url::parse(&config.url).map_err(|e| StoreError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .timeout(config.timeout);

        if let Some((username, password)) = config.credentials() {
            builder = builder.auth(Credentials::Basic(username.to_string(), password.to_string()));
        }

        if config.accept_invalid_certs {
            warn!(url = %config.url, "TLS certificate verification is disabled");
            builder = builder.cert_validation(CertificateValidation::None);
        }

        let transport = builder
            .build()
            .map_err(|e| StoreError::connection(e.to_string()))?;

        info!(
            url = %config.url,
            index = %config.index,
            authenticated = config.credentials().is_some(),
            "Created OpenSearch client"
        );

        Ok(Self {
            client: OpenSearch::new(transport),
            index: config.index.clone(),
        })
    }

    /// Name of the collection this client reads and writes.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Extract the ranked hit list from a search response body.
    fn parse_search_hits(body: &Value) -> Result<Vec<Article>, StoreError> {
        let hits = body
            .get("hits")
            .and_then(|h| h.get("hits"))
            .and_then(Value::as_array)
            .ok_or_else(|| StoreError::parse(format!("Search response has no hits: {}", body)))?;

        hits.iter().map(Self::parse_source).collect()
    }

    /// Deserialize the `_source` payload of a hit or document.
    fn parse_source(hit: &Value) -> Result<Article, StoreError> {
        let source = hit
            .get("_source")
            .ok_or_else(|| StoreError::parse(format!("Document has no _source: {}", hit)))?;

        serde_json::from_value(source.clone())
            .map_err(|e| StoreError::parse(format!("Malformed article {}: {}", source, e)))
    }

    /// Extract the store-assigned identifier from an index response.
    fn parse_document_id(body: &Value) -> Result<String, StoreError> {
        body.get("_id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| StoreError::parse(format!("Index response has no _id: {}", body)))
    }
}

#[async_trait]
impl DocumentStore for OpenSearchClient {
    /// Create the collection with the article mapping unless it already exists.
    #[instrument(skip(self), fields(index = %self.index))]
    async fn ensure_index_exists(&self) -> Result<(), StoreError> {
        let exists = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[self.index.as_str()]))
            .send()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        let status = exists.status_code();
        if status.is_success() {
            debug!("Index already exists");
            return Ok(());
        }
        if status.as_u16() != 404 {
            return Err(StoreError::index_creation(format!(
                "Unexpected status {} while checking index",
                status
            )));
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&self.index))
            .body(index_mapping())
            .send()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            // Another writer may have created it between the two calls
            if error_body.contains("resource_already_exists_exception") {
                debug!("Index created concurrently");
                return Ok(());
            }
            error!(status = %status, body = %error_body, "Index creation failed");
            return Err(StoreError::index_creation(format!(
                "Index creation failed with status {}: {}",
                status, error_body
            )));
        }

        info!("Created index");
        Ok(())
    }

    /// Send one `_bulk` request for the batch.
    ///
    /// A non-success status is an error for the whole request. Item-level
    /// failures inside an accepted request are reported in the summary.
    #[instrument(skip(self, articles), fields(count = articles.len()))]
    async fn bulk_index(&self, articles: &[Article]) -> Result<BulkIndexSummary, StoreError> {
        if articles.is_empty() {
            return Ok(BulkIndexSummary::default());
        }

        let body: Vec<JsonBody<Value>> = bulk_lines(&self.index, articles)?
            .into_iter()
            .map(JsonBody::from)
            .collect();

        let response = self
            .client
            .bulk(BulkParts::None)
            .body(body)
            .send()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(StoreError::bulk_index(format!(
                "Bulk request failed with status {}: {}",
                status, error_body
            )));
        }

        match response.json::<Value>().await {
            Ok(body) => Ok(parse_bulk_response(&body, articles.len())),
            Err(e) => {
                // The request was accepted; without a body we cannot see item failures
                warn!(error = %e, "Could not read bulk response body");
                Ok(BulkIndexSummary::all_succeeded(articles.len()))
            }
        }
    }

    #[instrument(skip(self, article))]
    async fn index_document(&self, article: &Article) -> Result<String, StoreError> {
        let response = self
            .client
            .index(IndexParts::Index(&self.index))
            .body(article)
            .send()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index request failed");
            return Err(StoreError::index(format!(
                "Index failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| StoreError::parse(e.to_string()))?;
        let id = Self::parse_document_id(&body)?;

        debug!(id = %id, "Document indexed");
        Ok(id)
    }

    #[instrument(skip(self), fields(query = %query.query, limit = query.limit))]
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Article>, StoreError> {
        let response = self
            .client
            .search(SearchParts::Index(&[self.index.as_str()]))
            .body(build_search_query(query))
            .send()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Search request failed");
            return Err(StoreError::query(format!(
                "Search failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| StoreError::parse(e.to_string()))?;

        let mut articles = Self::parse_search_hits(&body)?;
        articles.truncate(query.limit);

        debug!(hits = articles.len(), "Search completed");
        Ok(articles)
    }

    #[instrument(skip(self))]
    async fn get_document(&self, id: &str) -> Result<Option<Article>, StoreError> {
        let response = self
            .client
            .get(GetParts::IndexId(&self.index, id))
            .send()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            debug!("Document not found");
            return Ok(None);
        }
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Get request failed");
            return Err(StoreError::query(format!(
                "Get failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| StoreError::parse(e.to_string()))?;

        Self::parse_source(&body).map(Some)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        if !response.status_code().is_success() {
            return Ok(false);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| StoreError::parse(e.to_string()))?;

        let cluster_status = body.get("status").and_then(Value::as_str).unwrap_or("red");
        debug!(cluster_status = %cluster_status, "Cluster health");
        Ok(matches!(cluster_status, "green" | "yellow"))
    }
}
