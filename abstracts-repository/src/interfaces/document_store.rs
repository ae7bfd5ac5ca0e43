//! Document store trait definition.
//!
//! This module defines the abstract interface for the full-text store holding
//! the articles, allowing for different backend implementations and for mocks
//! in tests.

use async_trait::async_trait;

use crate::errors::StoreError;
use crate::types::BulkIndexSummary;
use abstracts_shared::{Article, SearchQuery};

/// Abstract interface for document store operations.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, StoreError>`. Callers decide which errors are
/// worth retrying via [`StoreError::is_transient`].
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Ensure the target collection exists with the article mapping.
    ///
    /// Creates it when missing. Succeeds without changes when it already exists.
    async fn ensure_index_exists(&self) -> Result<(), StoreError>;

    /// Index many articles in one bulk request.
    ///
    /// # Returns
    ///
    /// * `Ok(BulkIndexSummary)` - The request was accepted; per-item outcomes inside
    /// * `Err(StoreError)` - The request failed as a whole
    async fn bulk_index(&self, articles: &[Article]) -> Result<BulkIndexSummary, StoreError>;

    /// Index a single article and return the identifier assigned by the store.
    async fn index_document(&self, article: &Article) -> Result<String, StoreError>;

    /// Run a fuzzy full-text query against the article text.
    ///
    /// Hits are returned in the store's ranked order, at most `query.limit`.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Article>, StoreError>;

    /// Look up an article by identifier.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Article))` - The article exists
    /// * `Ok(None)` - No article with this identifier
    /// * `Err(StoreError)` - The lookup failed
    async fn get_document(&self, id: &str) -> Result<Option<Article>, StoreError>;

    /// Check if the store is healthy and reachable.
    async fn health_check(&self) -> Result<bool, StoreError>;
}
