//! Test doubles shared by the ingest unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use abstracts_repository::{BulkIndexSummary, DocumentStore, StoreError};
use abstracts_shared::{Article, SearchQuery};

/// Mock document store that records bulk writes and can be scripted to fail.
pub struct MockStore {
    /// Errors returned by the next bulk calls, in order. Empty means success.
    pub bulk_failures: Mutex<VecDeque<StoreError>>,
    /// Item failures reported in every accepted bulk response.
    pub item_failures: usize,
    /// Every successful bulk write, in order.
    pub written: Mutex<Vec<Vec<Article>>>,
    pub bulk_calls: AtomicUsize,
    pub ensure_index_calls: AtomicUsize,
    pub healthy: bool,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            bulk_failures: Mutex::new(VecDeque::new()),
            item_failures: 0,
            written: Mutex::new(Vec::new()),
            bulk_calls: AtomicUsize::new(0),
            ensure_index_calls: AtomicUsize::new(0),
            healthy: true,
        }
    }

    /// Fail the next `count` bulk calls with `error`.
    pub fn failing(count: usize, error: StoreError) -> Self {
        let store = Self::new();
        store
            .bulk_failures
            .try_lock()
            .expect("fresh mutex")
            .extend(std::iter::repeat(error).take(count));
        store
    }

    pub fn bulk_calls(&self) -> usize {
        self.bulk_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MockStore {
    async fn ensure_index_exists(&self) -> Result<(), StoreError> {
        self.ensure_index_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn bulk_index(&self, articles: &[Article]) -> Result<BulkIndexSummary, StoreError> {
        self.bulk_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.bulk_failures.lock().await.pop_front() {
            return Err(error);
        }

        self.written.lock().await.push(articles.to_vec());

        let failed = self.item_failures.min(articles.len());
        Ok(BulkIndexSummary {
            total: articles.len(),
            succeeded: articles.len() - failed,
            failed,
            first_error: (failed > 0).then(|| "mapper_parsing_exception".to_string()),
        })
    }

    async fn index_document(&self, _article: &Article) -> Result<String, StoreError> {
        Ok("mock-id".to_string())
    }

    async fn search(&self, _query: &SearchQuery) -> Result<Vec<Article>, StoreError> {
        Ok(vec![])
    }

    async fn get_document(&self, _id: &str) -> Result<Option<Article>, StoreError> {
        Ok(None)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(self.healthy)
    }
}

/// `n` valid articles titled `Article 0..n`.
pub fn articles(n: usize) -> Vec<Article> {
    (0..n)
        .map(|i| {
            Article::new(
                format!("Article {}", i),
                format!("https://en.wikipedia.org/wiki/Article_{}", i),
                "a".repeat(120),
            )
        })
        .collect()
}
