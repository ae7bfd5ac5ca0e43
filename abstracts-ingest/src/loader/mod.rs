//! Loader module for the abstracts ingest.
//!
//! Drains the article stream in fixed-size batches and submits each batch to
//! the document store as one bulk request.
//!
//! Per batch the loader moves through `pending -> sent` on success, or
//! `pending -> retry(1..=n) -> sent | fatal` on transient failures, where `n`
//! is the number of configured retry delays. A fatal batch aborts the whole
//! load. Batches carry no idempotency key: a request that reached the store
//! but whose response was lost will be written again on retry.

mod batches;

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::errors::IngestError;
use abstracts_repository::{BulkIndexSummary, DocumentStore};
use abstracts_shared::Article;

pub use batches::Batches;

/// Default number of articles per bulk request.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Default cap on the number of bulk requests per run.
pub const DEFAULT_MAX_BATCHES: usize = 10_000;

/// Default delays before the 1st, 2nd and 3rd retry.
pub const DEFAULT_RETRY_DELAYS_MS: [u64; 3] = [1_000, 5_000, 30_000];

/// Configuration for the bulk loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Number of articles per bulk request.
    pub batch_size: usize,
    /// Stop after this many batches even if the stream has more.
    pub max_batches: usize,
    /// Delay before each retry, in milliseconds. Its length is the retry count.
    pub retry_delays_ms: Vec<u64>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_batches: DEFAULT_MAX_BATCHES,
            retry_delays_ms: DEFAULT_RETRY_DELAYS_MS.to_vec(),
        }
    }
}

impl LoaderConfig {
    /// Number of retries after the initial attempt.
    pub fn max_retries(&self) -> usize {
        self.retry_delays_ms.len()
    }

    /// Delay before retry number `retry` (1-based).
    fn retry_delay(&self, retry: usize) -> Duration {
        let ms = self
            .retry_delays_ms
            .get(retry.saturating_sub(1))
            .or(self.retry_delays_ms.last())
            .copied()
            .unwrap_or(0);
        Duration::from_millis(ms)
    }
}

/// Totals for one load run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Bulk requests acknowledged by the store.
    pub batches: usize,
    /// Articles sent in acknowledged requests.
    pub documents: usize,
    /// Retries spent across all batches.
    pub retries: usize,
    /// Items the store reported as failed inside accepted requests.
    pub item_failures: usize,
    /// Whether `max_batches` batches were sent.
    ///
    /// The stream is never read past the cap, so this is also set when the
    /// stream happens to end exactly at the cap.
    pub capped: bool,
}

/// Result of submitting one batch.
#[derive(Debug)]
struct BatchOutcome {
    summary: BulkIndexSummary,
    attempts: usize,
}

/// Loader that streams articles into the document store.
///
/// The loader is responsible for:
/// - Batching articles in arrival order
/// - Retrying failed bulk requests on a fixed delay schedule
/// - Enforcing the batch cap
pub struct BulkLoader {
    store: Arc<dyn DocumentStore>,
    config: LoaderConfig,
}

impl BulkLoader {
    /// Create a new loader with default configuration.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            config: LoaderConfig::default(),
        }
    }

    /// Create a new loader with custom configuration.
    pub fn with_config(store: Arc<dyn DocumentStore>, config: LoaderConfig) -> Self {
        Self { store, config }
    }

    /// Load every article of the stream, batch by batch.
    ///
    /// Returns once the stream is exhausted or `max_batches` batches have been
    /// sent. The next batch is only pulled from the stream after the previous
    /// one was acknowledged. Stream errors and exhausted retries abort the load.
    #[instrument(
        skip(self, records),
        fields(batch_size = self.config.batch_size, max_batches = self.config.max_batches)
    )]
    pub async fn load<I>(&self, records: I) -> Result<LoadSummary, IngestError>
    where
        I: Iterator<Item = Result<Article, IngestError>>,
    {
        let mut summary = LoadSummary::default();
        let mut batches = Batches::new(records, self.config.batch_size);

        loop {
            if summary.batches >= self.config.max_batches {
                info!(max_batches = self.config.max_batches, "Batch limit reached");
                summary.capped = true;
                break;
            }

            let batch = match batches.next() {
                Some(batch) => batch?,
                None => break,
            };
            let batch_no = summary.batches + 1;

            info!(batch = batch_no, count = batch.len(), "Processing batch request");

            let outcome = self.submit_with_retry(batch_no, &batch).await?;

            summary.batches += 1;
            summary.documents += batch.len();
            summary.retries += outcome.attempts - 1;
            summary.item_failures += outcome.summary.failed;
        }

        info!(
            batches = summary.batches,
            documents = summary.documents,
            retries = summary.retries,
            item_failures = summary.item_failures,
            "Load finished"
        );
        Ok(summary)
    }

    /// Submit one batch, retrying transient failures.
    ///
    /// The identical batch is resent after each configured delay. Errors that
    /// are not transient fail immediately.
    async fn submit_with_retry(
        &self,
        batch_no: usize,
        batch: &[Article],
    ) -> Result<BatchOutcome, IngestError> {
        let max_retries = self.config.max_retries();
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.store.bulk_index(batch).await {
                Ok(summary) => {
                    if attempt > 1 {
                        info!(batch = batch_no, attempt = attempt, "Bulk request succeeded after retry");
                    }
                    if summary.has_failures() {
                        warn!(
                            batch = batch_no,
                            failed = summary.failed,
                            total = summary.total,
                            reason = summary.first_error.as_deref().unwrap_or("unknown"),
                            "Store rejected some documents"
                        );
                    } else {
                        debug!(batch = batch_no, count = summary.total, "Batch indexed");
                    }
                    return Ok(BatchOutcome {
                        summary,
                        attempts: attempt,
                    });
                }
                Err(e) if !e.is_transient() => {
                    error!(batch = batch_no, error = %e, "Non-retryable bulk failure");
                    return Err(IngestError::StoreError(e));
                }
                Err(e) if attempt > max_retries => {
                    error!(
                        batch = batch_no,
                        attempts = attempt,
                        error = %e,
                        "Bulk request failed, giving up"
                    );
                    return Err(IngestError::RetriesExhausted {
                        batch: batch_no,
                        attempts: attempt,
                        source: e,
                    });
                }
                Err(e) => {
                    let delay = self.config.retry_delay(attempt);
                    warn!(
                        batch = batch_no,
                        attempt = attempt,
                        max_retries = max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Bulk request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Ensure the target collection exists.
    pub async fn ensure_index(&self) -> Result<(), IngestError> {
        self.store.ensure_index_exists().await.map_err(IngestError::from)
    }

    /// Check if the document store is healthy.
    pub async fn health_check(&self) -> Result<bool, IngestError> {
        self.store.health_check().await.map_err(IngestError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{articles, MockStore};
    use abstracts_repository::StoreError;
    use tokio::time::Instant;

    fn stream(articles: Vec<Article>) -> impl Iterator<Item = Result<Article, IngestError>> {
        articles.into_iter().map(Ok)
    }

    fn config(batch_size: usize, max_batches: usize) -> LoaderConfig {
        LoaderConfig {
            batch_size,
            max_batches,
            ..LoaderConfig::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = LoaderConfig::default();

        assert_eq!(config.batch_size, 100);
        assert_eq!(config.max_batches, 10_000);
        assert_eq!(config.max_retries(), 3);
        assert_eq!(config.retry_delay(1), Duration::from_secs(1));
        assert_eq!(config.retry_delay(2), Duration::from_secs(5));
        assert_eq!(config.retry_delay(3), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_load_in_order_batches() {
        let store = Arc::new(MockStore::new());
        let loader = BulkLoader::with_config(store.clone(), config(100, 10));

        let input = articles(250);
        let summary = loader.load(stream(input.clone())).await.unwrap();

        assert_eq!(summary.batches, 3);
        assert_eq!(summary.documents, 250);
        assert_eq!(summary.retries, 0);
        assert!(!summary.capped);

        let written = store.written.lock().await;
        let sizes: Vec<usize> = written.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![100, 100, 50]);
        let flattened: Vec<Article> = written.iter().flatten().cloned().collect();
        assert_eq!(flattened, input);
    }

    #[tokio::test]
    async fn test_empty_stream_sends_nothing() {
        let store = Arc::new(MockStore::new());
        let loader = BulkLoader::new(store.clone());

        let summary = loader.load(stream(vec![])).await.unwrap();

        assert_eq!(summary, LoadSummary::default());
        assert_eq!(store.bulk_calls(), 0);
    }

    #[tokio::test]
    async fn test_batch_cap_stops_loading() {
        let store = Arc::new(MockStore::new());
        let loader = BulkLoader::with_config(store.clone(), config(10, 2));

        let summary = loader.load(stream(articles(55))).await.unwrap();

        assert_eq!(summary.batches, 2);
        assert_eq!(summary.documents, 20);
        assert!(summary.capped);
        assert_eq!(store.bulk_calls(), 2);
    }

    #[tokio::test]
    async fn test_batch_cap_reached_on_exact_stream_end() {
        let store = Arc::new(MockStore::new());
        let loader = BulkLoader::with_config(store.clone(), config(10, 2));

        let mut source = stream(articles(20));
        let summary = loader.load(source.by_ref()).await.unwrap();

        assert_eq!(summary.batches, 2);
        assert_eq!(summary.documents, 20);
        assert!(summary.capped);
        assert_eq!(source.count(), 0);
    }

    #[tokio::test]
    async fn test_stream_ending_below_cap_is_not_capped() {
        let store = Arc::new(MockStore::new());
        let loader = BulkLoader::with_config(store, config(10, 3));

        let summary = loader.load(stream(articles(20))).await.unwrap();

        assert_eq!(summary.batches, 2);
        assert!(!summary.capped);
    }

    #[tokio::test]
    async fn test_batch_cap_does_not_pull_extra_records() {
        let store = Arc::new(MockStore::new());
        let loader = BulkLoader::with_config(store, config(10, 1));

        let mut source = stream(articles(30));
        loader.load(source.by_ref()).await.unwrap();

        assert_eq!(source.count(), 20);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_then_success() {
        let store = Arc::new(MockStore::failing(3, StoreError::connection("connection refused")));
        let loader = BulkLoader::with_config(store.clone(), config(100, 10));

        let start = Instant::now();
        let summary = loader.load(stream(articles(5))).await.unwrap();

        assert_eq!(store.bulk_calls(), 4);
        assert_eq!(store.written.lock().await.len(), 1);
        assert_eq!(summary.batches, 1);
        assert_eq!(summary.retries, 3);
        assert!(start.elapsed() >= Duration::from_secs(36));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_exhausted_is_fatal() {
        let store = Arc::new(MockStore::failing(
            10,
            StoreError::bulk_index("Bulk request failed with status 503"),
        ));
        let loader = BulkLoader::with_config(store.clone(), config(100, 10));

        let result = loader.load(stream(articles(150))).await;

        match result {
            Err(IngestError::RetriesExhausted { batch, attempts, .. }) => {
                assert_eq!(batch, 1);
                assert_eq!(attempts, 4);
            }
            other => panic!("expected RetriesExhausted, got {:?}", other),
        }
        assert_eq!(store.bulk_calls(), 4);
        assert!(store.written.lock().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_retry_schedule() {
        let store = Arc::new(MockStore::failing(2, StoreError::connection("timeout")));
        let loader = BulkLoader::with_config(
            store.clone(),
            LoaderConfig {
                retry_delays_ms: vec![10],
                ..LoaderConfig::default()
            },
        );

        let result = loader.load(stream(articles(1))).await;

        assert!(matches!(
            result,
            Err(IngestError::RetriesExhausted { attempts: 2, .. })
        ));
        assert_eq!(store.bulk_calls(), 2);
    }

    #[tokio::test]
    async fn test_non_transient_error_is_not_retried() {
        let store = Arc::new(MockStore::failing(1, StoreError::serialization("bad document")));
        let loader = BulkLoader::new(store.clone());

        let result = loader.load(stream(articles(3))).await;

        assert!(matches!(result, Err(IngestError::StoreError(_))));
        assert_eq!(store.bulk_calls(), 1);
    }

    #[tokio::test]
    async fn test_stream_error_aborts_after_sent_batches() {
        let store = Arc::new(MockStore::new());
        let loader = BulkLoader::with_config(store.clone(), config(2, 10));

        let records = stream(articles(3))
            .chain(std::iter::once(Err(IngestError::parse("unexpected end tag"))))
            .chain(stream(articles(4)));

        let result = loader.load(records).await;

        assert!(matches!(result, Err(IngestError::ParseError(_))));
        assert_eq!(store.written.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_item_failures_are_counted_not_retried() {
        let mut store = MockStore::new();
        store.item_failures = 1;
        let store = Arc::new(store);
        let loader = BulkLoader::with_config(store.clone(), config(5, 10));

        let summary = loader.load(stream(articles(10))).await.unwrap();

        assert_eq!(store.bulk_calls(), 2);
        assert_eq!(summary.item_failures, 2);
        assert_eq!(summary.retries, 0);
    }
}
