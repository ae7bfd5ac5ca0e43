//! Orchestrator module for the abstracts ingest.
//!
//! Prepares the document store and drives the loader over the article stream.

use tracing::{info, instrument};

use crate::errors::IngestError;
use crate::loader::{BulkLoader, LoadSummary};
use abstracts_shared::Article;

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Create the target collection with the article mapping when missing.
    pub create_index: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self { create_index: true }
    }
}

/// Orchestrator that runs one ingestion from start to finish.
///
/// There is no cancellation: a run ends when the stream is exhausted, the
/// batch cap is reached, or a fatal error is returned.
pub struct IngestOrchestrator {
    loader: BulkLoader,
    config: OrchestratorConfig,
}

impl IngestOrchestrator {
    /// Create a new orchestrator with default configuration.
    pub fn new(loader: BulkLoader) -> Self {
        Self {
            loader,
            config: OrchestratorConfig::default(),
        }
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(loader: BulkLoader, config: OrchestratorConfig) -> Self {
        Self { loader, config }
    }

    /// Run the ingestion: check the store, prepare the collection, then load.
    #[instrument(skip(self, records))]
    pub async fn run<I>(&self, records: I) -> Result<LoadSummary, IngestError>
    where
        I: Iterator<Item = Result<Article, IngestError>>,
    {
        info!("Starting abstracts ingestion");

        if !self.loader.health_check().await? {
            return Err(IngestError::loader("Document store is unhealthy"));
        }

        if self.config.create_index {
            self.loader.ensure_index().await?;
        }

        let summary = self.loader.load(records).await?;

        info!(
            batches = summary.batches,
            documents = summary.documents,
            capped = summary.capped,
            "Ingestion complete"
        );
        Ok(summary)
    }
}
