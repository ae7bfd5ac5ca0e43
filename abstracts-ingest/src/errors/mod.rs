//! Error types for the abstracts ingest.

use abstracts_repository::StoreError;
use thiserror::Error;

/// Errors that can occur in the abstracts ingest.
///
/// Every variant is fatal for the ingestion run. Records that fail validation
/// are not errors; the parser drops them silently.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The XML stream is not well-formed.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Reading the input failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// A store operation failed with an error that retrying cannot fix.
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    /// A batch kept failing after every retry.
    #[error("Batch {batch} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        batch: usize,
        attempts: usize,
        #[source]
        source: StoreError,
    },

    /// Error from the loader component.
    #[error("Loader error: {0}")]
    LoaderError(String),
}

impl IngestError {
    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a loader error.
    pub fn loader(msg: impl Into<String>) -> Self {
        Self::LoaderError(msg.into())
    }
}
