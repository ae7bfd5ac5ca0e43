//! # Abstracts Indexer
//!
//! Main library for the abstracts indexer.
//!
//! This crate provides the entry point and configuration for streaming an
//! abstracts dump into the search index.

pub mod config;

pub use config::{Dependencies, IndexerSettings};

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An environment value could not be read.
    #[error("Invalid settings: {0}")]
    InvalidSettings(#[from] abstracts_repository::ConfigError),

    /// Ingest error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] abstracts_ingest::IngestError),

    /// Store error.
    #[error("Store error: {0}")]
    StoreError(#[from] abstracts_repository::StoreError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
