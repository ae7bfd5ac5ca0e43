//! # Abstracts Repository
//!
//! This crate provides the document store interface used by the ingestion
//! pipeline and the HTTP API, together with a concrete implementation for
//! OpenSearch (and wire-compatible Elasticsearch) clusters.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use config::StoreConfig;
pub use errors::{ConfigError, StoreError};
pub use interfaces::DocumentStore;
pub use opensearch::OpenSearchClient;
pub use types::BulkIndexSummary;
