//! # Abstracts Shared
//!
//! Types shared by the ingestion pipeline, the document store repository and
//! the HTTP API, plus the tracing setup used by both binaries.

pub mod article;
pub mod search;
pub mod telemetry;

pub use article::{Article, DEFAULT_MIN_SUMMARY_SIZE, TITLE_PREFIX};
pub use search::{SearchQuery, DEFAULT_SEARCH_LIMIT};
