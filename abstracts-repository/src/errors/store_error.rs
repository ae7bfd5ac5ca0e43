//! Document store error types.
//!
//! This module defines the error types that can occur while talking to the
//! document store.

use thiserror::Error;

/// Errors that can occur during document store operations.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// The request never produced a response (DNS, TCP, TLS, timeout).
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Search or point lookup failed.
    #[error("Query error: {0}")]
    QueryError(String),

    /// Failed to index a single document.
    #[error("Index error: {0}")]
    IndexError(String),

    /// The bulk request was rejected with a non-success status.
    #[error("Bulk index error: {0}")]
    BulkIndexError(String),

    /// Failed to create the collection.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// The store answered with a payload of unexpected shape.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize data for the store.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl StoreError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create an index error.
    pub fn index(msg: impl Into<String>) -> Self {
        Self::IndexError(msg.into())
    }

    /// Create a bulk index error.
    pub fn bulk_index(msg: impl Into<String>) -> Self {
        Self::BulkIndexError(msg.into())
    }

    /// Create an index creation error.
    pub fn index_creation(msg: impl Into<String>) -> Self {
        Self::IndexCreationError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Whether retrying the identical request may succeed.
    ///
    /// Network failures and rejected bulk requests are transient. Everything
    /// else either cannot change on retry or already reached the store.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ConnectionError(_) | Self::BulkIndexError(_))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
