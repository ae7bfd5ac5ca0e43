//! Request and response bodies for the abstracts API.

use serde::{Deserialize, Serialize};

/// Generic status body.
///
/// `details` is always serialized, as `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub details: Option<String>,
}

impl StatusResponse {
    /// A successful status, optionally carrying a detail such as a new id.
    pub fn ok(details: Option<String>) -> Self {
        Self {
            status: "ok".to_string(),
            details,
        }
    }

    /// A failed status with a diagnostic message.
    pub fn fail(details: impl Into<String>) -> Self {
        Self {
            status: "fail".to_string(),
            details: Some(details.into()),
        }
    }
}

/// Body returned when a read fails on the store side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureResponse {
    pub status: String,
    pub description: String,
}

impl FailureResponse {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            status: "fail".to_string(),
            description: description.into(),
        }
    }
}

/// Query string of `GET /articles`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    /// Free text to match.
    pub q: String,
    /// Maximum number of articles returned (default 10).
    pub limit: Option<usize>,
}
