//! Error types and HTTP mapping for the abstracts API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::types::FailureResponse;
use abstracts_repository::StoreError;

/// Errors returned by read handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No article with the requested identifier.
    #[error("Article not found")]
    NotFound,

    /// The store failed or answered with an unexpected payload.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Convert error to appropriate HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::NotFound => (status, Json(json!({ "status": "not found" }))).into_response(),
            ApiError::Store(e) => {
                error!(error = %e, "Store request failed");
                (status, Json(FailureResponse::new(e.to_string()))).into_response()
            }
        }
    }
}
