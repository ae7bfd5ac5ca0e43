//! HTTP request handlers for the abstracts API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, error};

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{SearchParams, StatusResponse};
use abstracts_shared::{Article, SearchQuery, DEFAULT_SEARCH_LIMIT};

/// Health check handler.
pub async fn health_handler() -> Json<StatusResponse> {
    Json(StatusResponse::ok(None))
}

/// Add one article and return the identifier assigned by the store.
///
/// Store failures are reported as `{"status": "fail", "details": <msg>}`.
pub async fn add_article_handler(
    State(state): State<AppState>,
    Json(article): Json<Article>,
) -> (StatusCode, Json<StatusResponse>) {
    match state.store.index_document(&article).await {
        Ok(id) => {
            debug!(id = %id, "Article added");
            (StatusCode::OK, Json(StatusResponse::ok(Some(id))))
        }
        Err(e) => {
            error!(error = %e, "Failed to add article");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StatusResponse::fail(e.to_string())),
            )
        }
    }
}

/// Fuzzy full-text search over article abstracts.
///
/// Articles come back in the store's ranked order, at most `limit` of them.
pub async fn search_articles_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Article>>, ApiError> {
    let query =
        SearchQuery::new(params.q).with_limit(params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT));

    let mut articles = state.store.search(&query).await?;
    articles.truncate(query.limit);

    Ok(Json(articles))
}

/// Fetch one article by identifier.
pub async fn get_article_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Article>, ApiError> {
    state
        .store
        .get_document(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}
