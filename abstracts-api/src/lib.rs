//! # Abstracts API
//!
//! HTTP endpoints to add, fetch and search articles in the document store.
//! Every request talks to the store independently; handlers share no mutable
//! state.

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use config::ApiConfig;
pub use error::ApiError;
pub use state::AppState;

/// Build the API router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route(
            "/articles",
            post(handlers::add_article_handler).get(handlers::search_articles_handler),
        )
        .route("/articles/{id}", get(handlers::get_article_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
