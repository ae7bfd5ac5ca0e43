//! Application state for the abstracts API.

use std::sync::Arc;

use abstracts_repository::DocumentStore;

/// Shared application state for Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Document store holding the articles.
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    /// Create the state around a document store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}
