//! Search query parameters.

/// Number of hits returned when the caller gives no limit.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// A full-text search over article abstracts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free text matched fuzzily against the `text` field.
    pub query: String,
    /// Maximum number of hits to return.
    pub limit: usize,
}

impl SearchQuery {
    /// Create a query with the default limit.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    /// Set the maximum number of hits.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}
