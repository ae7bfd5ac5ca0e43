//! Response types for document store operations.

/// Outcome of one accepted bulk request.
///
/// A bulk request can be accepted by the store while individual items inside
/// it fail (mapping conflicts, rejected documents). Those are counted here
/// rather than surfaced as an error, since retrying the whole batch would
/// duplicate the items that did succeed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkIndexSummary {
    /// Number of documents in the request.
    pub total: usize,
    /// Number of documents the store reported as indexed.
    pub succeeded: usize,
    /// Number of documents the store reported as failed.
    pub failed: usize,
    /// Reason reported for the first failed item, if any.
    pub first_error: Option<String>,
}

impl BulkIndexSummary {
    /// A summary for a request in which every item succeeded.
    pub fn all_succeeded(total: usize) -> Self {
        Self {
            total,
            succeeded: total,
            failed: 0,
            first_error: None,
        }
    }

    /// Whether any item failed.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
