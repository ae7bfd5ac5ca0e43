//! OpenSearch query builders.

use serde_json::{json, Value};

use abstracts_shared::SearchQuery;

/// Largest `size` the store accepts (`index.max_result_window` default).
pub const MAX_RESULT_WINDOW: usize = 10_000;

/// Build the search request body for a query.
///
/// A single fuzzy `match` on the `text` field. AUTO fuzziness allows edits
/// based on term length: 1-2 chars: 0 edits, 3-5 chars: 1 edit, longer: 2.
/// `size` caps the hit list on the store side and is clamped to
/// [`MAX_RESULT_WINDOW`]; callers still truncate to their own limit.
pub fn build_search_query(query: &SearchQuery) -> Value {
    json!({
        "query": {
            "match": {
                "text": {
                    "query": query.query,
                    "fuzziness": "AUTO"
                }
            }
        },
        "size": query.limit.min(MAX_RESULT_WINDOW)
    })
}
