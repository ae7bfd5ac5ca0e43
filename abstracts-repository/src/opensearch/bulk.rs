//! Bulk-write wire format.
//!
//! A bulk body is newline-delimited JSON: for every article an action line
//! naming the target collection, followed by the document line.
//!
//! ```text
//! {"index":{"_index":"articles"}}
//! {"title":"Foo","link":"http://x/Foo","text":"..."}
//! ```

use serde_json::{json, Value};

use crate::errors::StoreError;
use crate::types::BulkIndexSummary;
use abstracts_shared::Article;

/// Build the alternating action/document lines for a batch.
///
/// No `_id` is sent, so the store assigns one per document.
pub fn bulk_lines(index: &str, articles: &[Article]) -> Result<Vec<Value>, StoreError> {
    let mut lines = Vec::with_capacity(articles.len() * 2);

    for article in articles {
        lines.push(json!({ "index": { "_index": index } }));
        lines.push(serde_json::to_value(article)?);
    }

    Ok(lines)
}

/// Summarise the body of an accepted bulk response.
///
/// The store sets `errors: true` when at least one item failed; each failed
/// item carries an `error` object under its action key.
pub fn parse_bulk_response(body: &Value, total: usize) -> BulkIndexSummary {
    let has_errors = body.get("errors").and_then(Value::as_bool).unwrap_or(false);
    if !has_errors {
        return BulkIndexSummary::all_succeeded(total);
    }

    let failed_items: Vec<&Value> = body
        .get("items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("index").and_then(|action| action.get("error")))
                .collect()
        })
        .unwrap_or_default();

    let first_error = failed_items.first().map(|error| {
        error
            .get("reason")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string())
    });

    let failed = failed_items.len().min(total);
    BulkIndexSummary {
        total,
        succeeded: total - failed,
        failed,
        first_error,
    }
}
