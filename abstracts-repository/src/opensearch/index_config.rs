//! Collection mapping for the articles index.

use serde_json::{json, Value};

/// Get the mapping used when creating the articles collection.
///
/// All three article fields are analysed full-text fields. Links are kept as
/// text too so they can be matched by path fragments.
pub fn index_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "text": { "type": "text" },
                "link": { "type": "text" },
                "title": { "type": "text" }
            }
        }
    })
}
