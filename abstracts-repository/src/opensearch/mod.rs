//! OpenSearch implementation of the document store.
//!
//! The requests used here (`_bulk`, `_doc`, `_search`, index creation) share
//! the same wire format on Elasticsearch, so the client works against both.

mod bulk;
mod client;
mod index_config;
mod queries;

pub use bulk::{bulk_lines, parse_bulk_response};
pub use client::OpenSearchClient;
pub use index_config::index_mapping;
pub use queries::build_search_query;
