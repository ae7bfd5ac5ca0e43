//! The article record: the unit of ingestion and the document shape held by
//! the store.

use serde::{Deserialize, Serialize};

/// Abstracts shorter than this many characters are dropped by default.
pub const DEFAULT_MIN_SUMMARY_SIZE: usize = 100;

/// Formatting prefix carried by every title in the abstracts dump.
pub const TITLE_PREFIX: &str = "Wikipedia: ";

/// An encyclopedia article abstract.
///
/// The same shape is used for the bulk-indexed document, the `_source` payload
/// returned by the store and the HTTP API request/response bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Human-readable article name, without the dump's title prefix.
    pub title: String,
    /// Canonical URL of the source article.
    pub link: String,
    /// Abstract text.
    pub text: String,
}

impl Article {
    /// Create a new article from its three fields.
    pub fn new(title: impl Into<String>, link: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            text: text.into(),
        }
    }

    /// Whether this record may be indexed.
    ///
    /// All three fields must be non-empty and the abstract must be at least
    /// `min_summary_size` characters long (counted in chars, not bytes).
    pub fn is_valid(&self, min_summary_size: usize) -> bool {
        !self.title.is_empty()
            && !self.link.is_empty()
            && !self.text.is_empty()
            && self.text.chars().count() >= min_summary_size
    }

    /// Strip the dump's title prefix, if present.
    ///
    /// Only a single leading prefix is removed, unlike a replace-all:
    /// `"Wikipedia: Wikipedia: Meta"` becomes `"Wikipedia: Meta"`, not `"Meta"`.
    pub fn clean_title(raw: &str) -> &str {
        raw.strip_prefix(TITLE_PREFIX).unwrap_or(raw)
    }
}
