//! Mapping entity associating a numeric short URL with the original URL.

use serde::Serialize;

/// A stored association between an identifier and the URL it stands for.
///
/// Mappings are append-only: once created they are never updated, and the
/// identifier is never handed out again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlMapping {
    /// Positive, monotonically assigned identifier (the `short_url`).
    pub identifier: i64,
    /// URL exactly as it was submitted (surrounding whitespace trimmed).
    pub original_url: String,
}

impl UrlMapping {
    /// Creates a new mapping.
    pub fn new(identifier: i64, original_url: impl Into<String>) -> Self {
        Self {
            identifier,
            original_url: original_url.into(),
        }
    }
}
