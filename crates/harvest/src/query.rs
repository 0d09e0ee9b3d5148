//! Search query construction for the arXiv API.
//!
//! arXiv queries combine field prefixes (`ti:`, `au:`, `abs:`, `cat:`, `all:`)
//! with boolean operators. A [`SearchQuery`] is built once and handed to the
//! [`MetadataClient`](crate::client::MetadataClient) unchanged; URL encoding
//! happens at request time.
//!
//! # Examples
//!
//! ```
//! use harvest::query::SearchQuery;
//!
//! let raw = SearchQuery::new("ti:gaia sausage enceladus");
//! assert_eq!(raw.as_str(), "ti:gaia sausage enceladus");
//!
//! let scoped = SearchQuery::in_category("astro-ph.GA", "galactic archaeology");
//! assert_eq!(scoped.as_str(), "cat:astro-ph.GA AND galactic archaeology");
//! ```

use std::fmt::Display;

use super::*;

/// An immutable arXiv search expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchQuery(String);

impl SearchQuery {
  /// Wraps a raw query string as-is.
  pub fn new(raw: impl Into<String>) -> Self { Self(raw.into()) }

  /// Restricts a free-text term to a single subject category.
  pub fn in_category(category: &str, term: &str) -> Self {
    Self(format!("cat:{category} AND {term}"))
  }

  /// The query text, unencoded.
  pub fn as_str(&self) -> &str { &self.0 }

  /// Whether the query holds nothing but whitespace.
  pub fn is_blank(&self) -> bool { self.0.trim().is_empty() }
}

impl Display for SearchQuery {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.0) }
}
