//! Paper records returned by a metadata search.
//!
//! A [`PaperRecord`] is the unit every later stage keys on. Its `identifier` is
//! taken from the canonical abstract URL the feed hands out
//! (`http://arxiv.org/abs/2301.07041v1` → `2301.07041v1`) and is stable across
//! runs, so artifact, extracted text and cleaned text can all be correlated by
//! it.

use super::*;

/// Marker preceding the identifier in a canonical arXiv record URL.
const ABS_MARKER: &str = "/abs/";

/// One metadata entry describing a single paper.
///
/// # Examples
///
/// ```
/// use harvest::record::PaperRecord;
///
/// let record = PaperRecord {
///   identifier:   PaperRecord::identifier_from_id("http://arxiv.org/abs/astro-ph/0601001v1"),
///   published:    "2006-01-01T00:00:00Z".into(),
///   title:        "A paper".into(),
///   first_author: "A. Author".into(),
///   summary:      String::new(),
///   document_url: None,
/// };
/// assert_eq!(record.identifier, "astro-ph/0601001v1");
/// assert_eq!(record.file_stem(), "astro-ph_0601001v1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
  /// Stable key derived from the canonical record URL
  pub identifier:   String,
  /// Publication timestamp as reported by the feed
  pub published:    String,
  /// Paper title
  pub title:        String,
  /// Name of the first listed author, empty when none is listed
  pub first_author: String,
  /// Abstract text
  pub summary:      String,
  /// URL of the PDF, if the entry advertised one
  pub document_url: Option<String>,
}

impl PaperRecord {
  /// Derives an identifier from a canonical record URL.
  ///
  /// Takes everything after the last `/abs/`. If the marker is missing the
  /// whole string is used.
  pub fn identifier_from_id(id: &str) -> String {
    let id = id.trim();
    id.rsplit(ABS_MARKER).next().unwrap_or(id).to_string()
  }

  /// File name stem used for every file stored for this record.
  ///
  /// Old-style identifiers carry a `/` (`math.AG/0601001v2`), which would
  /// otherwise turn into a subdirectory.
  pub fn file_stem(&self) -> String { file_stem(&self.identifier) }

  /// Parses [`published`](Self::published) as an RFC 3339 timestamp.
  pub fn published_at(&self) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(self.published.trim()).ok().map(|dt| dt.with_timezone(&Utc))
  }

  /// Whether a PDF link was found for this record.
  pub fn has_document(&self) -> bool { self.document_url.is_some() }
}

/// Maps an identifier to a flat, path-safe file stem.
pub(crate) fn file_stem(identifier: &str) -> String { identifier.replace(['/', '\\'], "_") }
