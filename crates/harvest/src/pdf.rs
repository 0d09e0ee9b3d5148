//! PDF text extraction.
//!
//! Text is pulled out page by page with `lopdf`, in page-number order, and the
//! pages are concatenated in that same order. Layout handling is whatever
//! `lopdf` does by default: text objects are emitted as lines, no column
//! detection is attempted.

use lopdf::Document;

use super::*;

/// Text of a whole document, split by page.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PdfContent {
  /// Pages in document order
  pub pages: Vec<PageContent>,
}

/// Text extracted from a single page.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PageContent {
  /// One-based page number
  pub page_number: u32,
  /// Extracted text
  pub text:        String,
}

impl PdfContent {
  /// All page texts joined in document order.
  pub fn text(&self) -> String { self.pages.iter().map(|page| page.text.as_str()).collect() }
}

/// Converts stored PDF artifacts into plain text.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextExtractor;

impl TextExtractor {
  /// Creates a new extractor.
  pub fn new() -> Self { Self }

  /// Extracts the full text of the document at `path`.
  ///
  /// # Errors
  ///
  /// Returns [`HarvestError::Extraction`] if the file is missing, is not a
  /// PDF, or has page content `lopdf` cannot decode.
  pub fn extract(&self, path: impl AsRef<Path>) -> Result<String> {
    Ok(self.analyze(path)?.text())
  }

  /// Extracts text page by page from the document at `path`.
  pub fn analyze(&self, path: impl AsRef<Path>) -> Result<PdfContent> {
    let path = path.as_ref();
    let failed = |source: lopdf::Error| HarvestError::Extraction { path: path.to_path_buf(), source };

    let doc = Document::load(path).map_err(failed)?;

    let mut pages = Vec::new();
    // `get_pages` is keyed by page number, so iteration follows document order
    for page_number in doc.get_pages().into_keys() {
      let text = doc.extract_text(&[page_number]).map_err(failed)?;
      trace!("Page {page_number} of {}: {} chars", path.display(), text.len());
      pages.push(PageContent { page_number, text });
    }

    debug!("Extracted {} pages from {}", pages.len(), path.display());
    Ok(PdfContent { pages })
  }
}
