//! Job configuration.
//!
//! A [`HarvestConfig`] carries everything one harvesting run needs: where to
//! query, what to query for, how far to page, how long to pause between
//! pages, and where to write results. It can be built in code, read from a
//! TOML file, or both.
//!
//! # Example Configuration
//!
//! ```toml
//! base_url = "http://export.arxiv.org/api/query"
//! term = "galactic archaeology"
//! category = "astro-ph.GA"
//! start = 0
//! total_results = 50
//! page_size = 25
//! wait_between_pages_ms = 3000
//! output_dir = "corpus"
//! on_extraction_error = "skip"
//! ```

use std::str::FromStr;

use super::*;

/// Default arXiv query endpoint.
pub const DEFAULT_BASE_URL: &str = "http://export.arxiv.org/api/query";

/// What the pipeline does when an artifact cannot be parsed as a PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionPolicy {
  /// Stop the run with the extraction error.
  #[default]
  Abort,
  /// Log a warning, note the failure in the report and move on.
  Skip,
}

/// Configuration for a harvesting run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarvestConfig {
  /// Query endpoint of the metadata feed
  pub base_url:              String,
  /// Free-text search term, may carry arXiv field prefixes (`ti:`, `au:`)
  pub term:                  String,
  /// Subject category the term is restricted to (e.g., `astro-ph.GA`)
  pub category:              Option<String>,
  /// Offset of the first result
  pub start:                 usize,
  /// Offset at which paging stops
  pub total_results:         usize,
  /// Results requested per page
  pub page_size:             usize,
  /// Pause between page requests, in milliseconds
  pub wait_between_pages_ms: u64,
  /// Root directory for `papers/`, `texts/` and the manifest
  pub output_dir:            PathBuf,
  /// Handling of unparseable PDFs
  pub on_extraction_error:   ExtractionPolicy,
}

impl Default for HarvestConfig {
  fn default() -> Self {
    Self {
      base_url:              DEFAULT_BASE_URL.to_string(),
      term:                  "gaia sausage enceladus".to_string(),
      category:              None,
      start:                 0,
      total_results:         10,
      page_size:             10,
      wait_between_pages_ms: 3000,
      output_dir:            PathBuf::from("."),
      on_extraction_error:   ExtractionPolicy::Abort,
    }
  }
}

impl FromStr for HarvestConfig {
  type Err = HarvestError;

  fn from_str(s: &str) -> Result<Self> { Ok(toml::from_str(s)?) }
}

impl HarvestConfig {
  /// Returns the default location of the configuration file.
  ///
  /// - On Unix: `~/.config/harvest/config.toml`
  /// - On macOS: `~/Library/Application Support/harvest/config.toml`
  /// - On Windows: `%APPDATA%\harvest\config.toml`
  /// - Fallback: `./harvest/config.toml`
  pub fn default_path() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("harvest").join("config.toml")
  }

  /// Reads a configuration from a TOML file.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    debug!("Loading configuration from {}", path.display());
    std::fs::read_to_string(path)?.parse()
  }

  /// Renders this configuration as TOML.
  pub fn to_toml(&self) -> Result<String> { Ok(toml::to_string_pretty(self)?) }

  /// Checks that the pipeline can run with these values.
  pub fn validate(&self) -> Result<()> {
    Url::parse(&self.base_url)?;
    if self.term.trim().is_empty() {
      return Err(HarvestError::Config("search term must not be empty".into()));
    }
    if self.category.as_deref().is_some_and(|c| c.trim().is_empty()) {
      return Err(HarvestError::Config("category must not be empty when set".into()));
    }
    if self.page_size == 0 {
      return Err(HarvestError::Config("page_size must be at least 1".into()));
    }
    if self.total_results <= self.start {
      warn!(
        "total_results ({}) is not past start ({}), no pages will be requested",
        self.total_results, self.start
      );
    }
    Ok(())
  }

  /// The query this configuration searches for.
  pub fn search_query(&self) -> SearchQuery {
    match &self.category {
      Some(category) => SearchQuery::in_category(category, &self.term),
      None => SearchQuery::new(self.term.clone()),
    }
  }

  /// The pagination window this configuration walks.
  pub fn pagination(&self) -> client::Pagination {
    client::Pagination {
      start:              self.start,
      total_results:      self.total_results,
      page_size:          self.page_size,
      wait_between_pages: Duration::from_millis(self.wait_between_pages_ms),
    }
  }

  /// Directory downloaded PDFs are written to.
  pub fn papers_dir(&self) -> PathBuf { self.output_dir.join("papers") }

  /// Directory cleaned texts are written to.
  pub fn texts_dir(&self) -> PathBuf { self.output_dir.join("texts") }

  /// Sets the query endpoint.
  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into();
    self
  }

  /// Sets the search term.
  pub fn with_term(mut self, term: impl Into<String>) -> Self {
    self.term = term.into();
    self
  }

  /// Restricts the search to a subject category.
  pub fn with_category(mut self, category: impl Into<String>) -> Self {
    self.category = Some(category.into());
    self
  }

  /// Sets the offset of the first result.
  pub fn with_start(mut self, start: usize) -> Self {
    self.start = start;
    self
  }

  /// Sets the offset at which paging stops.
  pub fn with_total_results(mut self, total_results: usize) -> Self {
    self.total_results = total_results;
    self
  }

  /// Sets the number of results per page.
  pub fn with_page_size(mut self, page_size: usize) -> Self {
    self.page_size = page_size;
    self
  }

  /// Sets the pause between page requests.
  pub fn with_wait_between_pages(mut self, wait: Duration) -> Self {
    self.wait_between_pages_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX);
    self
  }

  /// Sets the output root.
  pub fn with_output_dir(mut self, output_dir: impl AsRef<Path>) -> Self {
    self.output_dir = output_dir.as_ref().to_path_buf();
    self
  }

  /// Sets the handling of unparseable PDFs.
  pub fn with_extraction_policy(mut self, policy: ExtractionPolicy) -> Self {
    self.on_extraction_error = policy;
    self
  }
}
