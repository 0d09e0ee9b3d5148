//! Error types for the harvest library.
//!
//! Every stage of the pipeline fails fast: the first error aborts the run and
//! surfaces here. The variants mirror the stages so the caller can say which
//! one broke:
//! - Metadata retrieval
//! - Artifact download
//! - Text extraction
//! - Configuration and local I/O
//!
//! # Examples
//!
//! ```no_run
//! use harvest::{error::HarvestError, prelude::*};
//!
//! # async fn example() -> Result<(), HarvestError> {
//! match Pipeline::new(HarvestConfig::default())?.run().await {
//!   Err(HarvestError::Retrieval { status, .. }) => println!("feed said {status}"),
//!   Err(e) => println!("{} stage failed: {e}", e.stage()),
//!   Ok(report) => println!("{} texts", report.texts.len()),
//! }
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Error type alias used for the [`harvest`](crate) crate.
pub type Result<T> = core::result::Result<T, HarvestError>;

/// Errors that can occur while harvesting papers.
#[derive(Error, Debug)]
pub enum HarvestError {
  /// The metadata endpoint answered a page request with a non-success status.
  ///
  /// The whole search is abandoned; records from earlier pages are discarded.
  #[error("metadata request at offset {start} failed with status {status}")]
  Retrieval {
    /// Offset of the page that failed
    start:  usize,
    /// Status returned by the feed
    status: StatusCode,
  },

  /// A page request failed before a complete response body was received.
  #[error("metadata request at offset {start} failed: {source}")]
  Fetch {
    /// Offset of the page that failed
    start:  usize,
    /// Underlying transport error
    #[source]
    source: reqwest::Error,
  },

  /// Fetching or storing a record's PDF failed.
  #[error("failed to download artifact {identifier}: {reason}")]
  Download {
    /// Identifier of the record being downloaded
    identifier: String,
    /// What went wrong
    #[source]
    reason:     DownloadFailure,
  },

  /// A stored artifact could not be parsed as a PDF.
  ///
  /// Common causes are truncated downloads, HTML error pages saved with a
  /// `.pdf` name, and encrypted documents.
  #[error("failed to extract text from {}: {source}", path.display())]
  Extraction {
    /// Path of the artifact
    path:   PathBuf,
    /// Underlying parser error
    #[source]
    source: lopdf::Error,
  },

  /// The HTTP client could not be set up.
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// A feed page could not be parsed as Atom XML.
  #[error("failed to parse feed: {0}")]
  Feed(#[from] quick_xml::DeError),

  /// A local file system operation failed.
  #[error(transparent)]
  Path(#[from] std::io::Error),

  /// The record manifest could not be serialized.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// A configuration file could not be parsed.
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// A configuration could not be rendered as TOML.
  #[error(transparent)]
  TomlSer(#[from] toml::ser::Error),

  /// The configured base URL is not a valid URL.
  #[error(transparent)]
  Url(#[from] url::ParseError),

  /// The configuration holds values the pipeline cannot work with.
  #[error("{0}")]
  Config(String),
}

/// The specific reason a download failed.
#[derive(Error, Debug)]
pub enum DownloadFailure {
  /// The artifact host returned a non-success status.
  #[error("server returned {0}")]
  Status(StatusCode),

  /// The request or body transfer failed.
  #[error(transparent)]
  Network(reqwest::Error),

  /// The body could not be written to disk.
  #[error(transparent)]
  Write(std::io::Error),
}

impl HarvestError {
  /// Names the pipeline stage this error belongs to.
  pub fn stage(&self) -> &'static str {
    match self {
      HarvestError::Retrieval { .. } | HarvestError::Fetch { .. } | HarvestError::Feed(_) => {
        "retrieval"
      },
      HarvestError::Download { .. } => "download",
      HarvestError::Extraction { .. } => "extraction",
      HarvestError::Network(_) => "network",
      HarvestError::Path(_) | HarvestError::Json(_) => "storage",
      HarvestError::TomlDe(_)
      | HarvestError::TomlSer(_)
      | HarvestError::Url(_)
      | HarvestError::Config(_) => "configuration",
    }
  }
}
