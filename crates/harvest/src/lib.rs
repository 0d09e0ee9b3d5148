//! Preprint harvesting: search, download, extract and normalize.
//!
//! `harvest` turns a topical arXiv query into a folder of clean, single-line
//! text files ready for keyword search or corpus building. The work happens in
//! four stages that always run in order, each one finishing for every paper
//! before the next begins:
//!
//! - **Search**: page through the arXiv Atom feed ([`client`])
//! - **Download**: fetch each record's PDF ([`download`])
//! - **Extract**: pull plain text out of every PDF, page by page ([`pdf`])
//! - **Clean**: run the fixed normalization sequence over each text ([`clean`])
//!
//! The [`pipeline`] module strings these together and [`store`] takes care of
//! what ends up on disk.
//!
//! # Getting Started
//!
//! ```no_run
//! use harvest::{configuration::HarvestConfig, pipeline::Pipeline};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let config = HarvestConfig::default()
//!     .with_category("astro-ph.GA")
//!     .with_term("galactic archaeology")
//!     .with_output_dir("corpus");
//!
//!   let report = Pipeline::new(config)?.run().await?;
//!   println!("Wrote {} cleaned texts", report.texts.len());
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`query`]: Search query construction
//! - [`record`]: Paper records and identifier handling
//! - [`client`]: Paginated metadata retrieval
//! - [`download`]: PDF artifact downloads
//! - [`pdf`]: PDF text extraction
//! - [`clean`]: Text normalization steps
//! - [`store`]: Flat-file persistence of texts and record manifests
//! - [`configuration`]: Job configuration
//! - [`pipeline`]: Stage orchestration
//! - [`prelude`]: Common types for glob imports

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  collections::BTreeMap,
  path::{Path, PathBuf},
  time::Duration,
};

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod clean;
pub mod client;
pub mod configuration;
pub mod download;
pub mod error;
pub mod pdf;
pub mod pipeline;
pub mod query;
pub mod record;
pub mod store;

use crate::{error::*, query::SearchQuery, record::PaperRecord};

/// Identifier → stored PDF path, as produced by the download stage.
pub type Artifacts = BTreeMap<String, PathBuf>;

/// Identifier → raw text pulled out of each artifact.
pub type ExtractedText = BTreeMap<String, String>;

/// Identifier → normalized text, ready to persist.
pub type CleanedText = BTreeMap<String, String>;

/// User agent sent with every request to the feed and artifact hosts.
pub(crate) const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use harvest::prelude::*;
///
/// async fn example() -> Result<(), HarvestError> {
///   let report = Pipeline::new(HarvestConfig::default())?.run().await?;
///   println!("{} records", report.records);
///   Ok(())
/// }
/// ```
pub mod prelude {
  pub use crate::{
    clean::TextNormalizer,
    client::{MetadataClient, Pagination},
    configuration::{ExtractionPolicy, HarvestConfig},
    download::ArtifactDownloader,
    error::HarvestError,
    pdf::TextExtractor,
    pipeline::{HarvestReport, Pipeline},
    query::SearchQuery,
    record::PaperRecord,
  };
}
