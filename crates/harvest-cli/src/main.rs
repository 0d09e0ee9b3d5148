//! Command line interface for the harvest preprint pipeline.
//!
//! # Usage
//!
//! ```bash
//! # Write a starter configuration
//! harvest init
//!
//! # Run search, download, extract and clean
//! harvest run --category astro-ph.GA --term "galactic archaeology" --total 20
//!
//! # Only list what a query would return
//! harvest search --term "ti:gaia sausage enceladus"
//!
//! # Clean a single local PDF
//! harvest extract paper.pdf
//! ```
//!
//! Logging goes to stderr; use `-v` (repeatable) or `RUST_LOG` to see
//! progress.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::path::PathBuf;

use clap::{builder::ArgAction, Args, Parser, Subcommand};
use console::style;
use harvest::{error::Result, prelude::*};
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub mod commands;

use crate::commands::*;

/// Prefix for information messages
static INFO_PREFIX: &str = "ℹ ";
/// Prefix for success messages
static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for warning messages
static WARNING_PREFIX: &str = "! ";
/// Prefix for error messages
static ERROR_PREFIX: &str = "✗ ";
/// Branch character for list output
static TREE_BRANCH: &str = "├─";
/// Leaf character for list output (last item)
static TREE_LEAF: &str = "└─";

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "Fetch, download, extract and clean arXiv preprints")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Commands,
}

/// Configures the logging system based on the verbosity level
///
/// The verbosity levels are:
/// - 0: warn (default)
/// - 1: info
/// - 2: debug
/// - 3+: trace
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_target(true)
    .init();
}

/// Entry point for the harvest CLI
///
/// Any error ends the process with a non-zero exit code and a message naming
/// the stage that failed.
#[tokio::main(flavor = "current_thread")]
async fn main() {
  let cli = Cli::parse();
  setup_logging(cli.verbose);

  let outcome = match cli.command {
    Commands::Init(options) => init(options),
    Commands::Run(options) => run(options).await,
    Commands::Search(options) => search(options).await,
    Commands::Extract(options) => extract(options),
  };

  if let Err(e) = outcome {
    eprintln!("{}{} stage failed: {}", style(ERROR_PREFIX).red(), e.stage(), style(&e).red());
    std::process::exit(1);
  }
}
