use super::*;

pub mod extract;
pub mod init;
pub mod run;
pub mod search;

pub use extract::extract;
pub use init::init;
pub use run::run;
pub use search::search;

/// Available commands for the CLI
#[derive(Subcommand, Clone)]
pub enum Commands {
  /// Write a configuration file with default values
  Init(init::InitOptions),

  /// Search, download, extract and clean in one go
  Run(JobOptions),

  /// List the records a query returns without downloading anything
  Search(JobOptions),

  /// Print the text of a single local PDF
  Extract(extract::ExtractOptions),
}

/// Options shared by commands that run a query
#[derive(Args, Clone, Debug, Default)]
pub struct JobOptions {
  /// Configuration file to start from. Defaults to the platform config
  /// location if a file exists there.
  #[arg(long, short)]
  pub config: Option<PathBuf>,

  /// Free-text search term, arXiv field prefixes allowed (e.g. "ti:gaia")
  #[arg(long)]
  pub term: Option<String>,

  /// Restrict the term to a subject category (e.g. "astro-ph.GA")
  #[arg(long)]
  pub category: Option<String>,

  /// Offset of the first result
  #[arg(long)]
  pub start: Option<usize>,

  /// Offset at which paging stops
  #[arg(long)]
  pub total: Option<usize>,

  /// Results per page request
  #[arg(long)]
  pub page_size: Option<usize>,

  /// Pause between page requests in milliseconds
  #[arg(long)]
  pub wait_ms: Option<u64>,

  /// Root directory for papers/, texts/ and records.json
  #[arg(long, short)]
  pub output: Option<PathBuf>,

  /// Skip PDFs that fail to parse instead of stopping
  #[arg(long)]
  pub skip_broken: bool,
}

impl JobOptions {
  /// Loads the base configuration and applies command line overrides.
  pub fn resolve(&self) -> Result<HarvestConfig> {
    let mut config = match &self.config {
      Some(path) => HarvestConfig::from_path(path)?,
      None => {
        let default_path = HarvestConfig::default_path();
        if default_path.exists() {
          debug!("Using configuration at {}", default_path.display());
          HarvestConfig::from_path(default_path)?
        } else {
          HarvestConfig::default()
        }
      },
    };

    if let Some(term) = &self.term {
      config = config.with_term(term);
    }
    if let Some(category) = &self.category {
      config = config.with_category(category);
    }
    if let Some(start) = self.start {
      config = config.with_start(start);
    }
    if let Some(total) = self.total {
      config = config.with_total_results(total);
    }
    if let Some(page_size) = self.page_size {
      config = config.with_page_size(page_size);
    }
    if let Some(wait_ms) = self.wait_ms {
      config.wait_between_pages_ms = wait_ms;
    }
    if let Some(output) = &self.output {
      config = config.with_output_dir(output);
    }
    if self.skip_broken {
      config = config.with_extraction_policy(ExtractionPolicy::Skip);
    }

    config.validate()?;
    Ok(config)
  }
}
