//! Module for writing a starter configuration file

use super::*;

/// Options for [`Commands::Init`]
#[derive(Args, Clone, Debug)]
pub struct InitOptions {
  /// Where to write the file. Defaults to the platform config location.
  #[arg(long)]
  pub path:  Option<PathBuf>,
  /// Overwrite an existing file
  #[arg(long, action = ArgAction::SetTrue)]
  pub force: bool,
}

/// Function for the [`Commands::Init`] in the CLI.
pub fn init(options: InitOptions) -> Result<()> {
  let InitOptions { path, force } = options;
  let path = path.unwrap_or_else(HarvestConfig::default_path);

  if path.exists() && !force {
    println!(
      "{}Configuration already exists at {}, pass --force to overwrite it",
      style(WARNING_PREFIX).yellow(),
      style(path.display()).yellow()
    );
    return Err(HarvestError::Config(format!("{} already exists", path.display())));
  }

  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::write(&path, HarvestConfig::default().to_toml()?)?;

  println!(
    "{}Wrote default configuration to {}",
    style(SUCCESS_PREFIX).green(),
    style(path.display()).cyan()
  );
  Ok(())
}
