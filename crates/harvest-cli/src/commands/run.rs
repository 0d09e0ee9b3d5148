//! Module for running the full pipeline

use super::*;

/// Function for the [`Commands::Run`] in the CLI.
pub async fn run(options: JobOptions) -> Result<()> {
  let config = options.resolve()?;
  println!(
    "{}Harvesting {} into {}",
    style(INFO_PREFIX).cyan(),
    style(config.search_query()).yellow(),
    style(config.output_dir.display()).cyan()
  );

  let report = Pipeline::new(config)?.run().await?;

  println!(
    "{}{} records, {} PDFs, {} cleaned texts",
    style(SUCCESS_PREFIX).green(),
    report.records,
    report.artifacts.len(),
    report.texts.len()
  );
  println!("   {} Manifest: {}", style(TREE_BRANCH).dim(), report.manifest.display());
  match report.texts.values().next().and_then(|p| p.parent()) {
    Some(dir) => println!("   {} Texts: {}", style(TREE_LEAF).dim(), dir.display()),
    None => println!("   {} Texts: none", style(TREE_LEAF).dim()),
  }

  if !report.skipped.is_empty() {
    println!(
      "{}Skipped {} unreadable PDFs:",
      style(WARNING_PREFIX).yellow(),
      report.skipped.len()
    );
    for (identifier, reason) in &report.skipped {
      println!("   {} {}: {}", style(TREE_BRANCH).dim(), style(identifier).yellow(), reason);
    }
  }
  Ok(())
}
