//! Module for listing search results without downloading

use super::*;

/// Function for the [`Commands::Search`] in the CLI.
pub async fn search(options: JobOptions) -> Result<()> {
  let config = options.resolve()?;
  let query = config.search_query();
  println!("{}Searching for {}", style(INFO_PREFIX).cyan(), style(&query).yellow());

  let client = MetadataClient::new(&config.base_url)?;
  let records = client.search(&query, &config.pagination()).await?;

  if records.is_empty() {
    println!("{}No records found", style(WARNING_PREFIX).yellow());
    return Ok(());
  }

  println!("{}Found {} records:", style(SUCCESS_PREFIX).green(), records.len());
  for record in &records {
    let published = record
      .published_at()
      .map(|date| date.format("%Y-%m-%d").to_string())
      .unwrap_or_else(|| record.published.clone());
    println!("\n{} {}", style(&record.identifier).cyan(), style(&record.title).white().bold());
    println!("   {} Published: {}", style(TREE_BRANCH).dim(), published);
    println!("   {} First author: {}", style(TREE_BRANCH).dim(), record.first_author);
    println!(
      "   {} PDF: {}",
      style(TREE_LEAF).dim(),
      record.document_url.as_deref().unwrap_or("none")
    );
  }
  Ok(())
}
