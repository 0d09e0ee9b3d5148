//! Module for turning one local PDF into text

use harvest::clean;

use super::*;

/// Options for [`Commands::Extract`]
#[derive(Args, Clone, Debug)]
pub struct ExtractOptions {
  /// PDF file to read
  pub pdf: PathBuf,
  /// Print the extracted text without cleaning it
  #[arg(long, action = ArgAction::SetTrue)]
  pub raw: bool,
}

/// Function for the [`Commands::Extract`] in the CLI.
pub fn extract(options: ExtractOptions) -> Result<()> {
  let text = TextExtractor::new().extract(&options.pdf)?;
  debug!("Extracted {} characters from {}", text.len(), options.pdf.display());

  if options.raw {
    print!("{text}");
  } else {
    println!("{}", clean::clean(&text));
  }
  Ok(())
}
