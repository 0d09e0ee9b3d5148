//! Flat-file persistence for cleaned texts and record manifests.
//!
//! Texts are stored as one UTF-8 file per record, `<dir>/<file_stem>.txt`,
//! written exactly as given so they read back byte for byte. The manifest is
//! a pretty-printed JSON array of every [`PaperRecord`] a search returned.

use tokio::fs;

use super::*;

/// File name of the record manifest.
pub const MANIFEST_FILE: &str = "records.json";

/// Where the text for `identifier` lives under `dir`.
pub fn text_path(identifier: &str, dir: &Path) -> PathBuf {
  dir.join(format!("{}.txt", record::file_stem(identifier)))
}

/// Writes every cleaned text to `dir`, creating it if needed.
///
/// # Returns
///
/// The identifier → path mapping of every file written.
pub async fn save_texts(texts: &CleanedText, dir: &Path) -> Result<BTreeMap<String, PathBuf>> {
  fs::create_dir_all(dir).await?;

  let mut written = BTreeMap::new();
  for (identifier, text) in texts {
    let path = text_path(identifier, dir);
    fs::write(&path, text.as_bytes()).await?;
    info!("Saved text for {identifier} to {}", path.display());
    written.insert(identifier.clone(), path);
  }
  Ok(written)
}

/// Reads back the text stored for `identifier` in `dir`.
pub async fn load_text(identifier: &str, dir: &Path) -> Result<String> {
  let path = text_path(identifier, dir);
  trace!("Loading text from {}", path.display());
  Ok(fs::read_to_string(path).await?)
}

/// Writes the search results to `dir/records.json`.
pub async fn write_manifest(records: &[PaperRecord], dir: &Path) -> Result<PathBuf> {
  fs::create_dir_all(dir).await?;
  let path = dir.join(MANIFEST_FILE);
  let json = serde_json::to_vec_pretty(records)?;
  fs::write(&path, json).await?;
  debug!("Wrote manifest of {} records to {}", records.len(), path.display());
  Ok(path)
}

/// Reads a manifest written by [`write_manifest`].
pub async fn read_manifest(dir: &Path) -> Result<Vec<PaperRecord>> {
  let bytes = fs::read(dir.join(MANIFEST_FILE)).await?;
  Ok(serde_json::from_slice(&bytes)?)
}
