//! PDF artifact downloads.
//!
//! Each record with a PDF link is fetched once and written to
//! `<dir>/<file_stem>.pdf`. Records without a link are skipped silently; that
//! is an expected state of the feed, not a failure. The first failing
//! download aborts the batch.
//!
//! There is no retry, no resume and no integrity check of the stored bytes.

use tokio::fs;

use super::*;

/// Fetches and stores PDF artifacts for paper records.
#[derive(Debug, Clone)]
pub struct ArtifactDownloader {
  /// Internal web client, reused for every artifact.
  http: reqwest::Client,
}

impl ArtifactDownloader {
  /// Creates a downloader with its own HTTP client.
  pub fn new() -> Result<Self> {
    let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
    Ok(Self { http })
  }

  /// Downloads the PDF of every record that has one.
  ///
  /// Records are processed in the order given. `output_dir` is created if it
  /// does not exist yet.
  ///
  /// # Returns
  ///
  /// The identifier → path mapping of every artifact written.
  ///
  /// # Errors
  ///
  /// Returns [`HarvestError::Download`] naming the first record whose fetch or
  /// write failed. Artifacts written before the failure stay on disk.
  pub async fn download(&self, records: &[PaperRecord], output_dir: &Path) -> Result<Artifacts> {
    fs::create_dir_all(output_dir).await?;

    let mut artifacts = Artifacts::new();
    for record in records {
      if let Some(path) = self.download_one(record, output_dir).await? {
        artifacts.insert(record.identifier.clone(), path);
      }
    }

    info!("Downloaded {} of {} records", artifacts.len(), records.len());
    Ok(artifacts)
  }

  /// Downloads a single record's PDF into `output_dir`.
  ///
  /// Returns `Ok(None)` without touching the network when the record has no
  /// PDF link.
  pub async fn download_one(
    &self,
    record: &PaperRecord,
    output_dir: &Path,
  ) -> Result<Option<PathBuf>> {
    let Some(url) = &record.document_url else {
      debug!("No PDF link for {}, skipping", record.identifier);
      return Ok(None);
    };

    let path = artifact_path(record, output_dir);
    info!("Downloading {} to {}", record.identifier, path.display());

    let failed = |reason: DownloadFailure| HarvestError::Download { identifier: record.identifier.clone(), reason };

    let response =
      self.http.get(url).send().await.map_err(|e| failed(DownloadFailure::Network(e)))?;
    let status = response.status();
    if !status.is_success() {
      trace!("{} pdf response: {response:?}", record.identifier);
      return Err(failed(DownloadFailure::Status(status)));
    }

    let bytes = response.bytes().await.map_err(|e| failed(DownloadFailure::Network(e)))?;
    fs::write(&path, &bytes).await.map_err(|e| failed(DownloadFailure::Write(e)))?;

    debug!("Wrote {} bytes for {}", bytes.len(), record.identifier);
    Ok(Some(path))
  }
}

/// Where the artifact for `record` lives under `dir`.
pub fn artifact_path(record: &PaperRecord, dir: &Path) -> PathBuf {
  dir.join(format!("{}.pdf", record.file_stem()))
}
