//! Stage orchestration.
//!
//! A [`Pipeline`] runs search → download → extract → clean → save, each
//! stage finishing for every record before the next one starts. Every stage
//! produces a new identifier-keyed map from the previous one; nothing is
//! shared or mutated across stages.
//!
//! There is no checkpointing: a failure mid-run loses whatever had not been
//! written yet. Files already on disk stay there.

use super::*;
use crate::{
  clean::TextNormalizer,
  client::MetadataClient,
  configuration::{ExtractionPolicy, HarvestConfig},
  download::ArtifactDownloader,
  pdf::TextExtractor,
};

/// Summary of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestReport {
  /// Number of records the search returned
  pub records:   usize,
  /// Stored PDF per identifier
  pub artifacts: Artifacts,
  /// Stored cleaned text per identifier
  pub texts:     BTreeMap<String, PathBuf>,
  /// Artifacts that could not be extracted, with the reason (only under
  /// [`ExtractionPolicy::Skip`])
  pub skipped:   BTreeMap<String, String>,
  /// Location of the record manifest
  pub manifest:  PathBuf,
}

/// The full fetch → download → extract → clean workflow.
#[derive(Debug, Clone)]
pub struct Pipeline {
  /// Job configuration
  config:     HarvestConfig,
  /// Metadata feed client
  client:     MetadataClient,
  /// PDF fetcher
  downloader: ArtifactDownloader,
  /// PDF to text converter
  extractor:  TextExtractor,
  /// Text cleaning sequence
  normalizer: TextNormalizer,
}

impl Pipeline {
  /// Builds a pipeline from a configuration, validating it first.
  pub fn new(config: HarvestConfig) -> Result<Self> {
    config.validate()?;
    Ok(Self {
      client: MetadataClient::new(&config.base_url)?,
      downloader: ArtifactDownloader::new()?,
      extractor: TextExtractor::new(),
      normalizer: TextNormalizer::new(),
      config,
    })
  }

  /// The configuration this pipeline runs with.
  pub fn config(&self) -> &HarvestConfig { &self.config }

  /// Runs every stage in order.
  ///
  /// # Errors
  ///
  /// The first error from any stage ends the run, with one exception:
  /// extraction errors are collected in [`HarvestReport::skipped`] when the
  /// configuration says [`ExtractionPolicy::Skip`].
  pub async fn run(&self) -> Result<HarvestReport> {
    let query = self.config.search_query();
    let records = self.client.search(&query, &self.config.pagination()).await?;
    info!("Search returned {} records", records.len());

    let manifest = store::write_manifest(&records, &self.config.output_dir).await?;

    let artifacts = self.downloader.download(&records, &self.config.papers_dir()).await?;

    let (extracted, skipped) = self.extract_all(&artifacts)?;

    let cleaned = self.normalizer.clean_all(&extracted);

    let texts = store::save_texts(&cleaned, &self.config.texts_dir()).await?;
    info!("Saved {} cleaned texts to {}", texts.len(), self.config.texts_dir().display());

    Ok(HarvestReport { records: records.len(), artifacts, texts, skipped, manifest })
  }

  /// Extracts text from every artifact, applying the configured failure
  /// policy.
  ///
  /// # Returns
  ///
  /// The extracted texts and, under [`ExtractionPolicy::Skip`], the
  /// identifiers that failed with their error messages.
  pub fn extract_all(
    &self,
    artifacts: &Artifacts,
  ) -> Result<(ExtractedText, BTreeMap<String, String>)> {
    let mut extracted = ExtractedText::new();
    let mut skipped = BTreeMap::new();

    for (identifier, path) in artifacts {
      match self.extractor.extract(path) {
        Ok(text) => {
          info!("Converted {identifier} to text");
          extracted.insert(identifier.clone(), text);
        },
        Err(e) if self.config.on_extraction_error == ExtractionPolicy::Skip => {
          warn!("Skipping {identifier}: {e}");
          skipped.insert(identifier.clone(), e.to_string());
        },
        Err(e) => return Err(e),
      }
    }

    Ok((extracted, skipped))
  }
}
