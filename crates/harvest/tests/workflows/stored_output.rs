use super::*;

/// Feed with one good and one broken artifact.
async fn mixed_server() -> MockServer {
  let server = MockServer::start().await;
  let feed = atom_feed(&server, &[
    FeedEntry { identifier: "2403.00010v1", title: "Good", with_pdf: true },
    FeedEntry { identifier: "2403.00011v1", title: "Broken", with_pdf: true },
  ]);
  Mock::given(method("GET"))
    .and(path("/api/query"))
    .respond_with(ResponseTemplate::new(200).set_body_string(feed))
    .mount(&server)
    .await;
  serve_artifact(&server, "2403.00010v1", pdf_bytes(&["Plain text body"])).await;
  serve_artifact(&server, "2403.00011v1", b"<html>Too many requests</html>".to_vec()).await;
  server
}

#[tokio::test]
async fn test_broken_artifact_aborts_by_default() -> TestResult<()> {
  let server = mixed_server().await;
  let (config, output) = test_config(&server);

  let err = Pipeline::new(config)?.run().await.unwrap_err();
  assert!(matches!(err, HarvestError::Extraction { .. }));

  // both artifacts were downloaded before extraction began
  assert!(output.path().join("papers/2403.00010v1.pdf").exists());
  assert!(output.path().join("papers/2403.00011v1.pdf").exists());
  assert_missing(&output.path().join("texts"));
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_broken_artifact_skipped_when_configured() -> TestResult<()> {
  let server = mixed_server().await;
  let (config, _output) = test_config(&server);
  let config = config.with_extraction_policy(ExtractionPolicy::Skip);

  let report = Pipeline::new(config.clone())?.run().await?;

  assert_eq!(report.texts.keys().collect::<Vec<_>>(), vec!["2403.00010v1"]);
  assert!(report.skipped.contains_key("2403.00011v1"));
  assert_eq!(store::load_text("2403.00010v1", &config.texts_dir()).await?, "Plain text body");
  assert!(logs_contain("Skipping 2403.00011v1"));
  Ok(())
}

#[tokio::test]
async fn test_texts_reload_byte_exact() -> TestResult<()> {
  let dir = tempdir()?;
  let texts = harvest::CleanedText::from([
    ("2403.00012v1".to_string(), "Étoiles naïves? Oui.".to_string()),
    ("astro-ph/0601001v1".to_string(), "Old style identifier.".to_string()),
  ]);

  let written = store::save_texts(&texts, dir.path()).await?;
  for (identifier, text) in &texts {
    assert_eq!(&store::load_text(identifier, dir.path()).await?, text);
    assert_eq!(std::fs::read(&written[identifier])?, text.as_bytes());
  }
  Ok(())
}
