use super::*;

#[traced_test]
#[tokio::test]
async fn test_full_run_writes_cleaned_texts() -> TestResult<()> {
  let server = MockServer::start().await;
  let feed = atom_feed(&server, &[
    FeedEntry { identifier: "2403.00001v1", title: "Streams in the halo", with_pdf: true },
    FeedEntry { identifier: "2403.00002v1", title: "No PDF here", with_pdf: false },
    FeedEntry { identifier: "2403.00003v2", title: "Disc heating", with_pdf: true },
  ]);
  Mock::given(method("GET"))
    .and(path("/api/query"))
    .and(query_param("search_query", "cat:astro-ph.GA AND stellar streams"))
    .and(query_param("start", "0"))
    .and(query_param("max_results", "3"))
    .respond_with(ResponseTemplate::new(200).set_body_string(feed))
    .expect(1)
    .mount(&server)
    .await;
  serve_artifact(&server, "2403.00001v1", pdf_bytes(&[
    "Streams in the halo ABSTRACT We study",
    "12 stellar streams. CONCLUSION Thanks to everyone",
  ]))
  .await;
  serve_artifact(&server, "2403.00003v2", pdf_bytes(&["Disc heating, see http://x.org/a now"]))
    .await;

  let (config, output) = test_config(&server);
  let report = Pipeline::new(config.clone())?.run().await?;

  assert_eq!(report.records, 3);
  assert_eq!(report.artifacts.len(), 2);
  assert!(!report.artifacts.contains_key("2403.00002v1"));
  assert!(report.skipped.is_empty());
  assert_eq!(report.texts.len(), 2);

  assert!(output.path().join("papers/2403.00001v1.pdf").exists());
  assert_missing(&output.path().join("papers/2403.00002v1.pdf"));

  let windowed = store::load_text("2403.00001v1", &config.texts_dir()).await?;
  assert_eq!(windowed, "We study stellar streams.");

  let stripped = store::load_text("2403.00003v2", &config.texts_dir()).await?;
  assert_eq!(stripped, "Disc heating see now");

  assert!(logs_contain("Results 0 - 3"));
  Ok(())
}

#[tokio::test]
async fn test_manifest_lists_every_record() -> TestResult<()> {
  let server = MockServer::start().await;
  let feed = atom_feed(&server, &[
    FeedEntry { identifier: "2403.00004v1", title: "Only metadata", with_pdf: false },
  ]);
  Mock::given(method("GET"))
    .and(path("/api/query"))
    .respond_with(ResponseTemplate::new(200).set_body_string(feed))
    .mount(&server)
    .await;

  let (config, output) = test_config(&server);
  let report = Pipeline::new(config)?.run().await?;

  assert_eq!(report.manifest, output.path().join(store::MANIFEST_FILE));
  let records = store::read_manifest(output.path()).await?;
  assert_eq!(records.len(), 1);
  assert_eq!(records[0].identifier, "2403.00004v1");
  assert_eq!(records[0].first_author, "First Author");
  assert!(records[0].document_url.is_none());
  assert!(report.texts.is_empty());
  Ok(())
}

#[tokio::test]
async fn test_retrieval_failure_stops_before_download() -> TestResult<()> {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api/query"))
    .respond_with(ResponseTemplate::new(500))
    .expect(1)
    .mount(&server)
    .await;

  let (config, output) = test_config(&server);
  let result = Pipeline::new(config)?.run().await;

  match result {
    Err(e @ HarvestError::Retrieval { .. }) => assert_eq!(e.stage(), "retrieval"),
    other => panic!("expected retrieval error, got {other:?}"),
  }
  assert_missing(&output.path().join("papers"));
  assert_missing(&output.path().join(store::MANIFEST_FILE));
  Ok(())
}

#[tokio::test]
async fn test_download_failure_names_record() -> TestResult<()> {
  let server = MockServer::start().await;
  let feed = atom_feed(&server, &[
    FeedEntry { identifier: "2403.00005v1", title: "Gone", with_pdf: true },
  ]);
  Mock::given(method("GET"))
    .and(path("/api/query"))
    .respond_with(ResponseTemplate::new(200).set_body_string(feed))
    .mount(&server)
    .await;
  Mock::given(method("GET"))
    .and(path("/pdf/2403.00005v1"))
    .respond_with(ResponseTemplate::new(403))
    .mount(&server)
    .await;

  let (config, _output) = test_config(&server);
  let err = Pipeline::new(config)?.run().await.unwrap_err();

  assert_eq!(err.stage(), "download");
  assert!(err.to_string().contains("2403.00005v1"));
  Ok(())
}
