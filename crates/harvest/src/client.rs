//! Paginated metadata retrieval from the arXiv Atom API.
//!
//! The client walks a result window page by page, pausing between requests
//! as a courtesy to the upstream service, and turns every `<entry>` into a
//! [`PaperRecord`]. Any non-success page aborts the whole search.
//!
//! # Examples
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use harvest::{
//!   client::{MetadataClient, Pagination},
//!   query::SearchQuery,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MetadataClient::new("http://export.arxiv.org/api/query")?;
//! let query = SearchQuery::new("ti:gaia sausage enceladus");
//! let pagination = Pagination {
//!   start:              0,
//!   total_results:      20,
//!   page_size:          10,
//!   wait_between_pages: Duration::from_secs(3),
//! };
//!
//! for record in client.search(&query, &pagination).await? {
//!   println!("{}: {}", record.identifier, record.title);
//! }
//! # Ok(())
//! # }
//! ```

use super::*;

/// Content type marking a link as the paper's PDF.
const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Internal representation of the API's Atom feed response.
#[derive(Debug, Deserialize)]
struct Feed {
  /// A page may hold any number of entries, including none
  #[serde(rename = "entry", default)]
  entries: Vec<Entry>,
}

/// Internal representation of a single `<entry>`.
#[derive(Debug, Deserialize)]
struct Entry {
  /// Canonical record URL (e.g., "http://arxiv.org/abs/2301.07041v1")
  #[serde(default)]
  id:        String,
  /// Publication timestamp
  #[serde(default)]
  published: String,
  /// Paper title
  #[serde(default)]
  title:     String,
  /// Abstract text
  #[serde(default)]
  summary:   String,
  /// Listed authors in order
  #[serde(rename = "author", default)]
  authors:   Vec<Author>,
  /// Alternate, PDF and DOI links
  #[serde(rename = "link", default)]
  links:     Vec<Link>,
}

/// Internal representation of an `<author>`.
#[derive(Debug, Deserialize)]
struct Author {
  /// Author's full name
  #[serde(default)]
  name: String,
}

/// Internal representation of a `<link/>`.
#[derive(Debug, Deserialize)]
struct Link {
  /// Link target
  #[serde(rename = "@href", default)]
  href:         String,
  /// Declared media type, if any
  #[serde(rename = "@type", default)]
  content_type: Option<String>,
}

impl Entry {
  /// Href of the first link declared as a PDF.
  fn pdf_link(&self) -> Option<&str> {
    self
      .links
      .iter()
      .find(|link| {
        link.content_type.as_deref().is_some_and(|ty| ty.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
      })
      .map(|link| link.href.as_str())
  }
}

impl From<Entry> for PaperRecord {
  fn from(entry: Entry) -> Self {
    let document_url = entry.pdf_link().map(str::to_string);
    PaperRecord {
      identifier: PaperRecord::identifier_from_id(&entry.id),
      published: entry.published.trim().to_string(),
      title: entry.title.trim().to_string(),
      first_author: entry.authors.into_iter().next().map(|a| a.name.trim().to_string()).unwrap_or_default(),
      summary: entry.summary.trim().to_string(),
      document_url,
    }
  }
}

/// Window of results to walk and the pause between page requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
  /// Offset of the first result
  pub start:              usize,
  /// Offset at which to stop requesting pages (exclusive)
  pub total_results:      usize,
  /// Number of results asked for per request
  pub page_size:          usize,
  /// Sleep inserted between consecutive page requests
  pub wait_between_pages: Duration,
}

impl Pagination {
  /// Offsets of every page request this window produces.
  pub fn offsets(&self) -> impl Iterator<Item = usize> {
    (self.start..self.total_results).step_by(self.page_size.max(1))
  }
}

/// Client for the arXiv search API.
#[derive(Debug, Clone)]
pub struct MetadataClient {
  /// Internal web client used to connect to the API.
  http:     reqwest::Client,
  /// Query endpoint, without parameters.
  base_url: Url,
}

impl MetadataClient {
  /// Creates a client for the given query endpoint.
  pub fn new(base_url: &str) -> Result<Self> {
    let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
    Ok(Self { http, base_url: Url::parse(base_url)? })
  }

  /// The endpoint this client queries.
  pub fn base_url(&self) -> &Url { &self.base_url }

  /// Runs a search over the whole pagination window.
  ///
  /// Pages are requested strictly one after another, with
  /// `wait_between_pages` slept between them. Records are returned in feed
  /// order, including those without a PDF link.
  ///
  /// # Errors
  ///
  /// - [`HarvestError::Config`] if `page_size` is zero
  /// - [`HarvestError::Retrieval`] if any page returns a non-success status
  /// - [`HarvestError::Feed`] if any page is not a parsable Atom feed
  /// - [`HarvestError::Fetch`] if a request fails outright
  pub async fn search(
    &self,
    query: &SearchQuery,
    pagination: &Pagination,
  ) -> Result<Vec<PaperRecord>> {
    if pagination.page_size == 0 {
      return Err(HarvestError::Config("page_size must be at least 1".into()));
    }

    info!("Searching arXiv for {query}");
    let mut records = Vec::new();
    for (page, offset) in pagination.offsets().enumerate() {
      if page > 0 && !pagination.wait_between_pages.is_zero() {
        debug!("Waiting {:?} before next page", pagination.wait_between_pages);
        tokio::time::sleep(pagination.wait_between_pages).await;
      }

      info!("Results {} - {}", offset, offset.saturating_add(pagination.page_size));
      let batch = self.fetch_page(query, offset, pagination.page_size).await?;
      debug!("Page at offset {offset} held {} entries", batch.len());
      records.extend(batch);
    }

    Ok(records)
  }

  /// Requests a single page of results.
  pub async fn fetch_page(
    &self,
    query: &SearchQuery,
    start: usize,
    max_results: usize,
  ) -> Result<Vec<PaperRecord>> {
    let request = self.http.get(self.base_url.clone()).query(&[
      ("search_query", query.as_str()),
      ("start", &start.to_string()),
      ("max_results", &max_results.to_string()),
    ]);

    let failed = |source: reqwest::Error| HarvestError::Fetch { start, source };

    let response = request.send().await.map_err(failed)?;
    debug!("Fetched {}", response.url());

    let status = response.status();
    if !status.is_success() {
      trace!("Feed error response: {response:?}");
      return Err(HarvestError::Retrieval { start, status });
    }

    let body = response.text().await.map_err(failed)?;
    trace!("Feed response: {body}");
    parse_feed(&body)
  }
}

/// Parses an Atom feed page into records.
///
/// Entries with an empty `<id>` cannot be keyed and are dropped with a
/// warning.
pub fn parse_feed(xml: &str) -> Result<Vec<PaperRecord>> {
  let feed: Feed = quick_xml::de::from_str(xml)?;

  Ok(
    feed
      .entries
      .into_iter()
      .map(PaperRecord::from)
      .filter(|record| {
        if record.identifier.is_empty() {
          warn!("Dropping feed entry without an id: {:?}", record.title);
          return false;
        }
        true
      })
      .collect(),
  )
}

#[cfg(test)]
mod tests {
  use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
  };

  use super::*;

  const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <link href="http://arxiv.org/api/query?search_query%3Dti%3Agaia" rel="self" type="application/atom+xml"/>
  <title type="html">ArXiv Query: search_query=ti:gaia&amp;id_list=&amp;start=0&amp;max_results=10</title>
  <id>http://arxiv.org/api/cHxbiOdZaP56ODnBPIenZhzg5f8</id>
  <updated>2024-01-17T00:00:00-05:00</updated>
  <opensearch:totalResults xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">2</opensearch:totalResults>
  <entry>
    <id>http://arxiv.org/abs/1806.06038v2</id>
    <updated>2018-09-20T12:00:00Z</updated>
    <published>2018-06-15T18:00:01Z</published>
    <title>Co-formation of the disc and the stellar halo</title>
    <summary>  We use Gaia DR2 to study the halo.
    </summary>
    <author>
      <name>V. Belokurov</name>
    </author>
    <author>
      <name>D. Erkal</name>
    </author>
    <arxiv:doi xmlns:arxiv="http://arxiv.org/schemas/atom">10.1093/mnras/sty982</arxiv:doi>
    <link title="doi" href="http://dx.doi.org/10.1093/mnras/sty982" rel="related"/>
    <arxiv:comment xmlns:arxiv="http://arxiv.org/schemas/atom">14 pages</arxiv:comment>
    <link href="http://arxiv.org/abs/1806.06038v2" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/1806.06038v2" rel="related" type="application/pdf"/>
    <arxiv:primary_category xmlns:arxiv="http://arxiv.org/schemas/atom" term="astro-ph.GA" scheme="http://arxiv.org/schemas/atom"/>
    <category term="astro-ph.GA" scheme="http://arxiv.org/schemas/atom"/>
    <category term="astro-ph.SR" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/astro-ph/0601001v1</id>
    <published>2006-01-01T00:00:00Z</published>
    <title>A record without a PDF</title>
    <summary>Nothing to download.</summary>
    <link href="http://arxiv.org/abs/astro-ph/0601001v1" rel="alternate" type="text/html"/>
  </entry>
</feed>"#;

  /// A feed page holding one entry per identifier, each with a PDF link.
  fn feed_with(identifiers: &[&str]) -> String {
    let entries: String = identifiers
      .iter()
      .map(|id| {
        format!(
          r#"<entry><id>http://arxiv.org/abs/{id}</id><published>2024-01-01T00:00:00Z</published><title>Paper {id}</title><summary>s</summary><author><name>Author {id}</name></author><link title="pdf" href="http://arxiv.org/pdf/{id}" rel="related" type="application/pdf"/></entry>"#
        )
      })
      .collect();
    format!(r#"<feed xmlns="http://www.w3.org/2005/Atom">{entries}</feed>"#)
  }

  fn pagination(start: usize, total_results: usize, page_size: usize) -> Pagination {
    Pagination { start, total_results, page_size, wait_between_pages: Duration::ZERO }
  }

  #[test]
  fn test_parse_feed_entries() {
    let records = parse_feed(FEED).unwrap();
    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(first.identifier, "1806.06038v2");
    assert_eq!(first.title, "Co-formation of the disc and the stellar halo");
    assert_eq!(first.first_author, "V. Belokurov");
    assert_eq!(first.summary, "We use Gaia DR2 to study the halo.");
    assert_eq!(first.published, "2018-06-15T18:00:01Z");
    assert_eq!(first.document_url.as_deref(), Some("http://arxiv.org/pdf/1806.06038v2"));
  }

  #[test]
  fn test_record_without_pdf_is_kept() {
    let records = parse_feed(FEED).unwrap();
    let second = &records[1];
    assert_eq!(second.identifier, "astro-ph/0601001v1");
    assert_eq!(second.first_author, "");
    assert!(second.document_url.is_none());
  }

  #[test]
  fn test_parse_empty_feed() {
    let records = parse_feed(r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>empty</title></feed>"#).unwrap();
    assert!(records.is_empty());
  }

  #[test]
  fn test_parse_invalid_feed() {
    assert!(matches!(parse_feed("<feed><entry>"), Err(HarvestError::Feed(_))));
  }

  #[test]
  fn test_offsets() {
    assert_eq!(pagination(0, 10, 10).offsets().collect::<Vec<_>>(), vec![0]);
    assert_eq!(pagination(0, 25, 10).offsets().collect::<Vec<_>>(), vec![0, 10, 20]);
    assert_eq!(pagination(5, 5, 10).offsets().count(), 0);
  }

  #[traced_test]
  #[tokio::test]
  async fn test_single_page_when_page_size_covers_total() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/api/query"))
      .and(query_param("search_query", "cat:astro-ph.GA AND gaia"))
      .and(query_param("start", "0"))
      .and(query_param("max_results", "10"))
      .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
      .expect(1)
      .mount(&server)
      .await;

    let client = MetadataClient::new(&format!("{}/api/query", server.uri())).unwrap();
    let query = SearchQuery::in_category("astro-ph.GA", "gaia");
    let records = client.search(&query, &pagination(0, 10, 10)).await.unwrap();

    assert_eq!(records.len(), 2);
    assert!(logs_contain("Results 0 - 10"));
  }

  #[tokio::test]
  async fn test_pages_walk_offsets_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(query_param("start", "0"))
      .and(query_param("max_results", "2"))
      .respond_with(ResponseTemplate::new(200).set_body_string(feed_with(&["2401.00001v1", "2401.00002v1"])))
      .expect(1)
      .mount(&server)
      .await;
    Mock::given(method("GET"))
      .and(query_param("start", "2"))
      .and(query_param("max_results", "2"))
      .respond_with(ResponseTemplate::new(200).set_body_string(feed_with(&["2401.00003v1"])))
      .expect(1)
      .mount(&server)
      .await;

    let client = MetadataClient::new(&server.uri()).unwrap();
    let records =
      client.search(&SearchQuery::new("ti:gaia"), &pagination(0, 4, 2)).await.unwrap();

    let identifiers: Vec<_> = records.iter().map(|r| r.identifier.as_str()).collect();
    assert_eq!(identifiers, vec!["2401.00001v1", "2401.00002v1", "2401.00003v1"]);
    assert_eq!(records[2].first_author, "Author 2401.00003v1");
  }

  #[tokio::test]
  async fn test_wait_between_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_string(feed_with(&[])))
      .expect(2)
      .mount(&server)
      .await;

    let client = MetadataClient::new(&server.uri()).unwrap();
    let window = Pagination { wait_between_pages: Duration::from_millis(200), ..pagination(0, 2, 1) };
    let started = std::time::Instant::now();
    client.search(&SearchQuery::new("ti:gaia"), &window).await.unwrap();

    // one pause between two pages, none after the last
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(200));
    assert!(elapsed < Duration::from_millis(2000));
  }

  #[tokio::test]
  async fn test_failed_page_aborts_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(query_param("start", "0"))
      .respond_with(ResponseTemplate::new(200).set_body_string(feed_with(&["2401.00001v1"])))
      .mount(&server)
      .await;
    Mock::given(method("GET"))
      .and(query_param("start", "1"))
      .respond_with(ResponseTemplate::new(503))
      .mount(&server)
      .await;

    let client = MetadataClient::new(&server.uri()).unwrap();
    let result = client.search(&SearchQuery::new("ti:gaia"), &pagination(0, 2, 1)).await;

    match result {
      Err(HarvestError::Retrieval { start, status }) => {
        assert_eq!(start, 1);
        assert_eq!(status.as_u16(), 503);
      },
      other => panic!("expected retrieval error, got {other:?}"),
    }
  }

  #[traced_test]
  #[tokio::test]
  async fn test_oversized_page_size_logs_without_overflow() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(query_param("start", "1"))
      .respond_with(ResponseTemplate::new(200).set_body_string(feed_with(&[])))
      .expect(1)
      .mount(&server)
      .await;

    let client = MetadataClient::new(&server.uri()).unwrap();
    let records =
      client.search(&SearchQuery::new("ti:gaia"), &pagination(1, 2, usize::MAX)).await.unwrap();

    assert!(records.is_empty());
    assert!(logs_contain(&format!("Results 1 - {}", usize::MAX)));
  }

  #[tokio::test]
  async fn test_unreachable_feed_is_retrieval_error() {
    let client = MetadataClient::new("http://127.0.0.1:9/api/query").unwrap();
    let result = client.search(&SearchQuery::new("ti:gaia"), &pagination(20, 30, 10)).await;

    match result {
      Err(e @ HarvestError::Fetch { start: 20, .. }) => assert_eq!(e.stage(), "retrieval"),
      other => panic!("expected fetch error, got {other:?}"),
    }
  }

  #[tokio::test]
  async fn test_zero_page_size_rejected() {
    let client = MetadataClient::new("http://127.0.0.1:9/api/query").unwrap();
    let result = client.search(&SearchQuery::new("ti:gaia"), &pagination(0, 10, 0)).await;
    assert!(matches!(result, Err(HarvestError::Config(_))));
  }
}
