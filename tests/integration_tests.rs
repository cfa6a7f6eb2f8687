//! Integration tests for arXiv Search
//!
//! These tests drive the query builder and feed fetcher end to end against a
//! local mock of the arXiv API.

use arxiv_search::models::{
    FetchParams, FilterCriteria, FilterField, SearchOutcome, SortBy, SortOrder,
};
use arxiv_search::sources::{ArxivSource, SourceError};
use arxiv_search::utils::HttpClient;
use chrono::NaiveDate;
use mockito::Matcher;
use std::sync::Arc;

const TWO_ENTRY_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom"
      xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">
  <title>arXiv Query</title>
  <id>http://arxiv.org/api/test</id>
  <updated>2024-05-01T00:00:00-04:00</updated>
  <opensearch:totalResults>57</opensearch:totalResults>
  <opensearch:startIndex>0</opensearch:startIndex>
  <opensearch:itemsPerPage>2</opensearch:itemsPerPage>
  <entry>
    <id>http://arxiv.org/abs/2403.00001v1</id>
    <updated>2024-03-02T09:00:00Z</updated>
    <published>2024-03-01T09:00:00Z</published>
    <title>Deep Learning for Sparse Graphs</title>
    <summary>A study of graph sparsity.</summary>
    <author><name>A</name></author>
    <author><name>B</name></author>
    <link href="http://arxiv.org/abs/2403.00001v1" rel="alternate" type="text/html"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2402.00002v1</id>
    <updated>2024-02-11T09:00:00Z</updated>
    <published>2024-02-10T09:00:00Z</published>
    <title>Untitled Deep Learning Note</title>
    <summary>No authors here.</summary>
    <link href="http://arxiv.org/abs/2402.00002v1" rel="alternate" type="text/html"/>
  </entry>
</feed>"#;

const EMPTY_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom"
      xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">
  <title>arXiv Query</title>
  <id>http://arxiv.org/api/empty</id>
  <updated>2024-05-01T00:00:00-04:00</updated>
  <opensearch:totalResults>0</opensearch:totalResults>
</feed>"#;

fn source_for(server: &mockito::ServerGuard) -> ArxivSource {
    let client = Arc::new(HttpClient::new().unwrap());
    ArxivSource::with_client(client, format!("{}/api/query", server.url()))
}

#[tokio::test]
async fn test_fetch_normalizes_feed() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/query")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded(
                "search_query".into(),
                r#"ti:"deep learning" AND ANDNOT au:Smith"#.into(),
            ),
            Matcher::UrlEncoded("start".into(), "0".into()),
            Matcher::UrlEncoded("max_results".into(), "1000".into()),
            Matcher::UrlEncoded("sortBy".into(), "submittedDate".into()),
            Matcher::UrlEncoded("sortOrder".into(), "descending".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/atom+xml")
        .with_body(TWO_ENTRY_FEED)
        .create_async()
        .await;

    let criteria = FilterCriteria::new()
        .include(FilterField::Title, "deep learning")
        .exclude(FilterField::Author, "Smith");

    let result = source_for(&server)
        .fetch(&criteria.build_query(), &FetchParams::default())
        .await
        .unwrap();

    mock.assert_async().await;

    assert_eq!(result.outcome(), SearchOutcome::Found);
    assert_eq!(result.total_matches, 57);
    assert_eq!(result.papers.len(), 2);
    assert_eq!(result.papers[0].authors, "A, B");
    assert_eq!(result.papers[1].authors, "");
    assert_eq!(result.papers[0].title, "Deep Learning for Sparse Graphs");

    let (from, to) = result.published_range().unwrap();
    assert_eq!(from, NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
    assert_eq!(to, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
}

#[tokio::test]
async fn test_fetch_passes_paging_and_sorting() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/query")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded(
                "search_query".into(),
                "cat:cs.LG AND submittedDate:[202401010000 TO 300001010000]".into(),
            ),
            Matcher::UrlEncoded("start".into(), "10".into()),
            Matcher::UrlEncoded("max_results".into(), "5".into()),
            Matcher::UrlEncoded("sortBy".into(), "lastUpdatedDate".into()),
            Matcher::UrlEncoded("sortOrder".into(), "ascending".into()),
        ]))
        .with_status(200)
        .with_body(EMPTY_FEED)
        .create_async()
        .await;

    let criteria = FilterCriteria::new()
        .include(FilterField::Category, "cs.LG")
        .start_date(NaiveDate::from_ymd_opt(2024, 1, 1))
        .sort_by(SortBy::LastUpdatedDate)
        .sort_order(SortOrder::Ascending);
    let params = criteria.fetch_params(5).start(10);

    let result = source_for(&server)
        .fetch(&criteria.build_query(), &params)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(result.outcome(), SearchOutcome::NoResults);
    assert!(!result.is_malformed());
}

#[tokio::test]
async fn test_fetch_truncates_to_max_results() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/query")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(TWO_ENTRY_FEED)
        .create_async()
        .await;

    let criteria = FilterCriteria::new().include(FilterField::Title, "graphs");
    let result = source_for(&server)
        .fetch(&criteria.build_query(), &FetchParams::default().max_results(1))
        .await
        .unwrap();

    assert_eq!(result.papers.len(), 1);
    assert_eq!(result.total_matches, 57);
}

#[tokio::test]
async fn test_malformed_feed_returns_diagnostic() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/query")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("this is not a feed")
        .create_async()
        .await;

    let criteria = FilterCriteria::new().include(FilterField::Title, "anything");
    let result = source_for(&server)
        .fetch(&criteria.build_query(), &FetchParams::default())
        .await
        .unwrap();

    assert!(result.papers.is_empty());
    assert_eq!(result.total_matches, 0);
    match result.outcome() {
        SearchOutcome::Malformed(diagnostic) => assert!(!diagnostic.is_empty()),
        other => panic!("expected malformed outcome, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_status_is_a_hard_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/query")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let criteria = FilterCriteria::new().include(FilterField::Author, "Hinton");
    let err = source_for(&server)
        .fetch(&criteria.build_query(), &FetchParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, SourceError::Api(_)));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_connection_refused_propagates() {
    let client = Arc::new(HttpClient::new().unwrap());
    let source = ArxivSource::with_client(client, "http://127.0.0.1:1/api/query");

    let criteria = FilterCriteria::new().include(FilterField::Title, "offline");
    let err = source
        .fetch(&criteria.build_query(), &FetchParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, SourceError::Network(_)));
}
