//! arXiv feed fetcher and normalizer.

use feed_rs::parser;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ArxivConfig;
use crate::models::{FetchParams, PaperRecord, PaperRecordBuilder, SearchResult};
use crate::query::EncodedQuery;
use crate::sources::SourceError;
use crate::utils::HttpClient;

/// Base URL for arXiv API
pub const ARXIV_API_URL: &str = "http://export.arxiv.org/api/query";

/// arXiv search source
///
/// Each call to [`fetch`](Self::fetch) issues exactly one request and keeps no
/// state between calls.
#[derive(Debug, Clone)]
pub struct ArxivSource {
    client: Arc<HttpClient>,
    api_url: String,
}

impl ArxivSource {
    /// Create a new arXiv source against the public endpoint
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self {
            client: Arc::new(HttpClient::new()?),
            api_url: ARXIV_API_URL.to_string(),
        })
    }

    /// Create a source from configuration
    pub fn from_config(config: &ArxivConfig) -> Result<Self, SourceError> {
        url::Url::parse(&config.api_url)?;

        let client = HttpClient::with_settings(
            &config.user_agent,
            Duration::from_secs(config.timeout_secs),
            Duration::from_secs(config.connect_timeout_secs),
        )?;

        Ok(Self::with_client(Arc::new(client), &config.api_url))
    }

    /// Create with a custom HTTP client and endpoint (for testing)
    pub fn with_client(client: Arc<HttpClient>, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    /// Full request URL for a query and its paging/sorting parameters
    pub fn request_url(&self, query: &EncodedQuery, params: &FetchParams) -> String {
        format!(
            "{}?search_query={}&start={}&max_results={}&sortBy={}&sortOrder={}",
            self.api_url,
            query,
            params.start,
            params.max_results,
            params.sort_by,
            params.sort_order
        )
    }

    /// Run a search and normalize the returned feed.
    ///
    /// A feed that fails to parse yields an empty [`SearchResult`] with a
    /// diagnostic. Network failures and non-success statuses are returned as
    /// errors.
    pub async fn fetch(
        &self,
        query: &EncodedQuery,
        params: &FetchParams,
    ) -> Result<SearchResult, SourceError> {
        let url = self.request_url(query, params);
        tracing::debug!(url = %url, "Fetching arXiv feed");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/atom+xml")
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to fetch arXiv results: {}", e)))?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "arXiv API returned status: {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read response: {}", e)))?;

        let result = Self::parse_feed(bytes.as_ref(), params.max_results);
        if let Some(diagnostic) = &result.diagnostic {
            tracing::warn!(%diagnostic, "arXiv returned a malformed feed");
        } else {
            tracing::info!(
                returned = result.papers.len(),
                total = result.total_matches,
                "arXiv search complete"
            );
        }

        Ok(result)
    }

    /// Normalize a raw Atom feed into at most `max_results` papers.
    pub fn parse_feed(body: &[u8], max_results: usize) -> SearchResult {
        let feed = match parser::parse(body) {
            Ok(feed) => feed,
            Err(e) => return SearchResult::malformed(format!("Failed to parse feed: {}", e)),
        };

        let papers = feed
            .entries
            .iter()
            .take(max_results)
            .map(Self::parse_entry)
            .collect();

        SearchResult::new(papers, Self::total_results(body))
    }

    /// Read `opensearch:totalResults` from the feed header, defaulting to 0
    fn total_results(body: &[u8]) -> u64 {
        let mut reader = Reader::from_reader(body);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut in_total = false;
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => in_total = e.local_name().as_ref() == b"totalResults",
                Ok(Event::Text(text)) if in_total => {
                    return text
                        .unescape()
                        .ok()
                        .and_then(|s| s.trim().parse().ok())
                        .unwrap_or(0);
                }
                Ok(Event::End(_)) => in_total = false,
                Ok(Event::Eof) | Err(_) => return 0,
                _ => {}
            }
            buf.clear();
        }
    }

    /// Parse an Atom feed entry into a PaperRecord
    fn parse_entry(entry: &feed_rs::model::Entry) -> PaperRecord {
        // arXiv wraps long titles over several lines
        let title = entry
            .title
            .as_ref()
            .map(|t| t.content.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|t| !t.is_empty());

        let summary = entry
            .summary
            .as_ref()
            .map(|s| s.content.trim().to_string())
            .filter(|s| !s.is_empty());

        let link = entry
            .links
            .iter()
            .find(|l| l.rel.as_deref() == Some("alternate"))
            .or_else(|| entry.links.first())
            .map(|l| l.href.clone());

        PaperRecordBuilder::new()
            .title(title)
            .authors(entry.authors.iter().map(|a| a.name.trim()))
            .published_at(entry.published)
            .summary(summary)
            .link(link)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SortBy, SortOrder, NO_LINK, NO_SUMMARY, NO_TITLE};
    use chrono::{TimeZone, Utc};

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom"
      xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/"
      xmlns:arxiv="http://arxiv.org/schemas/atom">
  <title>arXiv Query: search_query=ti:transformer</title>
  <id>http://arxiv.org/api/abc</id>
  <updated>2024-05-01T00:00:00-04:00</updated>
  <opensearch:totalResults>57</opensearch:totalResults>
  <opensearch:startIndex>0</opensearch:startIndex>
  <opensearch:itemsPerPage>2</opensearch:itemsPerPage>
  <entry>
    <id>http://arxiv.org/abs/2301.12345v1</id>
    <updated>2023-01-16T10:00:00Z</updated>
    <published>2023-01-15T10:00:00Z</published>
    <title>Sparse Attention
      for Long Documents</title>
    <summary>  We study sparse attention.  </summary>
    <author><name>Ada Lovelace</name></author>
    <author><name>Alan Turing</name></author>
    <link href="http://arxiv.org/abs/2301.12345v1" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2301.12345v1" rel="related" type="application/pdf"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2302.00001v2</id>
    <updated>2023-02-02T08:30:00Z</updated>
    <published>2023-02-01T08:30:00Z</published>
    <title>Anonymous Results</title>
    <summary>No authors listed.</summary>
    <link href="http://arxiv.org/abs/2302.00001v2" rel="alternate" type="text/html"/>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_feed_normalizes_entries() {
        let result = ArxivSource::parse_feed(FEED.as_bytes(), 1000);

        assert!(!result.is_malformed());
        assert_eq!(result.total_matches, 57);
        assert_eq!(result.papers.len(), 2);

        let first = &result.papers[0];
        assert_eq!(first.title, "Sparse Attention for Long Documents");
        assert_eq!(first.authors, "Ada Lovelace, Alan Turing");
        assert_eq!(first.summary, "We study sparse attention.");
        assert_eq!(first.link, "http://arxiv.org/abs/2301.12345v1");
        assert_eq!(
            first.published_at,
            Some(Utc.with_ymd_and_hms(2023, 1, 15, 10, 0, 0).unwrap())
        );

        assert_eq!(result.papers[1].authors, "");
    }

    #[test]
    fn test_parse_feed_caps_at_max_results() {
        let result = ArxivSource::parse_feed(FEED.as_bytes(), 1);
        assert_eq!(result.papers.len(), 1);
        assert_eq!(result.total_matches, 57);
    }

    #[test]
    fn test_missing_fields_use_placeholders() {
        let feed = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>arXiv Query</title>
  <id>http://arxiv.org/api/empty</id>
  <updated>2024-05-01T00:00:00Z</updated>
  <entry>
    <id>http://arxiv.org/abs/2401.00001v1</id>
    <updated>2024-01-01T00:00:00Z</updated>
  </entry>
</feed>"#;

        let result = ArxivSource::parse_feed(feed.as_bytes(), 10);
        assert_eq!(result.total_matches, 0);
        assert_eq!(result.papers.len(), 1);

        let paper = &result.papers[0];
        assert_eq!(paper.title, NO_TITLE);
        assert_eq!(paper.summary, NO_SUMMARY);
        assert_eq!(paper.link, NO_LINK);
        assert!(paper.published_at.is_none());
    }

    #[test]
    fn test_malformed_feed() {
        let body = br#"<feed xmlns="http://www.w3.org/2005/Atom"><entry><title>broken</entry></feed>"#;
        let result = ArxivSource::parse_feed(body, 10);

        assert!(result.is_malformed());
        assert!(result.papers.is_empty());
        assert_eq!(result.total_matches, 0);
        assert!(!result.diagnostic.unwrap().is_empty());
    }

    #[test]
    fn test_plain_text_body_is_malformed() {
        let result = ArxivSource::parse_feed(b"Service Unavailable", 10);
        assert!(result.is_malformed());
        assert_eq!(result.total_matches, 0);
    }

    #[test]
    fn test_undeclared_entity_is_kept_verbatim() {
        let feed = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">
  <title>arXiv Query</title>
  <id>http://arxiv.org/api/nbsp</id>
  <updated>2024-05-01T00:00:00Z</updated>
  <opensearch:totalResults>1</opensearch:totalResults>
  <entry>
    <id>http://arxiv.org/abs/2403.00002v1</id>
    <updated>2024-03-02T00:00:00Z</updated>
    <published>2024-03-01T00:00:00Z</published>
    <title>Spacing &amp; Layout</title>
    <summary>a &nbsp; b</summary>
  </entry>
</feed>"#;

        let result = ArxivSource::parse_feed(feed.as_bytes(), 10);
        assert!(!result.is_malformed());
        assert_eq!(result.total_matches, 1);
        assert_eq!(result.papers.len(), 1);
        assert_eq!(result.papers[0].title, "Spacing & Layout");
        assert!(result.papers[0].summary.contains("&nbsp;"));
    }

    #[test]
    fn test_empty_feed_is_not_malformed() {
        let feed = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">
  <title>arXiv Query</title>
  <id>http://arxiv.org/api/none</id>
  <updated>2024-05-01T00:00:00Z</updated>
  <opensearch:totalResults>0</opensearch:totalResults>
</feed>"#;

        let result = ArxivSource::parse_feed(feed.as_bytes(), 10);
        assert!(!result.is_malformed());
        assert!(result.is_empty());
        assert_eq!(result.total_matches, 0);
    }

    #[test]
    fn test_request_url() {
        let source = ArxivSource::new().unwrap();
        let query = crate::models::FilterCriteria::new()
            .include(crate::models::FilterField::Title, "deep learning")
            .build_query();
        let params = FetchParams::default()
            .start(20)
            .max_results(50)
            .sort_by(SortBy::Relevance)
            .sort_order(SortOrder::Ascending);

        let url = source.request_url(&query, &params);
        assert_eq!(
            url,
            format!(
                "{}?search_query={}&start=20&max_results=50&sortBy=relevance&sortOrder=ascending",
                ARXIV_API_URL,
                query.as_str()
            )
        );
        assert!(!url.contains(' '));
    }

    #[test]
    fn test_from_config_rejects_bad_url() {
        let config = ArxivConfig {
            api_url: "::not a url::".to_string(),
            ..ArxivConfig::default()
        };
        assert!(matches!(
            ArxivSource::from_config(&config),
            Err(SourceError::Config(_))
        ));
    }
}
