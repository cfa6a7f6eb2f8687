//! Remote search sources.
//!
//! [`ArxivSource`] turns an [`EncodedQuery`](crate::query::EncodedQuery) into
//! normalized [`PaperRecord`](crate::models::PaperRecord)s by fetching and
//! parsing the arXiv Atom feed.
//!
//! # Failure kinds
//!
//! - A feed that does not parse is *not* an error: the fetch returns an empty
//!   [`SearchResult`](crate::models::SearchResult) carrying the parser diagnostic.
//! - Connectivity problems and non-success HTTP statuses are returned as
//!   [`SourceError`] and are never retried.
//! - A feed with no entries is a normal, empty result.

mod arxiv;

pub use arxiv::{ArxivSource, ARXIV_API_URL};

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// API error from the source
    #[error("API error: {0}")]
    Api(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SourceError {
    /// Whether this error came from the transport rather than the caller's input
    pub fn is_transport(&self) -> bool {
        matches!(self, SourceError::Network(_) | SourceError::Api(_))
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<url::ParseError> for SourceError {
    fn from(err: url::ParseError) -> Self {
        SourceError::Config(format!("invalid API URL: {}", err))
    }
}
