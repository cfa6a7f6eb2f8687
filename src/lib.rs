//! # arXiv Search
//!
//! Search the arXiv preprint repository with field-scoped include/exclude
//! terms, subject categories and a submission date window.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (FilterCriteria, PaperRecord, SearchResult, categories)
//! - [`query`]: Query builder for the arXiv boolean query grammar
//! - [`sources`]: Feed fetcher that normalizes the arXiv Atom feed
//! - [`config`]: Configuration management
//! - [`utils`]: HTTP client
//! - [`ui`]: Terminal output helpers for the CLI
//!
//! ```rust,no_run
//! use arxiv_search::models::{FilterCriteria, FilterField};
//! use arxiv_search::sources::ArxivSource;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let criteria = FilterCriteria::new()
//!     .include(FilterField::Title, "graph neural network")
//!     .include(FilterField::Category, "cs.LG");
//!
//! let source = ArxivSource::new()?;
//! let result = source
//!     .fetch(&criteria.build_query(), &criteria.fetch_params(100))
//!     .await?;
//!
//! println!("{} of {} papers", result.papers.len(), result.total_matches);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod models;
pub mod query;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use models::{FilterCriteria, FilterField, PaperRecord, SearchResult};
pub use query::{build_query, EncodedQuery};
pub use sources::{ArxivSource, SourceError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
