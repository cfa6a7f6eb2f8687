//! Paper record normalized from an arXiv feed entry.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder used when an entry has no title
pub const NO_TITLE: &str = "No title";

/// Placeholder used when an entry has no summary
pub const NO_SUMMARY: &str = "No summary";

/// Placeholder used when an entry has no link
pub const NO_LINK: &str = "No link";

/// Placeholder shown when an entry has no publication timestamp
pub const NO_PUBLISH_DATE: &str = "No publish date";

/// A paper returned by the arXiv search API.
///
/// Records are built fresh for every fetch and never mutated afterwards. Every
/// field the feed may omit has already been resolved to a placeholder, so
/// display code can read them without further checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    /// Paper title
    pub title: String,

    /// Author names joined with ", " (empty when the entry lists none)
    pub authors: String,

    /// Publication timestamp
    pub published_at: Option<DateTime<Utc>>,

    /// Abstract text
    pub summary: String,

    /// Abstract page URL
    pub link: String,
}

impl PaperRecord {
    /// Publication date (UTC calendar day)
    pub fn published_date(&self) -> Option<NaiveDate> {
        self.published_at.map(|ts| ts.date_naive())
    }

    /// Publication date formatted as `YYYY-MM-DD`, or a placeholder
    pub fn published_display(&self) -> String {
        self.published_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| NO_PUBLISH_DATE.to_string())
    }
}

/// Builder for constructing PaperRecord objects
///
/// Every field starts out absent; `build` substitutes the placeholders.
#[derive(Debug, Clone, Default)]
pub struct PaperRecordBuilder {
    title: Option<String>,
    authors: Vec<String>,
    published_at: Option<DateTime<Utc>>,
    summary: Option<String>,
    link: Option<String>,
}

impl PaperRecordBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set title
    pub fn title(mut self, title: Option<impl Into<String>>) -> Self {
        self.title = title.map(Into::into);
        self
    }

    /// Set all author names, in feed order
    pub fn authors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set publication timestamp
    pub fn published_at(mut self, ts: Option<DateTime<Utc>>) -> Self {
        self.published_at = ts;
        self
    }

    /// Set summary
    pub fn summary(mut self, summary: Option<impl Into<String>>) -> Self {
        self.summary = summary.map(Into::into);
        self
    }

    /// Set link
    pub fn link(mut self, link: Option<impl Into<String>>) -> Self {
        self.link = link.map(Into::into);
        self
    }

    /// Build the PaperRecord
    pub fn build(self) -> PaperRecord {
        PaperRecord {
            title: self.title.unwrap_or_else(|| NO_TITLE.to_string()),
            authors: self.authors.join(", "),
            published_at: self.published_at,
            summary: self.summary.unwrap_or_else(|| NO_SUMMARY.to_string()),
            link: self.link.unwrap_or_else(|| NO_LINK.to_string()),
        }
    }
}
