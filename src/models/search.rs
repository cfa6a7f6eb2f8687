//! Search criteria, fetch parameters and search result models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::models::PaperRecord;
use crate::query::{build_query, EncodedQuery};

/// Part of a paper record that a term restricts.
///
/// Variant order is the order clauses are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterField {
    Title,
    Abstract,
    Author,
    Category,
}

impl FilterField {
    /// Field prefix in the arXiv query grammar
    pub fn prefix(&self) -> &'static str {
        match self {
            FilterField::Title => "ti",
            FilterField::Abstract => "abs",
            FilterField::Author => "au",
            FilterField::Category => "cat",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Terms grouped by field
pub type TermMap = BTreeMap<FilterField, Vec<String>>;

/// Sort field accepted by the arXiv API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    Relevance,
    LastUpdatedDate,
    #[default]
    SubmittedDate,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Relevance => "relevance",
            SortBy::LastUpdatedDate => "lastUpdatedDate",
            SortBy::SubmittedDate => "submittedDate",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction accepted by the arXiv API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured filter criteria for one search.
///
/// The same field may appear in both `include` and `exclude`, and repeated
/// terms are kept as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Terms a paper must match
    pub include: TermMap,

    /// Terms a paper must not match
    pub exclude: TermMap,

    /// Earliest submission date (inclusive)
    pub start_date: Option<NaiveDate>,

    /// Latest submission date (inclusive)
    pub end_date: Option<NaiveDate>,

    /// Sort field
    pub sort_by: SortBy,

    /// Sort direction
    pub sort_order: SortOrder,
}

impl FilterCriteria {
    /// Create empty criteria
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an include term
    pub fn include(mut self, field: FilterField, term: impl Into<String>) -> Self {
        self.include.entry(field).or_default().push(term.into());
        self
    }

    /// Add several include terms for one field
    pub fn include_terms<I, S>(mut self, field: FilterField, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut terms = terms.into_iter().map(Into::into).peekable();
        if terms.peek().is_some() {
            self.include.entry(field).or_default().extend(terms);
        }
        self
    }

    /// Add an exclude term
    pub fn exclude(mut self, field: FilterField, term: impl Into<String>) -> Self {
        self.exclude.entry(field).or_default().push(term.into());
        self
    }

    /// Add several exclude terms for one field
    pub fn exclude_terms<I, S>(mut self, field: FilterField, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut terms = terms.into_iter().map(Into::into).peekable();
        if terms.peek().is_some() {
            self.exclude.entry(field).or_default().extend(terms);
        }
        self
    }

    /// Set start date
    pub fn start_date(mut self, date: Option<NaiveDate>) -> Self {
        self.start_date = date;
        self
    }

    /// Set end date
    pub fn end_date(mut self, date: Option<NaiveDate>) -> Self {
        self.end_date = date;
        self
    }

    /// Set sort by
    pub fn sort_by(mut self, sort: SortBy) -> Self {
        self.sort_by = sort;
        self
    }

    /// Set sort order
    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    /// Build the encoded arXiv query for these criteria
    pub fn build_query(&self) -> EncodedQuery {
        build_query(&self.include, &self.exclude, self.start_date, self.end_date)
    }

    /// Fetch parameters carrying this criteria's sort settings
    pub fn fetch_params(&self, max_results: usize) -> FetchParams {
        FetchParams::default()
            .max_results(max_results)
            .sort_by(self.sort_by)
            .sort_order(self.sort_order)
    }
}

/// Paging and sorting parameters for one feed request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchParams {
    /// Zero-based offset into the result set
    pub start: usize,

    /// Maximum number of entries to request
    pub max_results: usize,

    /// Sort field
    pub sort_by: SortBy,

    /// Sort direction
    pub sort_order: SortOrder,
}

/// Default number of entries requested per fetch
pub const DEFAULT_MAX_RESULTS: usize = 1000;

impl Default for FetchParams {
    fn default() -> Self {
        Self {
            start: 0,
            max_results: DEFAULT_MAX_RESULTS,
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl FetchParams {
    /// Set start offset
    pub fn start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    /// Set maximum results
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Set sort by
    pub fn sort_by(mut self, sort: SortBy) -> Self {
        self.sort_by = sort;
        self
    }

    /// Set sort order
    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }
}

/// How a fetch turned out, from the caller's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome<'a> {
    /// At least one paper was returned
    Found,
    /// The feed parsed but held no entries
    NoResults,
    /// The feed could not be parsed; carries the parser diagnostic
    Malformed(&'a str),
}

/// Papers returned by one fetch, plus the index-wide match count
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Papers in feed order
    pub papers: Vec<PaperRecord>,

    /// Total matches reported by arXiv (may exceed `papers.len()`)
    pub total_matches: u64,

    /// Parser diagnostic when the feed was malformed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl SearchResult {
    /// Create a result from a successfully parsed feed
    pub fn new(papers: Vec<PaperRecord>, total_matches: u64) -> Self {
        Self {
            papers,
            total_matches,
            diagnostic: None,
        }
    }

    /// Create the empty result reported for a malformed feed
    pub fn malformed(diagnostic: impl Into<String>) -> Self {
        Self {
            papers: Vec::new(),
            total_matches: 0,
            diagnostic: Some(diagnostic.into()),
        }
    }

    pub fn is_malformed(&self) -> bool {
        self.diagnostic.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    pub fn outcome(&self) -> SearchOutcome<'_> {
        match &self.diagnostic {
            Some(msg) => SearchOutcome::Malformed(msg),
            None if self.papers.is_empty() => SearchOutcome::NoResults,
            None => SearchOutcome::Found,
        }
    }

    /// Earliest and latest publication dates among the returned papers
    pub fn published_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.papers.iter().filter_map(PaperRecord::published_date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }

    /// The first `n` papers, for display
    pub fn top(&self, n: usize) -> &[PaperRecord] {
        &self.papers[..n.min(self.papers.len())]
    }
}
