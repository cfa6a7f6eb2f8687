//! Translation of structured filter criteria into the arXiv query grammar.
//!
//! The arXiv API takes a single boolean expression in `search_query`:
//!
//! - field clauses such as `ti:transformer` or `au:"Geoffrey Hinton"`
//! - negation with `ANDNOT`
//! - a submission window `submittedDate:[YYYYMMDDHHMM TO YYYYMMDDHHMM]`
//! - clauses joined with `AND`
//!
//! ```rust
//! use arxiv_search::models::{FilterCriteria, FilterField};
//!
//! let query = FilterCriteria::new()
//!     .include(FilterField::Title, "deep learning")
//!     .exclude(FilterField::Author, "Smith")
//!     .build_query();
//!
//! assert_eq!(query.decoded(), r#"ti:"deep learning" AND ANDNOT au:Smith"#);
//! ```

use chrono::NaiveDate;
use std::fmt;

use crate::models::TermMap;

/// Separator placed between clauses
pub const CLAUSE_SEPARATOR: &str = " AND ";

/// Lower bound used when no start date is given
pub const MIN_SUBMITTED: &str = "000001010000";

/// Upper bound used when no end date is given
pub const MAX_SUBMITTED: &str = "300001010000";

/// A percent-encoded arXiv query, ready for the `search_query` parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EncodedQuery(String);

impl EncodedQuery {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The query with percent-encoding removed, for logs and display
    pub fn decoded(&self) -> String {
        urlencoding::decode(&self.0)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| self.0.clone())
    }
}

impl fmt::Display for EncodedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Quote a term as a phrase if it contains any whitespace
fn quote_term(term: &str) -> String {
    if term.chars().any(char::is_whitespace) {
        format!("\"{}\"", term)
    } else {
        term.to_string()
    }
}

fn field_clauses<'a>(terms: &'a TermMap, negate: bool) -> impl Iterator<Item = String> + 'a {
    terms.iter().flat_map(move |(field, terms)| {
        terms.iter().map(move |term| {
            let clause = format!("{}:{}", field.prefix(), quote_term(term));
            if negate {
                format!("ANDNOT {}", clause)
            } else {
                clause
            }
        })
    })
}

/// Build the `submittedDate` clause, or `None` when neither bound is set.
///
/// Both bounds are inclusive: the start day from midnight, the end day up to 23:59.
pub fn date_clause(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<String> {
    if start.is_none() && end.is_none() {
        return None;
    }

    let start = start
        .map(|d| d.format("%Y%m%d0000").to_string())
        .unwrap_or_else(|| MIN_SUBMITTED.to_string());
    let end = end
        .map(|d| d.format("%Y%m%d2359").to_string())
        .unwrap_or_else(|| MAX_SUBMITTED.to_string());

    Some(format!("submittedDate:[{} TO {}]", start, end))
}

/// Build the encoded query string for the given include/exclude terms and date bounds.
///
/// Include clauses come first (grouped by field), then exclude clauses, then
/// the date clause. With no terms and no dates the result is empty.
pub fn build_query(
    include: &TermMap,
    exclude: &TermMap,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> EncodedQuery {
    let clauses: Vec<String> = field_clauses(include, false)
        .chain(field_clauses(exclude, true))
        .chain(date_clause(start_date, end_date))
        .collect();

    let joined = clauses.join(CLAUSE_SEPARATOR);
    tracing::debug!(query = %joined, "Built arXiv query");

    EncodedQuery(urlencoding::encode(&joined).into_owned())
}

/// Split a comma-separated list of terms, trimming each and dropping blanks
pub fn split_terms(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}
