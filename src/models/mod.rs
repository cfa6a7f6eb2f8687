//! Core data models for arXiv search criteria and results.

mod category;
mod paper;
mod search;

pub use category::{categories, code_for_name, resolve_category, Category, CATEGORIES};
pub use paper::{
    PaperRecord, PaperRecordBuilder, NO_LINK, NO_PUBLISH_DATE, NO_SUMMARY, NO_TITLE,
};
pub use search::{
    FetchParams, FilterCriteria, FilterField, SearchOutcome, SearchResult, SortBy, SortOrder,
    TermMap, DEFAULT_MAX_RESULTS,
};
