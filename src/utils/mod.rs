//! Utility modules supporting search operations.
//!
//! - [`HttpClient`]: shared reqwest client with configured timeouts and user agent

mod http;

pub use http::{HttpClient, DEFAULT_USER_AGENT};
