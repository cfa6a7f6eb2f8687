//! arXiv subject categories offered as search filters.

use serde::Serialize;

use crate::sources::SourceError;

/// A subject category and its arXiv code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Human-readable name
    pub name: &'static str,

    /// arXiv category code, e.g. `cs.AI`
    pub code: &'static str,
}

const fn cat(name: &'static str, code: &'static str) -> Category {
    Category { name, code }
}

/// The categories offered as filters, in display order
pub const CATEGORIES: [Category; 12] = [
    cat("Artificial Intelligence", "cs.AI"),
    cat("Computation and Language", "cs.CL"),
    cat("Computer Vision and Pattern Recognition", "cs.CV"),
    cat("Machine Learning", "cs.LG"),
    cat("Multiagent Systems", "cs.MA"),
    cat("Quantum Physics", "quant-ph"),
    cat("High Energy Physics - Theory", "hep-th"),
    cat("High Energy Physics - Experiment", "hep-ex"),
    cat("Mathematics", "math"),
    cat("Statistics", "stat"),
    cat("Electrical Engineering and Systems Science", "eess"),
    cat("Economics", "econ"),
];

/// All filter categories
pub fn categories() -> &'static [Category] {
    &CATEGORIES
}

/// Look up a category code by its display name (case-insensitive)
pub fn code_for_name(name: &str) -> Option<&'static str> {
    let name = name.trim();
    CATEGORIES
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .map(|c| c.code)
}

/// Resolve user input that is either a display name or a category code
pub fn resolve_category(input: &str) -> Result<&'static str, SourceError> {
    let input = input.trim();
    code_for_name(input)
        .or_else(|| {
            CATEGORIES
                .iter()
                .find(|c| c.code.eq_ignore_ascii_case(input))
                .map(|c| c.code)
        })
        .ok_or_else(|| SourceError::InvalidRequest(format!("unknown category: {}", input)))
}
