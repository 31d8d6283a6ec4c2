//! Selection catalog
//!
//! Industries and consulting firms offered by the selection pages.

use serde::Serialize;

/// Consulting firms researched by default
pub const CONSULTING_FIRMS: &[&str] = &[
    "McKinsey & Company",
    "Boston Consulting Group",
    "Bain & Company",
    "Accenture",
    "Deloitte Consulting",
    "PwC Strategy&",
    "EY-Parthenon",
    "KPMG Advisory",
    "Booz Allen Hamilton",
    "Oliver Wyman",
];

/// Industries offered by the industry selector
pub const INDUSTRIES: &[&str] = &[
    "FinTech",
    "HealthTech",
    "EdTech",
    "Climate Tech",
    "AI/ML",
    "E-commerce",
    "SaaS",
    "Enterprise Software",
    "Consumer Apps",
    "IoT & Hardware",
];

/// Catalog response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    /// Selectable industries
    pub industries: &'static [&'static str],
    /// Selectable consulting firms
    pub consulting_firms: &'static [&'static str],
}

/// The full catalog
pub fn catalog() -> Catalog {
    Catalog {
        industries: INDUSTRIES,
        consulting_firms: CONSULTING_FIRMS,
    }
}
