// src/evaluation/mod.rs
//! Resume-versus-job evaluation: prompt construction, the external
//! evaluator call, and normalization of its response into the canonical
//! record shape.

use serde::{Deserialize, Serialize};

pub mod client;
pub mod normalizer;
pub mod prompts;

pub use client::EvaluatorClient;
pub use normalizer::{EvaluationNormalizer, NormalizeError};

/// Per-category sub-scores, each clamped into [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub technical_skills: f64,
    pub experience: f64,
    pub education: f64,
    pub communication: f64,
}

/// The three-valued evaluation verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Shortlist,
    #[serde(rename = "Needs Review")]
    NeedsReview,
    Reject,
}

impl Verdict {
    /// Parse an evaluator-supplied verdict string. Anything outside the
    /// three literals falls back to `NeedsReview`.
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "Shortlist" => Some(Verdict::Shortlist),
            "Needs Review" => Some(Verdict::NeedsReview),
            "Reject" => Some(Verdict::Reject),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Shortlist => "Shortlist",
            Verdict::NeedsReview => "Needs Review",
            Verdict::Reject => "Reject",
        }
    }
}

/// The canonical, fully validated evaluation produced by normalization.
///
/// Every field is always present; numeric fields are in range and the
/// verdict is one of the three literals by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub score: f64,
    pub verdict: Verdict,
    pub category_breakdown: CategoryBreakdown,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub feedback: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_literals() {
        assert_eq!(Verdict::from_raw("Shortlist"), Some(Verdict::Shortlist));
        assert_eq!(Verdict::from_raw("Needs Review"), Some(Verdict::NeedsReview));
        assert_eq!(Verdict::from_raw("Reject"), Some(Verdict::Reject));
        assert_eq!(Verdict::from_raw("Maybe"), None);
        assert_eq!(Verdict::from_raw("shortlist"), None);
    }

    #[test]
    fn test_verdict_serializes_to_literals() {
        let json = serde_json::to_string(&Verdict::NeedsReview).unwrap();
        assert_eq!(json, "\"Needs Review\"");
    }
}
