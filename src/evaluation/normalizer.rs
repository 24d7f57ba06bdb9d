// src/evaluation/normalizer.rs
//! Normalization of the evaluator's free-text response into the canonical
//! evaluation record.
//!
//! The evaluator is asked for a specific JSON shape but is not trusted to
//! deliver it: the payload may be fenced in markdown, keys may be missing,
//! numbers may be out of range. Structural problems (unparseable payload,
//! missing required key) are hard failures the caller can retry against the
//! evaluator; everything else is corrected in place so the returned record
//! is always schema-valid.

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use super::{CategoryBreakdown, EvaluationRecord, Verdict};

const REQUIRED_FIELDS: [&str; 8] = [
    "score",
    "verdict",
    "category_breakdown",
    "matched_skills",
    "missing_skills",
    "pros",
    "cons",
    "feedback",
];

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("evaluator response contained no parseable JSON payload: {0}")]
    InvalidJson(String),
    #[error("evaluator response is missing required field `{0}`")]
    MissingField(&'static str),
}

pub struct EvaluationNormalizer;

impl EvaluationNormalizer {
    /// Extract, parse, validate, and coerce one evaluator response.
    pub fn normalize(raw: &str) -> Result<EvaluationRecord, NormalizeError> {
        let payload = extract_payload(raw);

        let value: Value = serde_json::from_str(payload)
            .map_err(|e| NormalizeError::InvalidJson(e.to_string()))?;
        let object = value
            .as_object()
            .ok_or_else(|| NormalizeError::InvalidJson("payload is not a JSON object".into()))?;

        for field in REQUIRED_FIELDS {
            if !object.contains_key(field) {
                return Err(NormalizeError::MissingField(field));
            }
        }

        let score = object["score"].as_f64().unwrap_or(0.0).clamp(0.0, 100.0);

        let verdict = match object["verdict"].as_str().and_then(Verdict::from_raw) {
            Some(verdict) => verdict,
            None => {
                warn!(
                    "unrecognized verdict {:?}, defaulting to Needs Review",
                    object["verdict"]
                );
                Verdict::NeedsReview
            }
        };

        // The evaluator names its sub-scores {skills, experience, education,
        // communication}; "skills" maps to the canonical "technical_skills".
        let breakdown = object["category_breakdown"].as_object();
        let sub_score = |key: &str| -> f64 {
            breakdown
                .and_then(|map| map.get(key))
                .and_then(Value::as_f64)
                .unwrap_or(0.0)
                .clamp(0.0, 100.0)
        };
        let category_breakdown = CategoryBreakdown {
            technical_skills: sub_score("skills"),
            experience: sub_score("experience"),
            education: sub_score("education"),
            communication: sub_score("communication"),
        };

        Ok(EvaluationRecord {
            score,
            verdict,
            category_breakdown,
            matched_skills: string_items(&object["matched_skills"]),
            missing_skills: string_items(&object["missing_skills"]),
            pros: string_items(&object["pros"]),
            cons: string_items(&object["cons"]),
            feedback: match object["feedback"].as_str() {
                Some(text) => text.to_string(),
                None => object["feedback"].to_string(),
            },
        })
    }
}

/// Pull the JSON payload out of the response text.
///
/// Priority: a "```json" fenced block, then any "```" fenced block, then
/// the whole trimmed text. A fence left unclosed runs to the end of the
/// text.
fn extract_payload(raw: &str) -> &str {
    if let Some(start) = raw.find("```json") {
        let rest = &raw[start + 7..];
        let end = rest.find("```").unwrap_or(rest.len());
        return rest[..end].trim();
    }
    if let Some(start) = raw.find("```") {
        let rest = &raw[start + 3..];
        let end = rest.find("```").unwrap_or(rest.len());
        return rest[..end].trim();
    }
    raw.trim()
}

/// Pass a JSON array through as strings, no size cap, no dedup. Non-string
/// scalars are stringified rather than dropped.
fn string_items(value: &Value) -> Vec<String> {
    match value.as_array() {
        Some(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_response(score: &str, verdict: &str) -> String {
        format!(
            r#"{{
                "score": {score},
                "verdict": "{verdict}",
                "category_breakdown": {{"skills": 90, "experience": 70, "education": 60, "communication": 80}},
                "matched_skills": ["Rust", "SQL"],
                "missing_skills": ["Kubernetes"],
                "pros": ["strong systems background"],
                "cons": ["no cloud experience"],
                "feedback": "Solid candidate."
            }}"#
        )
    }

    #[test]
    fn test_normalize_plain_json() {
        let record = EvaluationNormalizer::normalize(&full_response("85", "Shortlist")).unwrap();
        assert_eq!(record.score, 85.0);
        assert_eq!(record.verdict, Verdict::Shortlist);
        assert_eq!(record.matched_skills, vec!["Rust", "SQL"]);
        assert_eq!(record.feedback, "Solid candidate.");
    }

    #[test]
    fn test_normalize_json_fenced_block() {
        let raw = format!(
            "Here is my assessment:\n```json\n{}\n```\nLet me know.",
            full_response("72", "Needs Review")
        );
        let record = EvaluationNormalizer::normalize(&raw).unwrap();
        assert_eq!(record.score, 72.0);
        assert_eq!(record.verdict, Verdict::NeedsReview);
    }

    #[test]
    fn test_normalize_anonymous_fenced_block() {
        let raw = format!("```\n{}\n```", full_response("40", "Reject"));
        let record = EvaluationNormalizer::normalize(&raw).unwrap();
        assert_eq!(record.verdict, Verdict::Reject);
    }

    #[test]
    fn test_normalize_json_fence_preferred_over_plain_fence() {
        let raw = format!(
            "```\nnot the payload\n```\n```json\n{}\n```",
            full_response("55", "Needs Review")
        );
        let record = EvaluationNormalizer::normalize(&raw).unwrap();
        assert_eq!(record.score, 55.0);
    }

    #[test]
    fn test_normalize_missing_pros_is_structural_failure() {
        let raw = r#"{
            "score": 90,
            "verdict": "Shortlist",
            "category_breakdown": {"skills": 90, "experience": 70, "education": 60, "communication": 80},
            "matched_skills": [],
            "missing_skills": [],
            "cons": [],
            "feedback": "ok"
        }"#;
        match EvaluationNormalizer::normalize(raw) {
            Err(NormalizeError::MissingField("pros")) => {}
            other => panic!("expected missing-field failure, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_unparseable_payload() {
        assert!(matches!(
            EvaluationNormalizer::normalize("I could not evaluate this resume."),
            Err(NormalizeError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_normalize_clamps_score_and_defaults_verdict() {
        let record = EvaluationNormalizer::normalize(&full_response("150", "Maybe")).unwrap();
        assert_eq!(record.score, 100.0);
        assert_eq!(record.verdict, Verdict::NeedsReview);

        let record = EvaluationNormalizer::normalize(&full_response("-20", "Reject")).unwrap();
        assert_eq!(record.score, 0.0);
    }

    #[test]
    fn test_normalize_remaps_breakdown_and_defaults_missing_subkey() {
        let raw = r#"{
            "score": 75,
            "verdict": "Needs Review",
            "category_breakdown": {"skills": 90, "experience": 70, "education": 60},
            "matched_skills": [],
            "missing_skills": [],
            "pros": [],
            "cons": [],
            "feedback": "ok"
        }"#;
        let record = EvaluationNormalizer::normalize(raw).unwrap();
        assert_eq!(record.category_breakdown.technical_skills, 90.0);
        assert_eq!(record.category_breakdown.experience, 70.0);
        assert_eq!(record.category_breakdown.education, 60.0);
        assert_eq!(record.category_breakdown.communication, 0.0);
    }

    #[test]
    fn test_normalize_clamps_breakdown_values() {
        let raw = r#"{
            "score": 75,
            "verdict": "Needs Review",
            "category_breakdown": {"skills": 120, "experience": -5, "education": 60, "communication": 80},
            "matched_skills": [],
            "missing_skills": [],
            "pros": [],
            "cons": [],
            "feedback": "ok"
        }"#;
        let record = EvaluationNormalizer::normalize(raw).unwrap();
        assert_eq!(record.category_breakdown.technical_skills, 100.0);
        assert_eq!(record.category_breakdown.experience, 0.0);
    }

    #[test]
    fn test_normalize_keeps_duplicate_list_items() {
        let raw = r#"{
            "score": 75,
            "verdict": "Needs Review",
            "category_breakdown": {"skills": 90, "experience": 70, "education": 60, "communication": 80},
            "matched_skills": ["Rust", "Rust"],
            "missing_skills": [],
            "pros": [],
            "cons": [],
            "feedback": "ok"
        }"#;
        let record = EvaluationNormalizer::normalize(raw).unwrap();
        assert_eq!(record.matched_skills, vec!["Rust", "Rust"]);
    }

    #[test]
    fn test_normalize_non_object_payload() {
        assert!(matches!(
            EvaluationNormalizer::normalize("[1, 2, 3]"),
            Err(NormalizeError::InvalidJson(_))
        ));
    }
}
