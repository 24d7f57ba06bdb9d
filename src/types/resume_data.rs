// src/types/resume_data.rs
//! Structured resume data recovered from uploaded documents

use serde::{Deserialize, Serialize};

/// One education entry recovered from resume text.
///
/// `degree` is always present; entries that matched no degree keyword carry
/// the literal "Unknown". Every other field is optional since recovery is
/// best-effort.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: Option<String>,
    pub year: Option<String>,
    pub gpa: Option<String>,
}

impl EducationEntry {
    /// True when at least one field besides the degree is populated.
    pub fn has_details(&self) -> bool {
        self.institution.is_some() || self.year.is_some() || self.gpa.is_some()
    }
}

/// One work experience entry. Not recovered heuristically; accepted from
/// callers and carried through to storage and prompt rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

/// Classification of a hyperlink found in the document's annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Email,
    Linkedin,
    Github,
    Other,
}

impl LinkKind {
    /// Classify a URL by substring, in fixed priority order.
    pub fn classify(url: &str) -> Self {
        if url.starts_with("mailto:") {
            LinkKind::Email
        } else if url.contains("linkedin.com") {
            LinkKind::Linkedin
        } else if url.contains("github.com") {
            LinkKind::Github
        } else {
            LinkKind::Other
        }
    }
}

/// A hyperlink pulled from the PDF's link annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeLink {
    pub kind: LinkKind,
    pub url: String,
}

/// Everything the recovery pass can pull out of one document.
///
/// Partial recovery is normal; every field is independently optional or
/// empty and absence is never an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecoveredFields {
    pub candidate_name: Option<String>,
    pub email: Option<String>,
    pub links: Vec<ResumeLink>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_classification_priority() {
        assert_eq!(
            LinkKind::classify("mailto:jane@example.com"),
            LinkKind::Email
        );
        assert_eq!(
            LinkKind::classify("https://www.linkedin.com/in/jane"),
            LinkKind::Linkedin
        );
        assert_eq!(
            LinkKind::classify("https://github.com/jane"),
            LinkKind::Github
        );
        assert_eq!(LinkKind::classify("https://janedoe.dev"), LinkKind::Other);
    }

    #[test]
    fn test_education_entry_details_guard() {
        let bare = EducationEntry {
            degree: "Bachelor of Science".to_string(),
            ..Default::default()
        };
        assert!(!bare.has_details());

        let with_year = EducationEntry {
            degree: "Bachelor of Science".to_string(),
            year: Some("2018".to_string()),
            ..Default::default()
        };
        assert!(with_year.has_details());
    }
}
