// src/extraction/recovery.rs
//! Heuristic recovery of structured fields from extracted resume text.
//!
//! Resumes have no layout grammar, so everything here is pattern-based and
//! precision-over-recall: a field that cannot be recovered is simply absent,
//! never an error. Callers always have an explicit-override path for name
//! and email, so false negatives are acceptable.

use lopdf::{Document, Object};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::types::{EducationEntry, LinkKind, RecoveredFields, ResumeLink};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap()
});

static EDUCATION_HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)education").unwrap());

static DEGREE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(Bachelor(?:\s+of\s+[A-Za-z]+)?|Master(?:\s+of\s+[A-Za-z]+)?|B\.?\s?Sc\.?|M\.?\s?Sc\.?|Ph\.?\s?D\.?|B\.?\s?Tech\.?|M\.?\s?Tech\.?|MBA|B\.?\s?A\.?|M\.?\s?A\.?|High\s+School|Secondary|Diploma|Associate)\b",
    )
    .unwrap()
});

static INSTITUTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(university|college|school|institute)\b").unwrap());

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap());

static GPA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bGPA\s*:\s*([0-9]+(?:\.[0-9]+)?)").unwrap());

static SKILLS_SECTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bskills\b\s*:?\s*\n?([\s\S]+?)(?:\n\s*\n|\z)").unwrap());

pub struct FieldRecoverer;

impl FieldRecoverer {
    /// Run every recovery pass over one document.
    pub fn recover(bytes: &[u8], text: &str) -> RecoveredFields {
        let (candidate_name, email) = Self::recover_identity(text);
        RecoveredFields {
            candidate_name,
            email,
            links: Self::recover_links(bytes),
            education: Self::recover_education(text),
            skills: Self::recover_skills(text),
        }
    }

    /// Recover the candidate's name and email from extracted text.
    ///
    /// Email is the first standard-pattern match anywhere in the text. The
    /// name heuristic scans only the first 10 lines for a short line of 2-4
    /// alphabetic tokens, since resumes conventionally open with the
    /// candidate's name.
    pub fn recover_identity(text: &str) -> (Option<String>, Option<String>) {
        let email = EMAIL_RE.find(text).map(|m| m.as_str().to_string());

        let mut candidate_name = None;
        for line in text.lines().take(10) {
            let line = line.trim();
            if line.is_empty() || line.chars().count() >= 100 {
                continue;
            }
            let words: Vec<&str> = line.split_whitespace().collect();
            if !(2..=4).contains(&words.len()) {
                continue;
            }
            let all_alphabetic = words.iter().all(|word| {
                let stripped: String = word.chars().filter(|c| *c != '-' && *c != '.').collect();
                !stripped.is_empty() && stripped.chars().all(char::is_alphabetic)
            });
            if all_alphabetic {
                candidate_name = Some(line.to_string());
                break;
            }
        }

        (candidate_name, email)
    }

    /// Walk every page's link annotations and classify the target URLs.
    ///
    /// Page order, then annotation order. Repeated URLs yield repeated
    /// entries; no deduplication is applied.
    pub fn recover_links(bytes: &[u8]) -> Vec<ResumeLink> {
        let doc = match Document::load_mem(bytes) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("link recovery skipped, document unreadable: {}", e);
                return Vec::new();
            }
        };

        let mut links = Vec::new();

        for (_page_number, page_id) in doc.get_pages() {
            let page = match doc.get_object(page_id).and_then(Object::as_dict) {
                Ok(dict) => dict,
                Err(_) => continue,
            };
            let annots = match page.get(b"Annots") {
                Ok(annots) => resolve(&doc, annots),
                Err(_) => continue,
            };
            let annots = match annots.as_array() {
                Ok(annots) => annots,
                Err(_) => continue,
            };

            for annot in annots {
                let annot = match resolve(&doc, annot).as_dict() {
                    Ok(dict) => dict,
                    Err(_) => continue,
                };
                let action = match annot.get(b"A") {
                    Ok(action) => resolve(&doc, action),
                    Err(_) => continue,
                };
                let action = match action.as_dict() {
                    Ok(dict) => dict,
                    Err(_) => continue,
                };
                if let Ok(uri) = action.get(b"URI") {
                    if let Object::String(bytes, _) = resolve(&doc, uri) {
                        let url = String::from_utf8_lossy(bytes).to_string();
                        links.push(ResumeLink {
                            kind: LinkKind::classify(&url),
                            url,
                        });
                    }
                }
            }
        }

        links
    }

    /// Recover education entries from the text after the first "education"
    /// token.
    ///
    /// Line-scan state machine: a degree-keyword line starts a new entry
    /// (flushing the previous one when it accrued any detail), institution
    /// keyword lines set the institution, and year/GPA patterns overwrite
    /// those fields on the current entry. Text before the heading is never
    /// considered, and resumes using a synonym heading yield zero entries.
    /// Bare degree mentions with no other detail are dropped as noise.
    pub fn recover_education(text: &str) -> Vec<EducationEntry> {
        let section = match EDUCATION_HEADING_RE.find(text) {
            Some(heading) => &text[heading.end()..],
            None => return Vec::new(),
        };

        let mut entries = Vec::new();
        let mut current = EducationEntry::default();

        for line in section.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let mut degree_line = false;
            if let Some(m) = DEGREE_RE.find(line) {
                if current.has_details() {
                    entries.push(std::mem::take(&mut current));
                } else {
                    current = EducationEntry::default();
                }
                current.degree = m.as_str().to_string();
                let rest = line[m.end()..]
                    .trim_start_matches(|c: char| c.is_whitespace() || c.is_ascii_punctuation());
                if !rest.is_empty() {
                    current.institution = Some(rest.to_string());
                }
                degree_line = true;
            }

            if !degree_line && INSTITUTION_RE.is_match(line) {
                current.institution = Some(line.to_string());
            }
            if let Some(year) = YEAR_RE.find(line) {
                current.year = Some(year.as_str().to_string());
            }
            if let Some(gpa) = GPA_RE.captures(line) {
                current.gpa = Some(gpa[1].to_string());
            }
        }

        if current.has_details() {
            entries.push(current);
        }

        // Invariant: degree is never empty in the output
        for entry in &mut entries {
            if entry.degree.trim().is_empty() {
                entry.degree = "Unknown".to_string();
            }
        }

        entries
    }

    /// Best-effort skills list from a "Skills" section.
    ///
    /// Takes the block up to the next blank line and splits on commas,
    /// bullets, semicolons, and newlines. No section means no skills.
    pub fn recover_skills(text: &str) -> Vec<String> {
        let block = match SKILLS_SECTION_RE.captures(text) {
            Some(captures) => captures[1].to_string(),
            None => return Vec::new(),
        };

        block
            .split(|c: char| matches!(c, ',' | ';' | '\n' | '•' | '|'))
            .map(|item| {
                item.trim()
                    .trim_start_matches(|c: char| c == '-' || c == '*')
                    .trim()
            })
            .filter(|item| !item.is_empty() && item.chars().count() <= 60)
            .map(str::to_string)
            .collect()
    }
}

/// Follow one level of indirection; annotation arrays and their members are
/// commonly stored as references.
fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        _ => object,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recover_identity_name_and_email() {
        let text = "Jane A. Doe\nSenior Engineer\njane.doe@example.com";
        let (name, email) = FieldRecoverer::recover_identity(text);
        assert_eq!(name.as_deref(), Some("Jane A. Doe"));
        assert_eq!(email.as_deref(), Some("jane.doe@example.com"));
    }

    #[test]
    fn test_recover_identity_rejects_stylized_header() {
        let text = "Curriculum Vitae — 2024 Edition!!\ncontact: jane@example.com";
        let (name, email) = FieldRecoverer::recover_identity(text);
        assert_eq!(name, None);
        assert_eq!(email.as_deref(), Some("jane@example.com"));
    }

    #[test]
    fn test_recover_identity_skips_long_and_single_token_lines() {
        let filler = "x".repeat(120);
        let text = format!("{}\nMadonna\nJohn Smith\n", filler);
        let (name, _) = FieldRecoverer::recover_identity(&text);
        assert_eq!(name.as_deref(), Some("John Smith"));
    }

    #[test]
    fn test_recover_identity_only_scans_first_ten_lines() {
        let mut text = String::new();
        for i in 0..10 {
            text.push_str(&format!("line {} {} {}!\n", i, i, i));
        }
        text.push_str("Jane Doe\n");
        let (name, _) = FieldRecoverer::recover_identity(&text);
        assert_eq!(name, None);
    }

    #[test]
    fn test_recover_education_two_entries() {
        let text = "Education\nBachelor of Science, MIT (2018) GPA: 3.9\nMaster of Science, Stanford (2020)";
        let entries = FieldRecoverer::recover_education(text);
        assert_eq!(entries.len(), 2);

        assert!(entries[0].degree.contains("Bachelor"));
        assert!(entries[0].institution.as_deref().unwrap().contains("MIT"));
        assert_eq!(entries[0].year.as_deref(), Some("2018"));
        assert_eq!(entries[0].gpa.as_deref(), Some("3.9"));

        assert!(entries[1].degree.contains("Master"));
        assert!(entries[1]
            .institution
            .as_deref()
            .unwrap()
            .contains("Stanford"));
        assert_eq!(entries[1].year.as_deref(), Some("2020"));
        assert_eq!(entries[1].gpa, None);
    }

    #[test]
    fn test_recover_education_without_heading_is_empty() {
        let text = "Bachelor of Science, MIT (2018)\nWork history since 2010";
        assert!(FieldRecoverer::recover_education(text).is_empty());
    }

    #[test]
    fn test_recover_education_institution_line_sets_current_entry() {
        let text = "Education\nBachelor of Engineering\nIndian Institute of Technology\n2015";
        let entries = FieldRecoverer::recover_education(text);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].degree.contains("Bachelor"));
        assert_eq!(
            entries[0].institution.as_deref(),
            Some("Indian Institute of Technology")
        );
        assert_eq!(entries[0].year.as_deref(), Some("2015"));
    }

    #[test]
    fn test_recover_education_drops_bare_degree_mention() {
        let text = "Education\nBachelor studies mentioned in passing";
        let entries = FieldRecoverer::recover_education(text);
        // The trailing line text becomes the institution, so the guard keeps it
        assert_eq!(entries.len(), 1);

        let text = "Education\nBachelor";
        assert!(FieldRecoverer::recover_education(text).is_empty());
    }

    #[test]
    fn test_recover_education_detail_lines_before_degree_default_unknown() {
        let text = "Education\nStanford University\n1998";
        let entries = FieldRecoverer::recover_education(text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].degree, "Unknown");
        assert_eq!(entries[0].institution.as_deref(), Some("Stanford University"));
        assert_eq!(entries[0].year.as_deref(), Some("1998"));
    }

    #[test]
    fn test_recover_education_year_outside_range_ignored() {
        let text = "Education\nDiploma, trade school, 1843";
        let entries = FieldRecoverer::recover_education(text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].year, None);
    }

    #[test]
    fn test_recover_skills_section() {
        let text = "Summary\nEngineer.\n\nSkills\nRust, Python; SQL\n- Kubernetes\n\nExperience\nAcme";
        let skills = FieldRecoverer::recover_skills(text);
        assert_eq!(skills, vec!["Rust", "Python", "SQL", "Kubernetes"]);
    }

    #[test]
    fn test_recover_skills_absent_section() {
        assert!(FieldRecoverer::recover_skills("no such heading here").is_empty());
    }

    #[test]
    fn test_recover_links_unreadable_document_is_empty() {
        assert!(FieldRecoverer::recover_links(b"not a pdf").is_empty());
    }

    #[test]
    fn test_recover_links_idempotent() {
        let bytes = b"%PDF-1.4 not really parseable";
        let first = FieldRecoverer::recover_links(bytes);
        let second = FieldRecoverer::recover_links(bytes);
        assert_eq!(first, second);
    }
}
