// src/utils.rs
use anyhow::{Context, Result};
use std::path::Path;

/// Sanitize a user-supplied filename for storage.
///
/// Strips path components, then restricts to alphanumerics, underscore,
/// dot, dash, and space. An empty or over-long result is replaced by the
/// caller's fallback name.
pub fn sanitize_filename(filename: &str, fallback: &str) -> String {
    let base = Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("");

    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | ' '))
        .collect();

    if cleaned.is_empty() || cleaned.len() > 100 {
        fallback.to_string()
    } else {
        cleaned
    }
}

/// Build the generated fallback filename for an upload whose own name was
/// unusable: candidate name with spaces as underscores plus a timestamp.
pub fn fallback_filename(candidate_name: &str) -> String {
    format!(
        "{}_{}.pdf",
        candidate_name.replace(' ', "_"),
        chrono::Utc::now().timestamp()
    )
}

/// Check whether a filename claims to be a PDF.
pub fn has_pdf_extension(filename: &str) -> bool {
    filename.to_lowercase().ends_with(".pdf")
}

/// Ensure directory exists
pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .with_context(|| format!("Failed to create directory: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_path_components() {
        assert_eq!(
            sanitize_filename("../../etc/passwd.pdf", "fallback.pdf"),
            "passwd.pdf"
        );
        assert_eq!(
            sanitize_filename("/tmp/upload/resume.pdf", "fallback.pdf"),
            "resume.pdf"
        );
    }

    #[test]
    fn test_sanitize_drops_disallowed_characters() {
        assert_eq!(
            sanitize_filename("my résumé (final).pdf", "fallback.pdf"),
            "my rsum final.pdf"
        );
    }

    #[test]
    fn test_sanitize_falls_back_when_empty_or_too_long() {
        assert_eq!(sanitize_filename("€€€", "fallback.pdf"), "fallback.pdf");
        let long_name = format!("{}.pdf", "a".repeat(120));
        assert_eq!(sanitize_filename(&long_name, "fallback.pdf"), "fallback.pdf");
    }

    #[test]
    fn test_fallback_filename_shape() {
        let name = fallback_filename("Jane Doe");
        assert!(name.starts_with("Jane_Doe_"));
        assert!(name.ends_with(".pdf"));
    }

    #[test]
    fn test_has_pdf_extension() {
        assert!(has_pdf_extension("resume.pdf"));
        assert!(has_pdf_extension("RESUME.PDF"));
        assert!(!has_pdf_extension("resume.docx"));
        assert!(!has_pdf_extension("resume"));
    }
}
