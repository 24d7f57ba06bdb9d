// src/evaluation/prompts.rs
//! Rendering of the evaluation prompt handed to the external evaluator.

use crate::types::{EducationEntry, ExperienceEntry};

/// Only the head of the resume text is forwarded; longer text is truncated,
/// not summarized.
const RESUME_TEXT_LIMIT: usize = 2000;

/// Build the single opaque prompt string for one resume/job evaluation.
pub fn build_evaluation_prompt(
    candidate_name: &str,
    skills: &[String],
    education: &[EducationEntry],
    experience: &[ExperienceEntry],
    resume_text: &str,
    jd_text: &str,
) -> String {
    let skills_text = if skills.is_empty() {
        "Not specified".to_string()
    } else {
        skills.join(", ")
    };

    let resume_excerpt: String = resume_text.chars().take(RESUME_TEXT_LIMIT).collect();
    let resume_excerpt = if resume_excerpt.is_empty() {
        "No resume text available".to_string()
    } else {
        resume_excerpt
    };

    format!(
        r#"You are an expert HR recruiter and resume evaluator. Your task is to evaluate a candidate's resume against a specific job description and provide a comprehensive assessment.

CANDIDATE INFORMATION:
Name: {candidate_name}
Skills: {skills_text}

EDUCATION:
{education_text}

EXPERIENCE:
{experience_text}

RESUME RAW TEXT:
{resume_excerpt}

JOB DESCRIPTION:
{jd_text}

EVALUATION TASK:
Please evaluate this candidate's resume against the job description and provide a detailed assessment in the following JSON format:

{{
    "score": <0-100>,
    "verdict": "<Shortlist|Needs Review|Reject>",
    "category_breakdown": {{
        "skills": <0-100>,
        "experience": <0-100>,
        "education": <0-100>,
        "communication": <0-100>
    }},
    "matched_skills": ["skill1", "skill2", ...],
    "missing_skills": ["skill1", "skill2", ...],
    "pros": ["pro1", "pro2", ...],
    "cons": ["con1", "con2", ...],
    "feedback": "<detailed feedback summary>"
}}

EVALUATION CRITERIA:
- Score (0-100): Overall match percentage
- Verdict:
  * "Shortlist" (80-100): Strong match, recommend for interview
  * "Needs Review" (50-79): Moderate match, consider with reservations
  * "Reject" (0-49): Poor match, not recommended
- Category Breakdown: Individual scores for skills, experience, education, and communication
- Matched Skills: Skills from resume that align with job requirements
- Missing Skills: Important skills from the job description that are missing from the resume
- Pros: Strengths and positive aspects
- Cons: Weaknesses and areas of concern
- Feedback: Detailed summary of evaluation

IMPORTANT: Return ONLY valid JSON. Do not include any additional text or explanations outside the JSON structure.
"#,
        education_text = format_education(education),
        experience_text = format_experience(experience),
    )
}

fn format_education(education: &[EducationEntry]) -> String {
    if education.is_empty() {
        return "No education information provided".to_string();
    }

    education
        .iter()
        .map(|entry| {
            let mut line = format!(
                "- {} from {}",
                entry.degree,
                entry.institution.as_deref().unwrap_or("Unknown")
            );
            if let Some(year) = &entry.year {
                line.push_str(&format!(" ({})", year));
            }
            if let Some(gpa) = &entry.gpa {
                line.push_str(&format!(" - GPA: {}", gpa));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_experience(experience: &[ExperienceEntry]) -> String {
    if experience.is_empty() {
        return "No experience information provided".to_string();
    }

    experience
        .iter()
        .map(|entry| {
            let mut line = format!(
                "- {} at {} ({} - {})",
                entry.title,
                entry.company,
                entry.start_date.as_deref().unwrap_or("Unknown"),
                entry.end_date.as_deref().unwrap_or("Present"),
            );
            if let Some(description) = &entry.description {
                line.push_str(&format!("\n  {}", description));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_renders_placeholders_for_empty_sections() {
        let prompt = build_evaluation_prompt("Jane Doe", &[], &[], &[], "text", "jd");
        assert!(prompt.contains("Skills: Not specified"));
        assert!(prompt.contains("No education information provided"));
        assert!(prompt.contains("No experience information provided"));
    }

    #[test]
    fn test_prompt_truncates_resume_text() {
        let long_text = "a".repeat(5000);
        let prompt = build_evaluation_prompt("Jane Doe", &[], &[], &[], &long_text, "jd");
        assert!(prompt.contains(&"a".repeat(2000)));
        assert!(!prompt.contains(&"a".repeat(2001)));
    }

    #[test]
    fn test_prompt_formats_education_entries() {
        let education = vec![EducationEntry {
            degree: "Bachelor of Science".to_string(),
            institution: Some("MIT".to_string()),
            year: Some("2018".to_string()),
            gpa: Some("3.9".to_string()),
        }];
        let prompt = build_evaluation_prompt("Jane Doe", &[], &education, &[], "text", "jd");
        assert!(prompt.contains("- Bachelor of Science from MIT (2018) - GPA: 3.9"));
    }

    #[test]
    fn test_prompt_includes_skills_and_jd() {
        let skills = vec!["Rust".to_string(), "SQL".to_string()];
        let prompt =
            build_evaluation_prompt("Jane Doe", &skills, &[], &[], "text", "Backend engineer");
        assert!(prompt.contains("Skills: Rust, SQL"));
        assert!(prompt.contains("Backend engineer"));
    }
}
