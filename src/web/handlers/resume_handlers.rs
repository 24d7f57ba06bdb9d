// src/web/handlers/resume_handlers.rs
//! Resume upload and retrieval handlers.
//!
//! The upload handler owns pipeline 1: persist the upload to a uuid-named
//! temp file, gate on PDF validation, extract text with fallback, recover
//! structured fields, apply the caller-override precedence for identity,
//! and hand the finished record to storage. The temp file is removed on
//! every exit path.

use rocket::form::Form;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::database::{Database, JobRepository, NewResume, Resume, ResumeRepository};
use crate::extraction::{FieldRecoverer, TextExtractor};
use crate::utils;
use crate::web::types::{
    ActionResponse, CountData, DataResponse, ResumeUploadForm, StandardErrorResponse,
};

pub async fn upload_resume_handler(
    mut upload: Form<ResumeUploadForm<'_>>,
    db: &State<Database>,
) -> Result<Json<DataResponse<Resume>>, Json<StandardErrorResponse>> {
    // Rocket's sanitized name drops the extension, so take the raw client
    // name; it goes through sanitize_filename before storage.
    let original_filename = upload
        .file
        .raw_name()
        .map(|name| name.dangerous_unsafe_unsanitized_raw().as_str().to_string())
        .unwrap_or_else(|| "uploaded_resume.pdf".to_string());

    if !utils::has_pdf_extension(&original_filename) {
        return Err(Json(StandardErrorResponse::new(
            "Only PDF files are allowed".to_string(),
            "INVALID_FORMAT".to_string(),
            vec!["Upload a PDF file (.pdf)".to_string()],
        )));
    }

    const MAX_SIZE: u64 = 10 * 1024 * 1024;
    if upload.file.len() > MAX_SIZE {
        return Err(Json(StandardErrorResponse::new(
            "File size exceeds 10MB limit".to_string(),
            "FILE_TOO_LARGE".to_string(),
            vec!["Use a smaller file size (max 10MB)".to_string()],
        )));
    }

    let jd_id = upload.jd_id.clone();
    match JobRepository::new(db.pool()).get(&jd_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err(Json(StandardErrorResponse::new(
                format!("Job description not found: {}", jd_id),
                "JOB_NOT_FOUND".to_string(),
                vec!["Create the job description first".to_string()],
            )));
        }
        Err(e) => {
            error!("Failed to look up job description: {}", e);
            return Err(Json(database_error()));
        }
    }

    let temp_path = std::env::temp_dir().join(format!("resume_upload_{}", Uuid::new_v4()));

    if let Err(e) = upload.file.persist_to(&temp_path).await {
        error!("Failed to save uploaded file: {}", e);
        return Err(Json(StandardErrorResponse::new(
            "Failed to process uploaded file".to_string(),
            "FILE_SAVE_ERROR".to_string(),
            vec!["Try uploading the file again".to_string()],
        )));
    }

    // Read the document back and drop the temp file immediately; everything
    // past this point works on the in-memory bytes, so the file is gone on
    // every exit path.
    let bytes = tokio::fs::read(&temp_path).await;
    let _ = tokio::fs::remove_file(&temp_path).await;

    let bytes = match bytes {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Failed to read uploaded file: {}", e);
            return Err(Json(StandardErrorResponse::new(
                "Failed to process uploaded file".to_string(),
                "FILE_READ_ERROR".to_string(),
                vec!["Try uploading the file again".to_string()],
            )));
        }
    };

    if !TextExtractor::validate(&bytes) {
        return Err(Json(StandardErrorResponse::new(
            "Invalid PDF file".to_string(),
            "INVALID_PDF".to_string(),
            vec!["Check the file is not corrupted".to_string()],
        )));
    }

    let raw_text = match TextExtractor::extract(&bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!("Resume text extraction failed: {}", e);
            return Err(Json(StandardErrorResponse::new(
                "Could not extract text from PDF".to_string(),
                "EXTRACTION_FAILED".to_string(),
                vec![
                    "Ensure the resume has selectable text".to_string(),
                    "Scanned image-only documents are not supported".to_string(),
                ],
            )));
        }
    };

    let recovered = FieldRecoverer::recover(&bytes, &raw_text);

    // Caller-supplied identity always overrides recovered values; recovered
    // values are only a fallback.
    let candidate_name = upload
        .candidate_name
        .clone()
        .filter(|name| !name.trim().is_empty())
        .or_else(|| recovered.candidate_name.clone())
        .unwrap_or_else(|| "Unknown Candidate".to_string());

    let email = upload
        .email
        .clone()
        .filter(|email| !email.trim().is_empty())
        .or_else(|| recovered.email.clone())
        .unwrap_or_else(|| "unknown@example.com".to_string());

    let fallback = utils::fallback_filename(&candidate_name);
    let filename = utils::sanitize_filename(&original_filename, &fallback);

    let new_resume = NewResume {
        candidate_name,
        email,
        filename,
        raw_text,
        skills: recovered.skills,
        education: recovered.education,
        experience: Vec::new(),
        links: recovered.links,
        jd_id,
    };

    match ResumeRepository::new(db.pool()).create(new_resume).await {
        Ok(resume) => {
            info!(
                "Resume uploaded and processed for candidate: {}",
                resume.candidate_name
            );
            Ok(Json(DataResponse::success(
                "Resume uploaded and processed".to_string(),
                resume,
            )))
        }
        Err(e) => {
            error!("Failed to store resume: {}", e);
            Err(Json(database_error()))
        }
    }
}

pub async fn get_resume_handler(
    resume_id: &str,
    db: &State<Database>,
) -> Result<Json<DataResponse<Resume>>, Json<StandardErrorResponse>> {
    match ResumeRepository::new(db.pool()).get(resume_id).await {
        Ok(Some(resume)) => Ok(Json(DataResponse::success(
            "Resume found".to_string(),
            resume,
        ))),
        Ok(None) => Err(Json(not_found(resume_id))),
        Err(e) => {
            error!("Failed to fetch resume: {}", e);
            Err(Json(database_error()))
        }
    }
}

pub async fn list_resumes_handler(
    skip: Option<i64>,
    limit: Option<i64>,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<Resume>>>, Json<StandardErrorResponse>> {
    let (skip, limit) = page(skip, limit);
    match ResumeRepository::new(db.pool()).list(skip, limit).await {
        Ok(resumes) => Ok(Json(DataResponse::success(
            format!("Found {} resumes", resumes.len()),
            resumes,
        ))),
        Err(e) => {
            error!("Failed to list resumes: {}", e);
            Err(Json(database_error()))
        }
    }
}

pub async fn resumes_by_jd_handler(
    jd_id: &str,
    skip: Option<i64>,
    limit: Option<i64>,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<Resume>>>, Json<StandardErrorResponse>> {
    let (skip, limit) = page(skip, limit);
    match ResumeRepository::new(db.pool())
        .list_by_jd(jd_id, skip, limit)
        .await
    {
        Ok(resumes) => Ok(Json(DataResponse::success(
            format!("Found {} resumes for job {}", resumes.len(), jd_id),
            resumes,
        ))),
        Err(e) => {
            error!("Failed to list resumes for job: {}", e);
            Err(Json(database_error()))
        }
    }
}

pub async fn search_resumes_handler(
    name: &str,
    skip: Option<i64>,
    limit: Option<i64>,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<Resume>>>, Json<StandardErrorResponse>> {
    let (skip, limit) = page(skip, limit);
    match ResumeRepository::new(db.pool())
        .search_by_name(name, skip, limit)
        .await
    {
        Ok(resumes) => Ok(Json(DataResponse::success(
            format!("Found {} matching resumes", resumes.len()),
            resumes,
        ))),
        Err(e) => {
            error!("Failed to search resumes: {}", e);
            Err(Json(database_error()))
        }
    }
}

pub async fn delete_resume_handler(
    resume_id: &str,
    db: &State<Database>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    match ResumeRepository::new(db.pool()).delete(resume_id).await {
        Ok(true) => Ok(Json(ActionResponse::success(
            "Resume deleted successfully".to_string(),
            "deleted".to_string(),
        ))),
        Ok(false) => Err(Json(not_found(resume_id))),
        Err(e) => {
            error!("Failed to delete resume: {}", e);
            Err(Json(database_error()))
        }
    }
}

pub async fn resume_count_handler(
    db: &State<Database>,
) -> Result<Json<DataResponse<CountData>>, Json<StandardErrorResponse>> {
    match ResumeRepository::new(db.pool()).count().await {
        Ok(count) => Ok(Json(DataResponse::success(
            "Resume count".to_string(),
            CountData { count },
        ))),
        Err(e) => {
            error!("Failed to count resumes: {}", e);
            Err(Json(database_error()))
        }
    }
}

pub(crate) fn page(skip: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let skip = skip.unwrap_or(0).max(0);
    let limit = limit.unwrap_or(100).clamp(1, 1000);
    (skip, limit)
}

pub(crate) fn database_error() -> StandardErrorResponse {
    StandardErrorResponse::new(
        "Database operation failed".to_string(),
        "DATABASE_ERROR".to_string(),
        vec!["Try again in a few moments".to_string()],
    )
}

fn not_found(resume_id: &str) -> StandardErrorResponse {
    StandardErrorResponse::new(
        format!("Resume not found: {}", resume_id),
        "RESUME_NOT_FOUND".to_string(),
        vec!["Check the resume id".to_string()],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults_and_bounds() {
        assert_eq!(page(None, None), (0, 100));
        assert_eq!(page(Some(-5), Some(0)), (0, 1));
        assert_eq!(page(Some(20), Some(5000)), (20, 1000));
    }
}
