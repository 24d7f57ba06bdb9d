// src/web/handlers/job_handlers.rs
//! Job description CRUD handlers.

use rocket::serde::json::Json;
use rocket::State;
use tracing::error;

use crate::database::{Database, JobDescription, JobRepository};
use crate::web::types::{
    ActionResponse, CountData, CreateJobRequest, DataResponse, StandardErrorResponse,
};

use super::resume_handlers::{database_error, page};

pub async fn create_job_handler(
    request: Json<CreateJobRequest>,
    db: &State<Database>,
) -> Result<Json<DataResponse<JobDescription>>, Json<StandardErrorResponse>> {
    if request.title.trim().is_empty() || request.jd_text.trim().is_empty() {
        return Err(Json(StandardErrorResponse::new(
            "Job title and description text are required".to_string(),
            "INVALID_REQUEST".to_string(),
            vec!["Provide both title and jd_text".to_string()],
        )));
    }

    match JobRepository::new(db.pool())
        .create(
            request.title.trim(),
            request.company.as_deref(),
            &request.jd_text,
        )
        .await
    {
        Ok(job) => Ok(Json(DataResponse::success(
            "Job description created".to_string(),
            job,
        ))),
        Err(e) => {
            error!("Failed to create job description: {}", e);
            Err(Json(database_error()))
        }
    }
}

pub async fn get_job_handler(
    jd_id: &str,
    db: &State<Database>,
) -> Result<Json<DataResponse<JobDescription>>, Json<StandardErrorResponse>> {
    match JobRepository::new(db.pool()).get(jd_id).await {
        Ok(Some(job)) => Ok(Json(DataResponse::success(
            "Job description found".to_string(),
            job,
        ))),
        Ok(None) => Err(Json(not_found(jd_id))),
        Err(e) => {
            error!("Failed to fetch job description: {}", e);
            Err(Json(database_error()))
        }
    }
}

pub async fn list_jobs_handler(
    skip: Option<i64>,
    limit: Option<i64>,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<JobDescription>>>, Json<StandardErrorResponse>> {
    let (skip, limit) = page(skip, limit);
    match JobRepository::new(db.pool()).list(skip, limit).await {
        Ok(jobs) => Ok(Json(DataResponse::success(
            format!("Found {} job descriptions", jobs.len()),
            jobs,
        ))),
        Err(e) => {
            error!("Failed to list job descriptions: {}", e);
            Err(Json(database_error()))
        }
    }
}

pub async fn delete_job_handler(
    jd_id: &str,
    db: &State<Database>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    match JobRepository::new(db.pool()).delete(jd_id).await {
        Ok(true) => Ok(Json(ActionResponse::success(
            "Job description deleted successfully".to_string(),
            "deleted".to_string(),
        ))),
        Ok(false) => Err(Json(not_found(jd_id))),
        Err(e) => {
            error!("Failed to delete job description: {}", e);
            Err(Json(database_error()))
        }
    }
}

pub async fn job_count_handler(
    db: &State<Database>,
) -> Result<Json<DataResponse<CountData>>, Json<StandardErrorResponse>> {
    match JobRepository::new(db.pool()).count().await {
        Ok(count) => Ok(Json(DataResponse::success(
            "Job description count".to_string(),
            CountData { count },
        ))),
        Err(e) => {
            error!("Failed to count job descriptions: {}", e);
            Err(Json(database_error()))
        }
    }
}

fn not_found(jd_id: &str) -> StandardErrorResponse {
    StandardErrorResponse::new(
        format!("Job description not found: {}", jd_id),
        "JOB_NOT_FOUND".to_string(),
        vec!["Check the job description id".to_string()],
    )
}
