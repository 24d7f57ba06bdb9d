// src/web/handlers/evaluation_handlers.rs
//! Evaluation handlers.
//!
//! The evaluate handler owns pipeline 2: load the stored resume and job,
//! render the prompt, make the single evaluator call, normalize the
//! response, and persist the canonical record. A structural normalization
//! failure abandons the attempt and tells the caller it can be retried;
//! it is never retried here.

use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

use crate::database::{
    Database, Evaluation, EvaluationRepository, JobRepository, ResumeRepository,
};
use crate::evaluation::{prompts, EvaluationNormalizer, EvaluatorClient};
use crate::web::types::{CountData, DataResponse, EvaluateRequest, StandardErrorResponse};

use super::resume_handlers::{database_error, page};

pub async fn evaluate_resume_handler(
    request: Json<EvaluateRequest>,
    db: &State<Database>,
    evaluator: &State<EvaluatorClient>,
) -> Result<Json<DataResponse<Evaluation>>, Json<StandardErrorResponse>> {
    let resume = match ResumeRepository::new(db.pool()).get(&request.resume_id).await {
        Ok(Some(resume)) => resume,
        Ok(None) => {
            return Err(Json(StandardErrorResponse::new(
                format!("Resume not found: {}", request.resume_id),
                "RESUME_NOT_FOUND".to_string(),
                vec!["Upload the resume first".to_string()],
            )));
        }
        Err(e) => {
            error!("Failed to fetch resume for evaluation: {}", e);
            return Err(Json(database_error()));
        }
    };

    let job = match JobRepository::new(db.pool()).get(&request.jd_id).await {
        Ok(Some(job)) => job,
        Ok(None) => {
            return Err(Json(StandardErrorResponse::new(
                format!("Job description not found: {}", request.jd_id),
                "JOB_NOT_FOUND".to_string(),
                vec!["Create the job description first".to_string()],
            )));
        }
        Err(e) => {
            error!("Failed to fetch job description for evaluation: {}", e);
            return Err(Json(database_error()));
        }
    };

    let prompt = prompts::build_evaluation_prompt(
        &resume.candidate_name,
        &resume.skills,
        &resume.education,
        &resume.experience,
        &resume.raw_text,
        &job.jd_text,
    );

    let raw_response = match evaluator.generate(&prompt).await {
        Ok(response) => response,
        Err(e) => {
            error!("Evaluator call failed: {}", e);
            return Err(Json(StandardErrorResponse::new(
                "Evaluation service is unavailable".to_string(),
                "EVALUATOR_ERROR".to_string(),
                vec![
                    "Try again in a few moments".to_string(),
                    "Check the evaluator configuration".to_string(),
                ],
            )));
        }
    };

    let record = match EvaluationNormalizer::normalize(&raw_response) {
        Ok(record) => record,
        Err(e) => {
            error!("Evaluator response rejected: {}", e);
            return Err(Json(StandardErrorResponse::new(
                "Evaluator response did not match the expected format".to_string(),
                "EVALUATION_PARSE_ERROR".to_string(),
                vec!["Retry the evaluation".to_string()],
            )));
        }
    };

    match EvaluationRepository::new(db.pool())
        .create(&request.resume_id, &request.jd_id, &record)
        .await
    {
        Ok(evaluation) => {
            info!(
                "Evaluated resume {} against job {}: score {} ({})",
                request.resume_id,
                request.jd_id,
                evaluation.score,
                evaluation.verdict.as_str()
            );
            Ok(Json(DataResponse::success(
                "Resume evaluated".to_string(),
                evaluation,
            )))
        }
        Err(e) => {
            error!("Failed to store evaluation: {}", e);
            Err(Json(database_error()))
        }
    }
}

pub async fn get_evaluation_handler(
    evaluation_id: &str,
    db: &State<Database>,
) -> Result<Json<DataResponse<Evaluation>>, Json<StandardErrorResponse>> {
    match EvaluationRepository::new(db.pool()).get(evaluation_id).await {
        Ok(Some(evaluation)) => Ok(Json(DataResponse::success(
            "Evaluation found".to_string(),
            evaluation,
        ))),
        Ok(None) => Err(Json(StandardErrorResponse::new(
            format!("Evaluation not found: {}", evaluation_id),
            "EVALUATION_NOT_FOUND".to_string(),
            vec!["Check the evaluation id".to_string()],
        ))),
        Err(e) => {
            error!("Failed to fetch evaluation: {}", e);
            Err(Json(database_error()))
        }
    }
}

pub async fn list_evaluations_handler(
    skip: Option<i64>,
    limit: Option<i64>,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<Evaluation>>>, Json<StandardErrorResponse>> {
    let (skip, limit) = page(skip, limit);
    match EvaluationRepository::new(db.pool()).list(skip, limit).await {
        Ok(evaluations) => Ok(Json(DataResponse::success(
            format!("Found {} evaluations", evaluations.len()),
            evaluations,
        ))),
        Err(e) => {
            error!("Failed to list evaluations: {}", e);
            Err(Json(database_error()))
        }
    }
}

pub async fn evaluations_by_jd_handler(
    jd_id: &str,
    skip: Option<i64>,
    limit: Option<i64>,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<Evaluation>>>, Json<StandardErrorResponse>> {
    let (skip, limit) = page(skip, limit);
    match EvaluationRepository::new(db.pool())
        .list_by_jd(jd_id, skip, limit)
        .await
    {
        Ok(evaluations) => Ok(Json(DataResponse::success(
            format!("Found {} evaluations for job {}", evaluations.len(), jd_id),
            evaluations,
        ))),
        Err(e) => {
            error!("Failed to list evaluations for job: {}", e);
            Err(Json(database_error()))
        }
    }
}

pub async fn evaluations_by_resume_handler(
    resume_id: &str,
    skip: Option<i64>,
    limit: Option<i64>,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<Evaluation>>>, Json<StandardErrorResponse>> {
    let (skip, limit) = page(skip, limit);
    match EvaluationRepository::new(db.pool())
        .list_by_resume(resume_id, skip, limit)
        .await
    {
        Ok(evaluations) => Ok(Json(DataResponse::success(
            format!(
                "Found {} evaluations for resume {}",
                evaluations.len(),
                resume_id
            ),
            evaluations,
        ))),
        Err(e) => {
            error!("Failed to list evaluations for resume: {}", e);
            Err(Json(database_error()))
        }
    }
}

pub async fn top_evaluations_handler(
    jd_id: &str,
    limit: Option<i64>,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<Evaluation>>>, Json<StandardErrorResponse>> {
    let limit = limit.unwrap_or(10).clamp(1, 100);
    match EvaluationRepository::new(db.pool()).top_by_jd(jd_id, limit).await {
        Ok(evaluations) => Ok(Json(DataResponse::success(
            format!("Top {} evaluations for job {}", evaluations.len(), jd_id),
            evaluations,
        ))),
        Err(e) => {
            error!("Failed to fetch top evaluations: {}", e);
            Err(Json(database_error()))
        }
    }
}

pub async fn evaluation_count_handler(
    db: &State<Database>,
) -> Result<Json<DataResponse<CountData>>, Json<StandardErrorResponse>> {
    match EvaluationRepository::new(db.pool()).count().await {
        Ok(count) => Ok(Json(DataResponse::success(
            "Evaluation count".to_string(),
            CountData { count },
        ))),
        Err(e) => {
            error!("Failed to count evaluations: {}", e);
            Err(Json(database_error()))
        }
    }
}
