// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use types::*;

use crate::config::ConfigManager;
use crate::database::Database;
use crate::evaluation::EvaluatorClient;
use anyhow::{Context, Result};
use rocket::form::Form;
use rocket::serde::json::Json;
use rocket::{catchers, delete, get, post, routes, State};
use tracing::info;

use crate::database::{Evaluation, JobDescription, Resume};

// ===== Job description routes =====

#[post("/jobs", data = "<request>")]
pub async fn create_job(
    request: Json<CreateJobRequest>,
    db: &State<Database>,
) -> Result<Json<DataResponse<JobDescription>>, Json<StandardErrorResponse>> {
    handlers::create_job_handler(request, db).await
}

#[get("/jobs/<jd_id>")]
pub async fn get_job(
    jd_id: &str,
    db: &State<Database>,
) -> Result<Json<DataResponse<JobDescription>>, Json<StandardErrorResponse>> {
    handlers::get_job_handler(jd_id, db).await
}

#[get("/jobs?<skip>&<limit>")]
pub async fn list_jobs(
    skip: Option<i64>,
    limit: Option<i64>,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<JobDescription>>>, Json<StandardErrorResponse>> {
    handlers::list_jobs_handler(skip, limit, db).await
}

#[delete("/jobs/<jd_id>")]
pub async fn delete_job(
    jd_id: &str,
    db: &State<Database>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    handlers::delete_job_handler(jd_id, db).await
}

#[get("/jobs/stats/count")]
pub async fn job_count(
    db: &State<Database>,
) -> Result<Json<DataResponse<CountData>>, Json<StandardErrorResponse>> {
    handlers::job_count_handler(db).await
}

// ===== Resume routes =====

#[post("/resumes/upload", data = "<upload>")]
pub async fn upload_resume(
    upload: Form<ResumeUploadForm<'_>>,
    db: &State<Database>,
) -> Result<Json<DataResponse<Resume>>, Json<StandardErrorResponse>> {
    handlers::upload_resume_handler(upload, db).await
}

#[get("/resumes/<resume_id>")]
pub async fn get_resume(
    resume_id: &str,
    db: &State<Database>,
) -> Result<Json<DataResponse<Resume>>, Json<StandardErrorResponse>> {
    handlers::get_resume_handler(resume_id, db).await
}

#[get("/resumes?<skip>&<limit>")]
pub async fn list_resumes(
    skip: Option<i64>,
    limit: Option<i64>,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<Resume>>>, Json<StandardErrorResponse>> {
    handlers::list_resumes_handler(skip, limit, db).await
}

#[get("/resumes/by-jd/<jd_id>?<skip>&<limit>")]
pub async fn resumes_by_jd(
    jd_id: &str,
    skip: Option<i64>,
    limit: Option<i64>,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<Resume>>>, Json<StandardErrorResponse>> {
    handlers::resumes_by_jd_handler(jd_id, skip, limit, db).await
}

#[get("/resumes/search/name?<name>&<skip>&<limit>")]
pub async fn search_resumes(
    name: &str,
    skip: Option<i64>,
    limit: Option<i64>,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<Resume>>>, Json<StandardErrorResponse>> {
    handlers::search_resumes_handler(name, skip, limit, db).await
}

#[delete("/resumes/<resume_id>")]
pub async fn delete_resume(
    resume_id: &str,
    db: &State<Database>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    handlers::delete_resume_handler(resume_id, db).await
}

#[get("/resumes/stats/count")]
pub async fn resume_count(
    db: &State<Database>,
) -> Result<Json<DataResponse<CountData>>, Json<StandardErrorResponse>> {
    handlers::resume_count_handler(db).await
}

// ===== Evaluation routes =====

#[post("/evaluations/evaluate", data = "<request>")]
pub async fn evaluate_resume(
    request: Json<EvaluateRequest>,
    db: &State<Database>,
    evaluator: &State<EvaluatorClient>,
) -> Result<Json<DataResponse<Evaluation>>, Json<StandardErrorResponse>> {
    handlers::evaluate_resume_handler(request, db, evaluator).await
}

#[get("/evaluations/<evaluation_id>")]
pub async fn get_evaluation(
    evaluation_id: &str,
    db: &State<Database>,
) -> Result<Json<DataResponse<Evaluation>>, Json<StandardErrorResponse>> {
    handlers::get_evaluation_handler(evaluation_id, db).await
}

#[get("/evaluations?<skip>&<limit>")]
pub async fn list_evaluations(
    skip: Option<i64>,
    limit: Option<i64>,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<Evaluation>>>, Json<StandardErrorResponse>> {
    handlers::list_evaluations_handler(skip, limit, db).await
}

#[get("/evaluations/by-jd/<jd_id>?<skip>&<limit>")]
pub async fn evaluations_by_jd(
    jd_id: &str,
    skip: Option<i64>,
    limit: Option<i64>,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<Evaluation>>>, Json<StandardErrorResponse>> {
    handlers::evaluations_by_jd_handler(jd_id, skip, limit, db).await
}

#[get("/evaluations/by-resume/<resume_id>?<skip>&<limit>")]
pub async fn evaluations_by_resume(
    resume_id: &str,
    skip: Option<i64>,
    limit: Option<i64>,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<Evaluation>>>, Json<StandardErrorResponse>> {
    handlers::evaluations_by_resume_handler(resume_id, skip, limit, db).await
}

#[get("/evaluations/top/<jd_id>?<limit>")]
pub async fn top_evaluations(
    jd_id: &str,
    limit: Option<i64>,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<Evaluation>>>, Json<StandardErrorResponse>> {
    handlers::top_evaluations_handler(jd_id, limit, db).await
}

#[get("/evaluations/stats/count")]
pub async fn evaluation_count(
    db: &State<Database>,
) -> Result<Json<DataResponse<CountData>>, Json<StandardErrorResponse>> {
    handlers::evaluation_count_handler(db).await
}

// ===== System routes =====

#[get("/health")]
pub async fn health(
    db: &State<Database>,
) -> Result<Json<TextResponse>, Json<StandardErrorResponse>> {
    handlers::health_handler(db).await
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Resource not found".to_string(),
        "NOT_FOUND".to_string(),
        vec!["Check the request path".to_string()],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
    ))
}

// Main server start function
pub async fn start_web_server(config: ConfigManager) -> Result<()> {
    let database = Database::new(&config.environment.database_path).await?;
    let evaluator = EvaluatorClient::new(&config.evaluator)?;

    info!("Starting talentsift API server");
    info!(
        "Database: {}",
        config.environment.database_path.display()
    );
    info!("Evaluator model: {}", config.evaluator.model);

    rocket::build()
        .manage(database)
        .manage(evaluator)
        .register("/api", catchers![bad_request, not_found, internal_error])
        .mount(
            "/api",
            routes![
                create_job,
                get_job,
                list_jobs,
                delete_job,
                job_count,
                upload_resume,
                get_resume,
                list_resumes,
                resumes_by_jd,
                search_resumes,
                delete_resume,
                resume_count,
                evaluate_resume,
                get_evaluation,
                list_evaluations,
                evaluations_by_jd,
                evaluations_by_resume,
                top_evaluations,
                evaluation_count,
                health,
            ],
        )
        .launch()
        .await
        .context("Rocket server failed")?;

    Ok(())
}
