// src/web/handlers/system_handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::error;

use crate::database::Database;
use crate::web::types::{StandardErrorResponse, TextResponse};

pub async fn health_handler(
    db: &State<Database>,
) -> Result<Json<TextResponse>, Json<StandardErrorResponse>> {
    match db.health_check().await {
        Ok(()) => Ok(Json(TextResponse::success("OK".to_string()))),
        Err(e) => {
            error!("Health check failed: {}", e);
            Err(Json(StandardErrorResponse::new(
                "Service unhealthy".to_string(),
                "UNHEALTHY".to_string(),
                vec!["Check database availability".to_string()],
            )))
        }
    }
}
