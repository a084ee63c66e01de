pub mod diet_plans;
pub mod health;
pub mod intake;
pub mod patients;
pub mod root;

use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    routing::{get, post},
};
use ayur_core::PatientId;
use serde_json::Value as JsonValue;

use crate::error::AppError;
use crate::state::AppState;

/// Build the `/api` routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/patients", get(patients::list).post(patients::create))
        .route(
            "/patients/{id}",
            get(patients::read)
                .put(patients::update)
                .delete(patients::delete),
        )
        .route("/patients/{id}/summary", get(patients::summary))
        .route("/diet-plans/generate/{patient_id}", post(diet_plans::generate))
        .route("/diet-plans/generate-direct", post(diet_plans::generate_direct))
        .route("/diet-plans/export", post(diet_plans::export))
        .route("/diet-plans/health", get(diet_plans::health))
        .route("/diet-plans/test/{patient_id}", get(diet_plans::diagnose))
        .route("/intake/sessions", post(intake::start))
        .route("/intake/sessions/{id}/answers", post(intake::answer))
}

/// Unwrap a JSON body, mapping syntax and content-type errors to 400
pub(crate) fn json_body(body: Result<Json<JsonValue>, JsonRejection>) -> Result<JsonValue, AppError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected request body");
            Err(AppError::BadRequest("Invalid JSON format".to_string()))
        }
    }
}

/// Parse a path id, 400 on malformed input
pub(crate) fn patient_id(raw: &str) -> Result<PatientId, AppError> {
    Ok(PatientId::parse(raw)?)
}

pub(crate) fn patient_not_found() -> AppError {
    AppError::NotFound("Patient not found".to_string())
}
