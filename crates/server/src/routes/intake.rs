//! Server-side chat intake: one question at a time, then a diet plan

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use ayur_core::intake::{IntakeError, IntakeSession, IntakeStep, QUESTIONS};
use ayur_core::{Envelope, PatientContext, PatientSource};
use serde_json::{Value as JsonValue, json};
use uuid::Uuid;

use super::json_body;
use crate::error::AppError;
use crate::state::AppState;

/// POST /api/intake/sessions
pub async fn start(State(state): State<AppState>) -> impl IntoResponse {
    let session = IntakeSession::new();
    let question = session.current_question();
    let id = state.intake.start(session).await;
    let data = json!({
        "sessionId": id,
        "step": 0,
        "totalQuestions": QUESTIONS.len(),
        "question": question,
        "complete": false,
    });

    tracing::info!(session_id = %id, "Started intake session");
    (StatusCode::CREATED, Json(Envelope::ok(data)))
}

/// POST /api/intake/sessions/{id}/answers
///
/// Body `{answer}`. Returns the next question, or the generated plan once the
/// last question has been answered.
pub async fn answer(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = Uuid::try_parse(&raw_id)
        .map_err(|_| AppError::BadRequest("Invalid session ID format".to_string()))?;
    let body = json_body(body)?;
    let text = body.get("answer").and_then(JsonValue::as_str).unwrap_or_default();

    let (step, next) = state
        .intake
        .answer(&id, text)
        .await
        .ok_or_else(|| AppError::NotFound("Intake session not found".to_string()))?
        .map_err(|e| match e {
            IntakeError::EmptyAnswer => AppError::BadRequest(e.to_string()),
            IntakeError::AlreadyComplete => AppError::Conflict(e.to_string()),
        })?;

    let source = match next {
        IntakeStep::Next(question) => {
            return Ok(Json(Envelope::ok(json!({
                "sessionId": id,
                "step": step,
                "totalQuestions": QUESTIONS.len(),
                "question": question,
                "complete": false,
            }))));
        }
        IntakeStep::Complete(source) => source,
    };

    tracing::info!(session_id = %id, "Intake complete, generating diet plan");
    let ctx = PatientContext::from(&source);
    let outcome = state.generator.generate(&ctx, 0).await;
    let Some(plan) = outcome.data.filter(|_| outcome.success) else {
        return Err(AppError::internal(
            "Failed to generate diet plan",
            outcome.error.unwrap_or_else(|| "Unknown generation error".to_string()),
        ));
    };

    let answers = match &source {
        PatientSource::Collected(answers) => json!(answers),
        PatientSource::Stored(_) => JsonValue::Null,
    };
    Ok(Json(
        Envelope::ok(json!({
            "sessionId": id,
            "step": step,
            "totalQuestions": QUESTIONS.len(),
            "complete": true,
            "answers": answers,
            "plan": plan,
        }))
        .with_message("Diet plan generated successfully")
        .with_meta(json!({ "tokensUsed": outcome.tokens_used.unwrap_or(0) })),
    ))
}
