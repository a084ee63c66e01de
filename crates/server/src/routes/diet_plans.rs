//! Diet plan generation, export and diagnostics

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::header,
    response::IntoResponse,
};
use ayur_core::export::{plan_to_text, recipes_to_text};
use ayur_core::{DietPlan, Envelope, PatientContext, PatientId, PatientSource, repair};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

use super::{json_body, patient_id, patient_not_found};
use crate::ai::GenerationOutcome;
use crate::error::AppError;
use crate::state::AppState;

const FEATURES: [&str; 5] = [
    "Personalized Ayurvedic diet plans",
    "Dosha-based meal recommendations",
    "Rasa, Guna, Virya, Vipaka and Prabhava for every meal",
    "Herb and lifestyle recommendations",
    "Offline fallback plans",
];

/// `?regenerationCount=N` picks another fallback menu on a retry
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateParams {
    regeneration_count: Option<String>,
}

impl RegenerateParams {
    fn variation(&self) -> usize {
        self.regeneration_count
            .as_deref()
            .and_then(|n| n.trim().parse().ok())
            .unwrap_or(0)
    }
}

/// Split a successful outcome into its plan, or map a failed one to a 500
fn into_plan(outcome: GenerationOutcome) -> Result<(DietPlan, u64), AppError> {
    match (outcome.success, outcome.data) {
        (true, Some(plan)) => Ok((plan, outcome.tokens_used.unwrap_or(0))),
        _ => Err(AppError::internal(
            "Failed to generate diet plan",
            outcome.error.unwrap_or_else(|| "Unknown generation error".to_string()),
        )),
    }
}

/// POST /api/diet-plans/generate/{patient_id}
pub async fn generate(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(params): Query<RegenerateParams>,
) -> Result<impl IntoResponse, AppError> {
    let id = patient_id(&raw_id)?;
    let record = state.repo.find_active(&id).await?.ok_or_else(patient_not_found)?;

    let ctx = PatientContext::from(&PatientSource::from(record));
    tracing::info!(patient_id = %id, "Generating diet plan");
    let (plan, tokens) = into_plan(state.generator.generate(&ctx, params.variation()).await)?;

    let meta = json!({
        "patientId": id,
        "patientName": ctx.name,
        "tokensUsed": tokens,
        "generatedAt": Utc::now().to_rfc3339(),
        "source": plan.source,
    });
    Ok(Json(
        Envelope::ok(plan)
            .with_message("Diet plan generated successfully")
            .with_meta(meta),
    ))
}

/// POST /api/diet-plans/generate-direct
///
/// Generates from patient data in the request body. When the body names a
/// stored patient by `_id` the stored record is used instead.
pub async fn generate_direct(
    State(state): State<AppState>,
    Query(params): Query<RegenerateParams>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = json_body(body)?;
    let patient_data = body
        .get("patientData")
        .filter(|v| !v.is_null())
        .ok_or_else(|| AppError::BadRequest("Patient data is required".to_string()))?;

    let stored_id = patient_data
        .get("_id")
        .and_then(JsonValue::as_str)
        .and_then(|raw| PatientId::parse(raw).ok());
    // A store failure degrades to the request data
    let stored = match stored_id {
        Some(id) => state.repo.find_active(&id).await.unwrap_or_else(|e| {
            tracing::warn!(patient_id = %id, error = %e, "Patient lookup failed, using request data");
            None
        }),
        None => None,
    };

    let (source, data_source) = match stored {
        Some(record) => (PatientSource::from(record), "Store + Request"),
        None => (PatientSource::from_json(patient_data), "Request Only"),
    };
    let ctx = PatientContext::from(&source);

    tracing::info!(patient_id = ?ctx.id, data_source, "Generating diet plan from request data");
    let (plan, tokens) = into_plan(state.generator.generate(&ctx, params.variation()).await)?;

    let meta = json!({
        "patientId": ctx.id,
        "patientName": ctx.name,
        "tokensUsed": tokens,
        "generatedAt": Utc::now().to_rfc3339(),
        "dataSource": data_source,
        "source": plan.source,
    });
    Ok(Json(
        Envelope::ok(plan)
            .with_message("Diet plan generated successfully")
            .with_meta(meta),
    ))
}

/// POST /api/diet-plans/export
///
/// Body `{plan, kind}` where `kind` is `plan` (default) or `recipes`.
pub async fn export(body: Result<Json<JsonValue>, JsonRejection>) -> Result<impl IntoResponse, AppError> {
    let mut body = json_body(body)?;
    let raw_plan = body
        .get_mut("plan")
        .filter(|v| v.is_object())
        .map(JsonValue::take)
        .ok_or_else(|| AppError::BadRequest("Diet plan is required".to_string()))?;
    let kind = body.get("kind").and_then(JsonValue::as_str).unwrap_or("plan");

    let plan = DietPlan::from_repaired(repair(raw_plan))
        .map_err(|e| AppError::BadRequest(format!("Invalid diet plan: {}", e)))?;

    let today = Utc::now().date_naive();
    let (text, stem) = match kind {
        "plan" => (plan_to_text(&plan, today), "ayurvedic-diet-plan"),
        "recipes" => (recipes_to_text(&plan, today), "ayurvedic-recipes"),
        other => {
            return Err(AppError::BadRequest(format!("Unknown export kind: {}", other)));
        }
    };

    let disposition = format!("attachment; filename=\"{}-{}.txt\"", stem, today.format("%Y-%m-%d"));
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        text,
    ))
}

/// GET /api/diet-plans/health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "success": true,
        "status": {
            "configured": state.generator.is_configured(),
            "service": "OpenAI GPT-4o-mini",
            "model": state.generator.model(),
            "features": FEATURES,
        },
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// GET /api/diet-plans/test/{patient_id}
///
/// Runs a generation and reports what happened instead of failing.
pub async fn diagnose(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = patient_id(&raw_id)?;
    let record = state.repo.find_active(&id).await?.ok_or_else(patient_not_found)?;
    let ctx = PatientContext::from(&PatientSource::from(record));

    let outcome = state.generator.generate(&ctx, 0).await;
    tracing::info!(patient_id = %id, success = outcome.success, "Diagnostic generation");

    Ok(Json(json!({
        "success": true,
        "debug": {
            "patientId": id,
            "patientName": ctx.name,
            "apiKeyConfigured": state.generator.is_configured(),
            "generationSuccess": outcome.success,
            "error": outcome.error,
            "tokensUsed": outcome.tokens_used,
        },
        "result": outcome,
    })))
}
