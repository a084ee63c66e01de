//! Liveness and Prometheus endpoints

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    success: bool,
    message: String,
    timestamp: String,
    environment: &'static str,
    store: &'static str,
}

/// GET /health - 503 when the patient store is unreachable
pub async fn check(State(state): State<AppState>) -> impl IntoResponse {
    let (status, success, message) = match state.repo.ping().await {
        Ok(()) => (
            StatusCode::OK,
            true,
            "Ayurvedic Diet Management API is running".to_string(),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                false,
                "Patient store is unreachable".to_string(),
            )
        }
    };

    (
        status,
        Json(HealthResponse {
            success,
            message,
            timestamp: Utc::now().to_rfc3339(),
            environment: state.environment.as_str(),
            store: state.repo.backend(),
        }),
    )
}

/// GET /metrics - Render collected metrics in Prometheus text format
pub async fn metrics(Extension(handle): Extension<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
