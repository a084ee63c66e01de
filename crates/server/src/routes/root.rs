//! Welcome page and the catch-all 404

use axum::{Json, extract::OriginalUri, http::StatusCode, response::IntoResponse};
use serde_json::json;

const ENDPOINTS: [(&str, &str); 6] = [
    ("health", "GET /health"),
    ("metrics", "GET /metrics"),
    ("patients", "/api/patients"),
    ("dietPlans", "/api/diet-plans"),
    ("intake", "/api/intake/sessions"),
    ("dietPlanHealth", "GET /api/diet-plans/health"),
];

fn endpoint_map() -> serde_json::Map<String, serde_json::Value> {
    ENDPOINTS
        .iter()
        .map(|(name, route)| (name.to_string(), json!(route)))
        .collect()
}

/// GET /
pub async fn welcome() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "Welcome to the Ayurvedic Diet Management API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": endpoint_map(),
    }))
}

/// Fallback for unknown routes
pub async fn not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": "Endpoint not found",
            "requestedUrl": uri.to_string(),
            "availableEndpoints": endpoint_map(),
        })),
    )
}
