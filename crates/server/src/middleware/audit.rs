//! Audit trail for patient-data mutations

use axum::{body::Body, extract::Request, http::Method, middleware::Next, response::Response};
use std::time::Instant;

use super::request_id::RequestId;

/// Log every POST, PUT and DELETE under the `audit` target once it completes
pub async fn audit_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    if !matches!(method, Method::POST | Method::PUT | Method::DELETE) {
        return next.run(request).await;
    }

    let path = request.uri().path().to_string();
    let partial = request
        .headers()
        .get("x-partial-update")
        .is_some_and(|v| v.as_bytes().eq_ignore_ascii_case(b"true"));
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let started = Instant::now();
    let response = next.run(request).await;

    tracing::info!(
        target: "audit",
        request_id = %request_id,
        method = %method,
        path = %path,
        partial,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Mutation request"
    );

    response
}
