//! Strip internal error detail from 500 responses

use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
};
use serde_json::Value as JsonValue;

const MAX_BODY: usize = 1024 * 1024;

/// Installed only in production
pub async fn redact_middleware(request: Request<Body>, next: Next) -> Response {
    let response = next.run(request).await;
    if response.status() != StatusCode::INTERNAL_SERVER_ERROR {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_BODY).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "Failed to buffer error response");
            return Response::from_parts(parts, Body::empty());
        }
    };

    let redacted = match serde_json::from_slice::<JsonValue>(&bytes) {
        Ok(JsonValue::Object(mut map)) if map.contains_key("error") => {
            map.remove("error");
            parts.headers.remove(header::CONTENT_LENGTH);
            serde_json::to_vec(&map).map(Body::from).unwrap_or_else(|_| Body::from(bytes))
        }
        _ => Body::from(bytes),
    };
    Response::from_parts(parts, redacted)
}
