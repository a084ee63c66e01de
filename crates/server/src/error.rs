//! Application error handling

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ayur_core::{DomainError, Envelope, ValidationFailure};
use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(ValidationFailure),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    /// `message` is shown to clients, `detail` only outside production
    #[error("{message}: {detail}")]
    Internal { message: String, detail: String },
}

impl AppError {
    pub fn internal(message: impl Into<String>, detail: impl Into<String>) -> Self {
        AppError::Internal {
            message: message.into(),
            detail: detail.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, envelope): (StatusCode, Envelope) = match self {
            AppError::Validation(failure) => (
                StatusCode::BAD_REQUEST,
                Envelope::failure("Validation error").with_errors(failure.errors),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, Envelope::failure(msg)),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, Envelope::failure(msg)),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, Envelope::failure(msg)),
            AppError::Internal { message, detail } => {
                tracing::error!(error = %detail, "{}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Envelope::failure(message).with_error(detail),
                )
            }
        };

        (status, Json(envelope)).into_response()
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(failure) => AppError::Validation(failure),
            DomainError::NotFound(msg) => AppError::NotFound(msg),
            DomainError::MalformedIdentity(_) => {
                AppError::BadRequest("Invalid patient ID format".to_string())
            }
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            err @ DomainError::ConfigurationMissing(_) => {
                AppError::internal("Service not configured", err.to_string())
            }
            err @ DomainError::Upstream(_) => {
                AppError::internal("Upstream service failed", err.to_string())
            }
        }
    }
}

impl From<ValidationFailure> for AppError {
    fn from(failure: ValidationFailure) -> Self {
        AppError::Validation(failure)
    }
}

impl From<deadpool_postgres::PoolError> for AppError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        AppError::internal("Internal server error", format!("Database pool error: {}", err))
    }
}

impl From<tokio_postgres::Error> for AppError {
    fn from(err: tokio_postgres::Error) -> Self {
        AppError::internal("Internal server error", format!("Database error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::internal("Internal server error", format!("Corrupt patient document: {}", err))
    }
}
