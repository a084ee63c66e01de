use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single offending field and the constraint it violated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    /// Dotted path into the submitted document, e.g. `dietaryHabits.targetCalories`
    pub field: String,
    pub message: String,
}

/// Every field-level problem found in one payload.
///
/// Validation never stops at the first problem, so callers always see the
/// complete list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    pub errors: Vec<FieldError>,
}

impl ValidationFailure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Failure with exactly one field error
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut failure = Self::new();
        failure.push(field, message);
        failure
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether any error was recorded against `field`
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Domain error taxonomy shared by the store, the generator and the API
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(ValidationFailure),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid ID format: {0}")]
    MalformedIdentity(String),

    #[error("Duplicate resource: {0}")]
    Duplicate(String),

    #[error("{0} not configured")]
    ConfigurationMissing(String),

    #[error("Upstream failure: {0}")]
    Upstream(String),
}

impl From<ValidationFailure> for DomainError {
    fn from(failure: ValidationFailure) -> Self {
        DomainError::Validation(failure)
    }
}
