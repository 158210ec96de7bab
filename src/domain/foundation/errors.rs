//! Error types for the domain layer.

use thiserror::Error;

/// Errors raised by domain entities and aggregates.
///
/// The detection, extraction, and analytics pipelines are total functions and
/// never return these; they are limited to aggregate state violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Field '{field}' failed validation: {reason}")]
    ValidationFailed { field: String, reason: String },

    #[error("Persona is already assigned for this session")]
    PersonaAlreadyAssigned,

    #[error("Session is no longer active")]
    SessionCompleted,
}

impl DomainError {
    /// Creates a validation error.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        DomainError::ValidationFailed {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
