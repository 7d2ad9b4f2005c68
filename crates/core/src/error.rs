//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures (validation,
/// missing rows, authorization). Infrastructure failures are carried as
/// `Dependency` with a descriptive message and never swallowed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input failed validation (bad weekday name, non-positive quantity,
    /// invalid status value).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A requested row (level, counter, order, notification) does not exist.
    #[error("not found")]
    NotFound,

    /// The acting identity lacks the capability for this operation.
    #[error("unauthorized")]
    Unauthorized,

    /// The persistence store or mail transport failed.
    #[error("dependency failure: {0}")]
    Dependency(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn dependency(msg: impl Into<String>) -> Self {
        Self::Dependency(msg.into())
    }
}
