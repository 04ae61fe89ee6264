//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Covers deterministic failures only (malformed tokens, out-of-range
/// coordinates). Store and network failures have their own error types in the
/// crates that talk to those collaborators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A token did not match any known variant (role, blood group, screen kind).
    #[error("unknown {kind}: '{value}'")]
    UnknownToken { kind: &'static str, value: String },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn unknown_token(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownToken {
            kind,
            value: value.into(),
        }
    }
}
