//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// state-machine rules, lookups). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation at the boundary (e.g. unrecognized reason
    /// code, blank name, rating out of range).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A state-machine rule was violated: the source state does not permit
    /// the requested action or target state.
    #[error("invalid transition: {requested} not permitted from {from}")]
    InvalidTransition { from: String, requested: String },

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// An operation targeted a medicine/order id not present in the snapshot.
    #[error("not found")]
    NotFound,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_transition(
        from: impl core::fmt::Display,
        requested: impl core::fmt::Display,
    ) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            requested: requested.to_string(),
        }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
