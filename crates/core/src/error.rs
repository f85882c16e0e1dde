//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Only programmer errors and configuration failures live here. Expected
/// outcomes such as "not enough items to remove" are reported through return
/// values, not through this type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A caller passed an argument outside the accepted domain
    /// (negative quantity, unknown order method, non-positive cap).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Two collaborators disagree about shared state (e.g. a UI binding
    /// refers to a stack the inventory no longer holds).
    #[error("consistency violation: {0}")]
    ConsistencyViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested record was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Configuration could not be loaded or failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DomainError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn consistency(msg: impl Into<String>) -> Self {
        Self::ConsistencyViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
