//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures of the data itself (malformed
/// fields, missing keys). Storage failures belong to the infra layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (malformed field, missing id, bad serialized data).
    #[error("data validation failed: {0}")]
    DataValidation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn data_validation(msg: impl Into<String>) -> Self {
        Self::DataValidation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Message carried by the error, without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::DataValidation(msg) | Self::InvalidId(msg) => msg,
        }
    }
}
