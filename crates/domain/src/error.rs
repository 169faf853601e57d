//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The HTTP method is neither GET nor POST.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A payload value cannot be represented as a JSON number.
    #[error("invalid payload value for '{key}': {value}")]
    InvalidPayloadValue {
        /// Payload key.
        key: String,
        /// Rejected value, rendered for display.
        value: String,
    },

    /// A test case has an empty name.
    #[error("test case name must not be empty")]
    EmptyCaseName,
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
