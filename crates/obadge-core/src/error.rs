//! Error types shared across the Open Badge stack.
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations. Crates further up the DAG define their own error
//! enums and convert from these where needed.

use thiserror::Error;

/// Top-level error type for foundational operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A timestamp or identifier failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in signing input. Numeric fields in
    /// credential documents must be integers or strings; floats have
    /// non-deterministic serialization edge cases across implementations.
    #[error("float values are not permitted in signing input; use string or integer: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_rejected_display_includes_value() {
        let err = CanonicalizationError::FloatRejected(2.5);
        assert!(format!("{err}").contains("2.5"));
    }

    #[test]
    fn core_error_wraps_canonicalization() {
        let err = CoreError::from(CanonicalizationError::FloatRejected(0.1));
        assert!(format!("{err}").starts_with("canonicalization error"));
    }
}
