//! Validation error types

/// Validation error for request input
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidationError {
    /// Required field is blank
    #[error("{field} must not be blank")]
    Empty { field: &'static str },

    /// Body or query string could not be parsed into the expected shape
    #[error("malformed request: {reason}")]
    Malformed { reason: String },
}
