use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarborError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Permission denied: {role} may not {permission}")]
    PermissionDenied { role: String, permission: String },

    #[error("Date error: {0}")]
    DateError(String),
}

impl HarborError {
    /// Arithmetic on `field` left the range a `Decimal` can hold.
    pub(crate) fn overflow(field: &str) -> Self {
        HarborError::InvalidInput {
            field: field.into(),
            reason: "Value exceeds the supported decimal range".into(),
        }
    }
}
