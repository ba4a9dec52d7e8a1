use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViabilityError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Missing assumption: '{name}' is required and has no default")]
    MissingAssumption { name: String },

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ViabilityError {
    fn from(e: serde_json::Error) -> Self {
        ViabilityError::SerializationError(e.to_string())
    }
}
