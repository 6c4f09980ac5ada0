use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImmoCalcError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown scenario template: {0}")]
    UnknownTemplate(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ImmoCalcError {
    fn from(e: serde_json::Error) -> Self {
        ImmoCalcError::SerializationError(e.to_string())
    }
}
