//! Extraction error types.

use thiserror::Error;

use crate::domain::customer::ValidationError;

/// Reasons a language-model response could not be turned into a customer record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    #[error("JSON format not found in the output")]
    NoJsonFound,

    #[error("Failed to parse the structured data: {reason}")]
    MalformedJson { reason: String },

    #[error("Extracted fields are invalid: {0}")]
    InvalidFields(#[from] ValidationError),
}

impl ExtractionError {
    /// Creates a malformed JSON error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedJson {
            reason: reason.into(),
        }
    }

    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionError::NoJsonFound => "no_json_found",
            ExtractionError::MalformedJson { .. } => "malformed_json",
            ExtractionError::InvalidFields(_) => "invalid_fields",
        }
    }
}
