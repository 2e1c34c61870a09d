//! Application-level error taxonomy for prediction requests.

use thiserror::Error;

use crate::domain::customer::ValidationError;
use crate::domain::extraction::ExtractionError;
use crate::ports::{AIError, InferenceError};

/// Everything a prediction request can fail with.
///
/// `Validation`, `Extraction` and `InvalidRequest` are caller mistakes and carry
/// enough detail to fix the input. `Upstream` and `Inference` are operational.
#[derive(Debug, Clone, Error)]
pub enum PredictionError {
    #[error("invalid customer record: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("language model call failed: {0}")]
    Upstream(#[from] AIError),

    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl PredictionError {
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest(reason.into())
    }

    /// True for failures caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PredictionError::Validation(_)
                | PredictionError::Extraction(_)
                | PredictionError::InvalidRequest(_)
        )
    }
}
