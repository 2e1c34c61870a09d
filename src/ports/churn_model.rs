//! Churn Model Port - Interfaces for the two-stage inference pipeline.
//!
//! A [`FeatureTransformer`] encodes a [`FeatureVector`] into a dense numeric row,
//! and a [`ChurnClassifier`] scores that row. Both are loaded once at startup,
//! never mutated, and shared across concurrent requests.

use thiserror::Error;

use crate::domain::features::FeatureVector;

/// Deterministic preprocessing stage (encoding, scaling).
pub trait FeatureTransformer: Send + Sync {
    /// Encodes the feature vector into the classifier's input row.
    fn transform(&self, features: &FeatureVector) -> Result<Vec<f64>, InferenceError>;

    /// Width of the rows produced by [`FeatureTransformer::transform`].
    fn output_width(&self) -> usize;
}

/// Trained binary classifier.
pub trait ChurnClassifier: Send + Sync {
    /// Predicted class index (0 = stays, 1 = exits).
    fn predict(&self, encoded: &[f64]) -> Result<usize, InferenceError>;

    /// Class probabilities `[p0, p1]`.
    fn predict_proba(&self, encoded: &[f64]) -> Result<[f64; 2], InferenceError>;

    /// Number of input features the classifier was fitted on.
    fn n_features(&self) -> usize;
}

/// Failures inside the inference pipeline on an otherwise valid vector.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("column '{column}' missing from feature vector")]
    MissingColumn { column: String },

    #[error("column '{column}' has unexpected value: {reason}")]
    UnexpectedValue { column: String, reason: String },

    #[error("unknown category '{value}' for column '{column}'")]
    UnknownCategory { column: String, value: String },

    #[error("classifier returned unknown class {0}")]
    UnknownClass(usize),

    #[error("invalid model artifact: {0}")]
    InvalidArtifact(String),
}

impl InferenceError {
    pub fn shape_mismatch(expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch { expected, actual }
    }

    pub fn unexpected_value(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnexpectedValue {
            column: column.into(),
            reason: reason.into(),
        }
    }
}
