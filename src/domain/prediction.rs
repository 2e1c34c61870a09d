//! Prediction outcome types.

use serde::Serialize;
use std::fmt;

use crate::domain::customer::CustomerRecord;

/// Decimal places kept on reported probabilities.
pub const PROBABILITY_DECIMALS: i32 = 4;

/// Churn decision derived from the classifier's class index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChurnLabel {
    #[serde(rename = "Exit")]
    Exit,
    #[serde(rename = "Not Exit")]
    NotExit,
}

impl ChurnLabel {
    /// Maps class 1 to `Exit` and class 0 to `NotExit`.
    pub fn from_class(class: usize) -> Option<Self> {
        match class {
            0 => Some(ChurnLabel::NotExit),
            1 => Some(ChurnLabel::Exit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChurnLabel::Exit => "Exit",
            ChurnLabel::NotExit => "Not Exit",
        }
    }
}

impl fmt::Display for ChurnLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rounds a probability to [`PROBABILITY_DECIMALS`] places, clamped to [0, 1].
pub fn round_probability(p: f64) -> f64 {
    let factor = 10f64.powi(PROBABILITY_DECIMALS);
    ((p * factor).round() / factor).clamp(0.0, 1.0)
}

/// The record that was scored plus the decision and, optionally, the
/// probability of the `Exit` class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    #[serde(flatten)]
    record: CustomerRecord,
    #[serde(rename = "Prediction")]
    prediction: ChurnLabel,
    #[serde(rename = "Probability", skip_serializing_if = "Option::is_none")]
    probability: Option<f64>,
}

impl PredictionResult {
    /// Label-only result.
    pub fn new(record: CustomerRecord, prediction: ChurnLabel) -> Self {
        Self {
            record,
            prediction,
            probability: None,
        }
    }

    /// Result carrying the exit probability, rounded on construction.
    pub fn with_probability(record: CustomerRecord, prediction: ChurnLabel, probability: f64) -> Self {
        Self {
            record,
            prediction,
            probability: Some(round_probability(probability)),
        }
    }

    pub fn record(&self) -> &CustomerRecord {
        &self.record
    }

    pub fn prediction(&self) -> ChurnLabel {
        self.prediction
    }

    pub fn probability(&self) -> Option<f64> {
        self.probability
    }
}
