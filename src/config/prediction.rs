//! Prediction orchestration limits

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Batch behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionConfig {
    /// Extractions allowed in flight at once for a batch request
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,

    /// Largest accepted batch
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,

    /// Wall-clock budget for extracting one batch
    #[serde(default = "default_batch_timeout")]
    pub batch_timeout_secs: u64,
}

impl PredictionConfig {
    pub fn batch_timeout(&self) -> Duration {
        Duration::from_secs(self.batch_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.batch_concurrency == 0 {
            return Err(ValidationError::InvalidBatchConcurrency);
        }
        if self.max_batch_size == 0 {
            return Err(ValidationError::InvalidMaxBatchSize);
        }
        if self.batch_timeout_secs == 0 {
            return Err(ValidationError::InvalidBatchTimeout);
        }
        Ok(())
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            batch_concurrency: default_batch_concurrency(),
            max_batch_size: default_max_batch_size(),
            batch_timeout_secs: default_batch_timeout(),
        }
    }
}

fn default_batch_concurrency() -> usize {
    4
}

fn default_max_batch_size() -> usize {
    50
}

fn default_batch_timeout() -> u64 {
    100
}
