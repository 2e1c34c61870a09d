//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address '{0}'")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid AI timeout")]
    InvalidAiTimeout,

    #[error("Temperature must be within [0, 2], got {0}")]
    InvalidTemperature(f32),

    #[error("max_tokens must be greater than zero")]
    InvalidMaxTokens,

    #[error("Model artifact path for {0} is empty")]
    EmptyArtifactPath(&'static str),

    #[error("batch_concurrency must be at least 1")]
    InvalidBatchConcurrency,

    #[error("max_batch_size must be at least 1")]
    InvalidMaxBatchSize,

    #[error("batch_timeout_secs must be at least 1")]
    InvalidBatchTimeout,

    #[error("{setting} ({secs}s) must be shorter than the request timeout ({request_secs}s)")]
    ExceedsRequestTimeout {
        setting: &'static str,
        secs: u64,
        request_secs: u64,
    },
}
