//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CHURN_DETECT` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use churn_detect::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod ai;
mod api;
mod error;
mod model;
mod prediction;
mod server;

pub use ai::AiConfig;
pub use api::ApiConfig;
pub use error::{ConfigError, ValidationError};
pub use model::ModelConfig;
pub use prediction::PredictionConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Built once at process start and handed to the components that need it.
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// API name and description
    #[serde(default)]
    pub api: ApiConfig,

    /// LLM provider configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Model artifact paths
    #[serde(default)]
    pub model: ModelConfig,

    /// Batch limits
    #[serde(default)]
    pub prediction: PredictionConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CHURN_DETECT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CHURN_DETECT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CHURN_DETECT__AI__OPENAI_API_KEY=...` -> `ai.openai_api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("CHURN_DETECT")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section, then checks that
    /// LLM calls and batches give up before the server's request timeout does.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.model.validate()?;
        self.prediction.validate()?;

        for (setting, inner) in [
            ("ai.timeout_secs", self.ai.timeout()),
            ("prediction.batch_timeout_secs", self.prediction.batch_timeout()),
        ] {
            if !self.server.leaves_room_for(inner) {
                return Err(ValidationError::ExceedsRequestTimeout {
                    setting,
                    secs: inner.as_secs(),
                    request_secs: self.server.request_timeout_secs,
                });
            }
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("CHURN_DETECT__AI__OPENAI_API_KEY", "sk-test");
    }

    fn clear_env() {
        for key in [
            "CHURN_DETECT__AI__OPENAI_API_KEY",
            "CHURN_DETECT__AI__TEMPERATURE",
            "CHURN_DETECT__SERVER__PORT",
            "CHURN_DETECT__SERVER__ENVIRONMENT",
            "CHURN_DETECT__API__NAME",
            "CHURN_DETECT__PREDICTION__MAX_BATCH_SIZE",
            "CHURN_DETECT__SERVER__REQUEST_TIMEOUT_SECS",
            "CHURN_DETECT__AI__TIMEOUT_SECS",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(
            config.ai.openai_api_key.as_ref().map(|k| k.expose_secret().as_str()),
            Some("sk-test")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_apply() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.api.name, "Churn-Detection-Model");
        assert_eq!(config.ai.model, "gpt-4o-mini");
        assert_eq!(config.prediction.max_batch_size, 50);
    }

    #[test]
    fn test_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CHURN_DETECT__SERVER__PORT", "3000");
        env::set_var("CHURN_DETECT__SERVER__ENVIRONMENT", "production");
        env::set_var("CHURN_DETECT__API__NAME", "Churn-Staging");
        env::set_var("CHURN_DETECT__PREDICTION__MAX_BATCH_SIZE", "10");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.is_production());
        assert_eq!(config.api.name, "Churn-Staging");
        assert_eq!(config.prediction.max_batch_size, 10);
    }

    #[test]
    fn test_missing_key_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("OPENAI_API_KEY"))
        );
    }

    #[test]
    fn test_out_of_range_temperature_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CHURN_DETECT__AI__TEMPERATURE", "3.0");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(
            result.unwrap().validate(),
            Err(ValidationError::InvalidTemperature(_))
        ));
    }

    #[test]
    fn test_ai_timeout_must_be_below_request_timeout() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CHURN_DETECT__SERVER__REQUEST_TIMEOUT_SECS", "30");
        env::set_var("CHURN_DETECT__AI__TIMEOUT_SECS", "30");
        let result = AppConfig::load();
        clear_env();

        assert_eq!(
            result.unwrap().validate(),
            Err(ValidationError::ExceedsRequestTimeout {
                setting: "ai.timeout_secs",
                secs: 30,
                request_secs: 30,
            })
        );
    }

    #[test]
    fn test_batch_timeout_must_be_below_request_timeout() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CHURN_DETECT__SERVER__REQUEST_TIMEOUT_SECS", "60");
        let result = AppConfig::load();
        clear_env();

        assert_eq!(
            result.unwrap().validate(),
            Err(ValidationError::ExceedsRequestTimeout {
                setting: "prediction.batch_timeout_secs",
                secs: 100,
                request_secs: 60,
            })
        );
    }
}
