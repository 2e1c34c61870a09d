//! Model artifact locations

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Paths of the persisted preprocessing and classifier artifacts
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_preprocessor_path")]
    pub preprocessor_path: PathBuf,

    #[serde(default = "default_classifier_path")]
    pub classifier_path: PathBuf,
}

impl ModelConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.preprocessor_path.as_os_str().is_empty() {
            return Err(ValidationError::EmptyArtifactPath("preprocessor"));
        }
        if self.classifier_path.as_os_str().is_empty() {
            return Err(ValidationError::EmptyArtifactPath("classifier"));
        }
        Ok(())
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            preprocessor_path: default_preprocessor_path(),
            classifier_path: default_classifier_path(),
        }
    }
}

fn default_preprocessor_path() -> PathBuf {
    PathBuf::from("assets/preprocessor.json")
}

fn default_classifier_path() -> PathBuf {
    PathBuf::from("assets/classifier.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_config_defaults() {
        let config = ModelConfig::default();
        assert_eq!(config.preprocessor_path, PathBuf::from("assets/preprocessor.json"));
        assert_eq!(config.classifier_path, PathBuf::from("assets/classifier.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_path_rejected() {
        let config = ModelConfig {
            classifier_path: PathBuf::new(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::EmptyArtifactPath("classifier"))
        );
    }
}
