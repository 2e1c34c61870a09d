//! Startup loading of the persisted inference pipeline.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use super::forest::{RandomForestClassifier, TreeArtifact};
use super::logistic::LogisticClassifier;
use super::preprocessor::{JsonPreprocessor, PreprocessorArtifact};
use crate::config::ModelConfig;
use crate::ports::{ChurnClassifier, FeatureTransformer, InferenceError};

/// Persisted classifier, tagged by model family.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    RandomForest {
        n_features: usize,
        trees: Vec<TreeArtifact>,
    },
    LogisticRegression {
        coefficients: Vec<f64>,
        intercept: f64,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
}

fn default_threshold() -> f64 {
    0.5
}

impl ClassifierArtifact {
    fn build(self) -> Result<Arc<dyn ChurnClassifier>, InferenceError> {
        Ok(match self {
            ClassifierArtifact::RandomForest { n_features, trees } => {
                Arc::new(RandomForestClassifier::from_trees(n_features, &trees)?)
            }
            ClassifierArtifact::LogisticRegression {
                coefficients,
                intercept,
                threshold,
            } => Arc::new(LogisticClassifier::new(coefficients, intercept, threshold)?),
        })
    }
}

/// Errors raised while loading model artifacts. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} is not a usable artifact: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: InferenceError,
    },

    #[error("preprocessor emits {transformer} features but classifier expects {classifier}")]
    WidthMismatch { transformer: usize, classifier: usize },
}

/// The read-only pipeline shared by every request.
#[derive(Clone)]
pub struct ModelArtifacts {
    pub transformer: Arc<dyn FeatureTransformer>,
    pub classifier: Arc<dyn ChurnClassifier>,
}

impl std::fmt::Debug for ModelArtifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelArtifacts")
            .field("transformer_width", &self.transformer.output_width())
            .field("classifier_features", &self.classifier.n_features())
            .finish()
    }
}

impl ModelArtifacts {
    /// Reads, decodes and validates both artifacts.
    pub fn load(config: &ModelConfig) -> Result<Self, ArtifactError> {
        let preprocessor: PreprocessorArtifact = read_json(&config.preprocessor_path)?;
        let classifier: ClassifierArtifact = read_json(&config.classifier_path)?;

        let transformer = JsonPreprocessor::from_artifact(preprocessor).map_err(|source| {
            ArtifactError::Invalid {
                path: config.preprocessor_path.clone(),
                source,
            }
        })?;
        let classifier = classifier.build().map_err(|source| ArtifactError::Invalid {
            path: config.classifier_path.clone(),
            source,
        })?;

        let artifacts = Self::new(Arc::new(transformer), classifier)?;
        tracing::info!(
            preprocessor = %config.preprocessor_path.display(),
            classifier = %config.classifier_path.display(),
            features = artifacts.classifier.n_features(),
            "model artifacts loaded"
        );
        Ok(artifacts)
    }

    /// Pairs a transformer with a classifier, checking that their widths agree.
    pub fn new(
        transformer: Arc<dyn FeatureTransformer>,
        classifier: Arc<dyn ChurnClassifier>,
    ) -> Result<Self, ArtifactError> {
        if transformer.output_width() != classifier.n_features() {
            return Err(ArtifactError::WidthMismatch {
                transformer: transformer.output_width(),
                classifier: classifier.n_features(),
            });
        }
        Ok(Self {
            transformer,
            classifier,
        })
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ArtifactError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PREPROCESSOR: &str = r#"{"transforms": [
        {"kind": "standard_scale", "column": "Age", "mean": 40.0, "scale": 10.0},
        {"kind": "passthrough", "column": "IsActiveMember"}
    ]}"#;

    fn file(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    fn config(pre: &NamedTempFile, cls: &NamedTempFile) -> ModelConfig {
        ModelConfig {
            preprocessor_path: pre.path().to_path_buf(),
            classifier_path: cls.path().to_path_buf(),
        }
    }

    #[test]
    fn loads_matching_artifacts() {
        let pre = file(PREPROCESSOR);
        let cls = file(r#"{"kind": "logistic_regression", "coefficients": [0.8, -1.2], "intercept": 0.1}"#);

        let artifacts = ModelArtifacts::load(&config(&pre, &cls)).unwrap();
        assert_eq!(artifacts.transformer.output_width(), 2);
        assert_eq!(artifacts.classifier.n_features(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let cls = file("{}");
        let config = ModelConfig {
            preprocessor_path: PathBuf::from("/nonexistent/preprocessor.json"),
            classifier_path: cls.path().to_path_buf(),
        };
        assert!(matches!(ModelArtifacts::load(&config), Err(ArtifactError::Io { .. })));
    }

    #[test]
    fn garbage_is_decode_error() {
        let pre = file(PREPROCESSOR);
        let cls = file("not json at all");
        assert!(matches!(
            ModelArtifacts::load(&config(&pre, &cls)),
            Err(ArtifactError::Decode { .. })
        ));

        let unknown_kind = file(r#"{"kind": "gradient_boosting"}"#);
        assert!(matches!(
            ModelArtifacts::load(&config(&pre, &unknown_kind)),
            Err(ArtifactError::Decode { .. })
        ));
    }

    #[test]
    fn structurally_invalid_is_reported_with_path() {
        let pre = file(r#"{"transforms": [{"kind": "passthrough", "column": "Surname"}]}"#);
        let cls = file(r#"{"kind": "logistic_regression", "coefficients": [1.0], "intercept": 0.0}"#);

        let err = ModelArtifacts::load(&config(&pre, &cls)).unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid { .. }));
        assert!(err.to_string().contains(&pre.path().display().to_string()));
    }

    #[test]
    fn width_mismatch_is_rejected() {
        let pre = file(PREPROCESSOR);
        let cls = file(r#"{"kind": "logistic_regression", "coefficients": [1.0, 2.0, 3.0], "intercept": 0.0}"#);
        assert!(matches!(
            ModelArtifacts::load(&config(&pre, &cls)),
            Err(ArtifactError::WidthMismatch {
                transformer: 2,
                classifier: 3
            })
        ));
    }

    #[test]
    fn shipped_artifacts_load() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));
        let config = ModelConfig {
            preprocessor_path: root.join("assets/preprocessor.json"),
            classifier_path: root.join("assets/classifier.json"),
        };
        let artifacts = ModelArtifacts::load(&config).unwrap();
        assert!(artifacts.classifier.n_features() > 0);
    }
}
