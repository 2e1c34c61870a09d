//! Model Adapters.
//!
//! JSON-artifact implementations of the FeatureTransformer and
//! ChurnClassifier ports, plus the startup loader that pairs them.
//!
//! ## Available Adapters
//!
//! - `JsonPreprocessor` - standard scaling, one-hot encoding and passthrough columns
//! - `RandomForestClassifier` - averaged decision trees in scikit-learn layout
//! - `LogisticClassifier` - logistic regression

mod artifacts;
mod forest;
mod logistic;
mod preprocessor;

pub use artifacts::{ArtifactError, ClassifierArtifact, ModelArtifacts};
pub use forest::{RandomForestClassifier, TreeArtifact};
pub use logistic::LogisticClassifier;
pub use preprocessor::{ColumnTransform, HandleUnknown, JsonPreprocessor, PreprocessorArtifact};
