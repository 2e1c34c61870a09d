//! Column-wise preprocessing described by a JSON artifact.
//!
//! Each transform reads one named column of the [`FeatureVector`] and appends
//! its encoded values to the output row. The row is the concatenation of all
//! transforms in artifact order.

use serde::Deserialize;

use crate::domain::features::{Dtype, FeatureValue, FeatureVector, COLUMNS};
use crate::ports::{FeatureTransformer, InferenceError};

/// Persisted preprocessing pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct PreprocessorArtifact {
    pub transforms: Vec<ColumnTransform>,
}

/// What to do with a category that was not seen at fit time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    #[default]
    Error,
    /// Encode as all zeros.
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnTransform {
    /// `(x - mean) / scale`
    StandardScale { column: String, mean: f64, scale: f64 },
    OneHot {
        column: String,
        categories: Vec<String>,
        #[serde(default)]
        handle_unknown: HandleUnknown,
        #[serde(default)]
        drop_first: bool,
    },
    Passthrough { column: String },
}

impl ColumnTransform {
    pub fn column(&self) -> &str {
        match self {
            ColumnTransform::StandardScale { column, .. }
            | ColumnTransform::OneHot { column, .. }
            | ColumnTransform::Passthrough { column } => column,
        }
    }

    /// Number of output values this transform produces.
    pub fn width(&self) -> usize {
        match self {
            ColumnTransform::OneHot {
                categories,
                drop_first,
                ..
            } => categories.len() - usize::from(*drop_first),
            _ => 1,
        }
    }

    fn validate(&self) -> Result<(), InferenceError> {
        let column = self.column();
        let dtype = COLUMNS
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, dtype)| *dtype)
            .ok_or_else(|| InferenceError::InvalidArtifact(format!("unknown column '{}'", column)))?;

        match self {
            ColumnTransform::StandardScale { mean, scale, .. } => {
                if dtype == Dtype::Str {
                    return Err(invalid(column, "cannot scale a string column"));
                }
                if !mean.is_finite() || !scale.is_finite() || *scale == 0.0 {
                    return Err(invalid(column, "mean and scale must be finite, scale non-zero"));
                }
            }
            ColumnTransform::OneHot {
                categories,
                drop_first,
                ..
            } => {
                if categories.is_empty() {
                    return Err(invalid(column, "one_hot needs at least one category"));
                }
                if *drop_first && categories.len() < 2 {
                    return Err(invalid(column, "drop_first needs at least two categories"));
                }
                let mut seen: Vec<&str> = Vec::with_capacity(categories.len());
                for category in categories {
                    if seen.contains(&category.as_str()) {
                        return Err(invalid(column, &format!("duplicate category '{}'", category)));
                    }
                    seen.push(category);
                }
            }
            ColumnTransform::Passthrough { .. } => {
                if dtype == Dtype::Str {
                    return Err(invalid(column, "cannot pass a string column through"));
                }
            }
        }
        Ok(())
    }

    fn apply(&self, value: &FeatureValue, out: &mut Vec<f64>) -> Result<(), InferenceError> {
        match self {
            ColumnTransform::StandardScale {
                column,
                mean,
                scale,
            } => {
                let x = numeric(column, value)?;
                out.push((x - mean) / scale);
            }
            ColumnTransform::Passthrough { column } => {
                out.push(numeric(column, value)?);
            }
            ColumnTransform::OneHot {
                column,
                categories,
                handle_unknown,
                drop_first,
            } => {
                let rendered = value.to_string();
                let hit = categories.iter().position(|c| *c == rendered);
                if hit.is_none() && *handle_unknown == HandleUnknown::Error {
                    return Err(InferenceError::UnknownCategory {
                        column: column.clone(),
                        value: rendered,
                    });
                }
                let skip = usize::from(*drop_first);
                out.extend((skip..categories.len()).map(|i| if hit == Some(i) { 1.0 } else { 0.0 }));
            }
        }
        Ok(())
    }
}

fn invalid(column: &str, reason: &str) -> InferenceError {
    InferenceError::InvalidArtifact(format!("column '{}': {}", column, reason))
}

fn numeric(column: &str, value: &FeatureValue) -> Result<f64, InferenceError> {
    value
        .as_f64()
        .ok_or_else(|| InferenceError::unexpected_value(column, format!("'{}' is not numeric", value)))
}

/// Validated preprocessing pipeline.
#[derive(Debug, Clone)]
pub struct JsonPreprocessor {
    transforms: Vec<ColumnTransform>,
    width: usize,
}

impl JsonPreprocessor {
    /// Checks the artifact and builds the pipeline.
    pub fn from_artifact(artifact: PreprocessorArtifact) -> Result<Self, InferenceError> {
        if artifact.transforms.is_empty() {
            return Err(InferenceError::InvalidArtifact(
                "preprocessor has no transforms".to_string(),
            ));
        }
        for transform in &artifact.transforms {
            transform.validate()?;
        }
        let width = artifact.transforms.iter().map(ColumnTransform::width).sum();
        Ok(Self {
            transforms: artifact.transforms,
            width,
        })
    }
}

impl FeatureTransformer for JsonPreprocessor {
    fn transform(&self, features: &FeatureVector) -> Result<Vec<f64>, InferenceError> {
        let mut out = Vec::with_capacity(self.width);
        for transform in &self.transforms {
            let value = features
                .get(transform.column())
                .ok_or_else(|| InferenceError::MissingColumn {
                    column: transform.column().to_string(),
                })?;
            transform.apply(value, &mut out)?;
        }
        if out.len() != self.width {
            return Err(InferenceError::shape_mismatch(self.width, out.len()));
        }
        Ok(out)
    }

    fn output_width(&self) -> usize {
        self.width
    }
}
