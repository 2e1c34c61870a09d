//! Logistic regression classifier.

use crate::ports::{ChurnClassifier, InferenceError};

/// `p1 = sigmoid(w . x + b)`; class 1 when `p1 > threshold`.
#[derive(Debug, Clone)]
pub struct LogisticClassifier {
    coefficients: Vec<f64>,
    intercept: f64,
    threshold: f64,
}

impl LogisticClassifier {
    pub fn new(coefficients: Vec<f64>, intercept: f64, threshold: f64) -> Result<Self, InferenceError> {
        if coefficients.is_empty() {
            return Err(InferenceError::InvalidArtifact(
                "logistic regression has no coefficients".to_string(),
            ));
        }
        if !coefficients.iter().chain([&intercept]).all(|v| v.is_finite()) {
            return Err(InferenceError::InvalidArtifact(
                "logistic regression weights must be finite".to_string(),
            ));
        }
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(InferenceError::InvalidArtifact(format!(
                "decision threshold must be in (0, 1), got {}",
                threshold
            )));
        }
        Ok(Self {
            coefficients,
            intercept,
            threshold,
        })
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl ChurnClassifier for LogisticClassifier {
    fn predict(&self, encoded: &[f64]) -> Result<usize, InferenceError> {
        let [_, p1] = self.predict_proba(encoded)?;
        Ok(usize::from(p1 > self.threshold))
    }

    fn predict_proba(&self, encoded: &[f64]) -> Result<[f64; 2], InferenceError> {
        if encoded.len() != self.coefficients.len() {
            return Err(InferenceError::shape_mismatch(
                self.coefficients.len(),
                encoded.len(),
            ));
        }
        let z = self
            .coefficients
            .iter()
            .zip(encoded)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;
        let p1 = sigmoid(z);
        Ok([1.0 - p1, p1])
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_logit_is_even_odds_and_class_zero() {
        let model = LogisticClassifier::new(vec![1.0, -1.0], 0.0, 0.5).unwrap();
        assert_eq!(model.predict_proba(&[2.0, 2.0]).unwrap(), [0.5, 0.5]);
        assert_eq!(model.predict(&[2.0, 2.0]).unwrap(), 0);
    }

    #[test]
    fn positive_logit_predicts_exit() {
        let model = LogisticClassifier::new(vec![2.0], -1.0, 0.5).unwrap();
        let [p0, p1] = model.predict_proba(&[3.0]).unwrap();
        assert!(p1 > 0.99);
        assert!((p0 + p1 - 1.0).abs() < 1e-12);
        assert_eq!(model.predict(&[3.0]).unwrap(), 1);
    }

    #[test]
    fn shape_is_checked() {
        let model = LogisticClassifier::new(vec![1.0, 1.0, 1.0], 0.0, 0.5).unwrap();
        assert_eq!(model.predict(&[1.0]), Err(InferenceError::shape_mismatch(3, 1)));
        assert_eq!(model.n_features(), 3);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(LogisticClassifier::new(vec![], 0.0, 0.5).is_err());
        assert!(LogisticClassifier::new(vec![f64::NAN], 0.0, 0.5).is_err());
        assert!(LogisticClassifier::new(vec![1.0], 0.0, 1.0).is_err());
    }
}
