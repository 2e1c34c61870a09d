//! PredictChurnHandler - Score validated customers with the loaded pipeline

use std::sync::Arc;

use crate::application::errors::PredictionError;
use crate::domain::customer::CustomerRecord;
use crate::domain::features::FeatureVector;
use crate::domain::prediction::{ChurnLabel, PredictionResult};
use crate::ports::{ChurnClassifier, FeatureTransformer, InferenceError};

/// Runs FeatureVector -> transform -> classifier.
///
/// Holds only shared, read-only model state, so one instance serves every
/// concurrent request.
#[derive(Clone)]
pub struct PredictChurnHandler {
    transformer: Arc<dyn FeatureTransformer>,
    classifier: Arc<dyn ChurnClassifier>,
}

impl PredictChurnHandler {
    pub fn new(
        transformer: Arc<dyn FeatureTransformer>,
        classifier: Arc<dyn ChurnClassifier>,
    ) -> Self {
        Self {
            transformer,
            classifier,
        }
    }

    /// Label-only prediction.
    pub fn predict(&self, record: CustomerRecord) -> Result<PredictionResult, PredictionError> {
        let encoded = self.encode(&record)?;
        let label = self.label(&encoded)?;
        tracing::info!(prediction = %label, "churn predicted");
        Ok(PredictionResult::new(record, label))
    }

    /// Prediction plus the probability of the `Exit` class, rounded to 4 places.
    pub fn predict_with_probability(
        &self,
        record: CustomerRecord,
    ) -> Result<PredictionResult, PredictionError> {
        let encoded = self.encode(&record)?;
        let label = self.label(&encoded)?;
        let [_, exit] = self.classifier.predict_proba(&encoded).map_err(log_inference)?;
        if !(0.0..=1.0).contains(&exit) {
            return Err(log_inference(InferenceError::unexpected_value(
                "Probability",
                format!("{} is not a probability", exit),
            )));
        }
        let result = PredictionResult::with_probability(record, label, exit);
        tracing::info!(prediction = %label, probability = result.probability(), "churn predicted");
        Ok(result)
    }

    /// Label-only predictions in input order. Fails as a whole on the first error.
    pub fn predict_batch(
        &self,
        records: Vec<CustomerRecord>,
    ) -> Result<Vec<PredictionResult>, PredictionError> {
        tracing::info!(size = records.len(), "scoring batch");
        records.into_iter().map(|r| self.predict(r)).collect()
    }

    fn encode(&self, record: &CustomerRecord) -> Result<Vec<f64>, PredictionError> {
        let features = FeatureVector::from_record(record);
        let encoded = self.transformer.transform(&features).map_err(log_inference)?;
        if encoded.len() != self.classifier.n_features() {
            return Err(log_inference(InferenceError::shape_mismatch(
                self.classifier.n_features(),
                encoded.len(),
            )));
        }
        Ok(encoded)
    }

    fn label(&self, encoded: &[f64]) -> Result<ChurnLabel, PredictionError> {
        let class = self.classifier.predict(encoded).map_err(log_inference)?;
        ChurnLabel::from_class(class).ok_or_else(|| log_inference(InferenceError::UnknownClass(class)))
    }
}

fn log_inference(err: InferenceError) -> PredictionError {
    tracing::error!(error = %err, "inference failed");
    PredictionError::Inference(err)
}
