//! PredictFromTextHandler - Extract -> validate -> prepare -> predict

use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::Duration;

use super::extract_customer::{ExtractCustomerCommand, ExtractCustomerHandler};
use super::predict_churn::PredictChurnHandler;
use crate::application::errors::PredictionError;
use crate::domain::customer::{CustomerRecord, RawFields};
use crate::domain::prediction::PredictionResult;
use crate::ports::AIError;

/// Command to predict churn for one free-text description
#[derive(Debug, Clone)]
pub struct PredictFromTextCommand {
    pub text: String,
    pub with_probability: bool,
}

/// Command to predict churn for several descriptions
#[derive(Debug, Clone)]
pub struct PredictBatchCommand {
    pub texts: Vec<String>,
}

/// Command to predict churn for an already-structured field mapping
#[derive(Debug, Clone)]
pub struct PredictFromRecordCommand {
    pub fields: RawFields,
}

/// Batch limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    /// Extractions in flight at once
    pub concurrency: usize,
    /// Largest accepted batch
    pub max_size: usize,
    /// Wall-clock budget for extracting a whole batch
    pub timeout: Duration,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            concurrency: 4,
            max_size: 50,
            timeout: Duration::from_secs(100),
        }
    }
}

/// Composes extraction and prediction for single, batch and record requests.
pub struct PredictFromTextHandler {
    extractor: Arc<ExtractCustomerHandler>,
    predictor: Arc<PredictChurnHandler>,
    limits: BatchLimits,
}

impl PredictFromTextHandler {
    pub fn new(
        extractor: Arc<ExtractCustomerHandler>,
        predictor: Arc<PredictChurnHandler>,
        limits: BatchLimits,
    ) -> Self {
        Self {
            extractor,
            predictor,
            limits: BatchLimits {
                concurrency: limits.concurrency.max(1),
                ..limits
            },
        }
    }

    pub async fn handle(
        &self,
        cmd: PredictFromTextCommand,
    ) -> Result<PredictionResult, PredictionError> {
        let record = self.extract(cmd.text).await?;
        if cmd.with_probability {
            self.predictor.predict_with_probability(record)
        } else {
            self.predictor.predict(record)
        }
    }

    /// Extracts every text, then scores them, preserving input order.
    ///
    /// Extractions run with bounded concurrency. The first failure fails the
    /// whole batch and cancels the extractions still in flight, as does running
    /// past `limits.timeout`, which is reported as an upstream timeout.
    pub async fn handle_batch(
        &self,
        cmd: PredictBatchCommand,
    ) -> Result<Vec<PredictionResult>, PredictionError> {
        let size = cmd.texts.len();
        if size > self.limits.max_size {
            return Err(PredictionError::invalid_request(format!(
                "batch of {} texts exceeds the limit of {}",
                size, self.limits.max_size
            )));
        }
        if let Some(index) = cmd.texts.iter().position(|t| t.trim().is_empty()) {
            return Err(PredictionError::invalid_request(format!(
                "texts[{}] must not be empty",
                index
            )));
        }
        if size == 0 {
            return Ok(Vec::new());
        }

        tracing::info!(size, concurrency = self.limits.concurrency, "batch prediction started");

        let extraction = stream::iter(cmd.texts.into_iter().enumerate())
            .map(|(index, text)| async move {
                tracing::debug!(index, "extracting batch item");
                self.extract(text).await.map_err(|e| {
                    tracing::warn!(index, error = %e, "batch item failed");
                    e
                })
            })
            .buffered(self.limits.concurrency)
            .try_collect::<Vec<CustomerRecord>>();

        let records = tokio::time::timeout(self.limits.timeout, extraction)
            .await
            .map_err(|_| {
                tracing::error!(size, timeout = ?self.limits.timeout, "batch extraction timed out");
                PredictionError::Upstream(AIError::Timeout {
                    timeout_secs: u32::try_from(self.limits.timeout.as_secs()).unwrap_or(u32::MAX),
                })
            })??;

        let results = self.predictor.predict_batch(records)?;
        tracing::info!(size = results.len(), "batch prediction finished");
        Ok(results)
    }

    /// Validates a structured mapping and predicts with probability.
    pub fn handle_record(
        &self,
        cmd: PredictFromRecordCommand,
    ) -> Result<PredictionResult, PredictionError> {
        let record = CustomerRecord::validate(&cmd.fields).map_err(|e| {
            tracing::warn!(fields = ?e.fields(), "record rejected");
            PredictionError::Validation(e)
        })?;
        self.predictor.predict_with_probability(record)
    }

    async fn extract(&self, text: String) -> Result<CustomerRecord, PredictionError> {
        self.extractor.handle(ExtractCustomerCommand { text }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::application::handlers::ExtractionSettings;
    use crate::domain::extraction::ExtractionError;
    use crate::domain::features::FeatureVector;
    use crate::ports::{AIError, ChurnClassifier, FeatureTransformer, InferenceError};
    use serde_json::json;
    use std::time::Duration;

    /// Emits `[Age]`.
    struct AgeOnly;

    impl FeatureTransformer for AgeOnly {
        fn transform(&self, features: &FeatureVector) -> Result<Vec<f64>, InferenceError> {
            Ok(vec![features.get("Age").and_then(|v| v.as_f64()).unwrap_or_default()])
        }

        fn output_width(&self) -> usize {
            1
        }
    }

    /// Exit probability grows with age.
    struct AgeRule;

    impl ChurnClassifier for AgeRule {
        fn predict(&self, encoded: &[f64]) -> Result<usize, InferenceError> {
            Ok(usize::from(encoded[0] > 50.0))
        }

        fn predict_proba(&self, encoded: &[f64]) -> Result<[f64; 2], InferenceError> {
            let p1 = encoded[0] / 100.0;
            Ok([1.0 - p1, p1])
        }

        fn n_features(&self) -> usize {
            1
        }
    }

    fn customer_json(age: i64) -> String {
        json!({
            "CreditScore": 650, "Geography": "France", "Gender": "Female", "Age": age,
            "Tenure": 3, "Balance": 2000.0, "NumOfProducts": 1, "HasCrCard": true,
            "IsActiveMember": true, "EstimatedSalary": 75000.0
        })
        .to_string()
    }

    fn handler_with(provider: MockAIProvider, limits: BatchLimits) -> (PredictFromTextHandler, Arc<MockAIProvider>) {
        let provider = Arc::new(provider);
        let extractor = Arc::new(ExtractCustomerHandler::new(
            provider.clone(),
            ExtractionSettings::default(),
        ));
        let predictor = Arc::new(PredictChurnHandler::new(Arc::new(AgeOnly), Arc::new(AgeRule)));
        (PredictFromTextHandler::new(extractor, predictor, limits), provider)
    }

    fn handler(provider: MockAIProvider) -> (PredictFromTextHandler, Arc<MockAIProvider>) {
        handler_with(provider, BatchLimits::default())
    }

    fn text_cmd(text: &str, with_probability: bool) -> PredictFromTextCommand {
        PredictFromTextCommand {
            text: text.to_string(),
            with_probability,
        }
    }

    #[tokio::test]
    async fn single_text_label_only() {
        let (handler, _) = handler(MockAIProvider::new().with_response(customer_json(62)));

        let result = handler.handle(text_cmd("old customer", false)).await.unwrap();
        assert_eq!(result.prediction().as_str(), "Exit");
        assert_eq!(result.probability(), None);
    }

    #[tokio::test]
    async fn single_text_with_probability() {
        let (handler, _) = handler(MockAIProvider::new().with_response(customer_json(35)));

        let result = handler.handle(text_cmd("young customer", true)).await.unwrap();
        assert_eq!(result.prediction().as_str(), "Not Exit");
        assert_eq!(result.probability(), Some(0.35));
    }

    #[tokio::test]
    async fn batch_preserves_input_order_under_concurrency() {
        let provider = MockAIProvider::new()
            .with_response_for("first", customer_json(20))
            .with_response_for("second", customer_json(70))
            .with_response_for("third", customer_json(45))
            .with_delay(Duration::from_millis(5));
        let (handler, provider) = handler_with(
            provider,
            BatchLimits {
                concurrency: 3,
                max_size: 10,
                ..BatchLimits::default()
            },
        );

        let results = handler
            .handle_batch(PredictBatchCommand {
                texts: vec!["first".into(), "second".into(), "third".into()],
            })
            .await
            .unwrap();

        let ages: Vec<_> = results.iter().map(|r| r.record().age()).collect();
        assert_eq!(ages, vec![20, 70, 45]);
        assert!(results.iter().all(|r| r.probability().is_none()));
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn batch_fails_whole_on_one_bad_item() {
        let provider = MockAIProvider::new()
            .with_response_for("good", customer_json(30))
            .with_response_for("bad", "no structured data here");
        let (handler, _) = handler(provider);

        let err = handler
            .handle_batch(PredictBatchCommand {
                texts: vec!["good".into(), "bad".into(), "good".into()],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PredictionError::Extraction(ExtractionError::NoJsonFound)));
    }

    #[tokio::test]
    async fn batch_upstream_failure_is_upstream() {
        let provider = MockAIProvider::new()
            .with_error_for("down", MockError::Network { message: "reset".into() });
        let (handler, _) = handler(provider);

        let err = handler
            .handle_batch(PredictBatchCommand {
                texts: vec!["down".into()],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PredictionError::Upstream(AIError::Network(_))));
    }

    #[tokio::test]
    async fn slow_batch_times_out_as_upstream_error() {
        let provider = MockAIProvider::new()
            .with_response_for("slow", customer_json(30))
            .with_delay(Duration::from_millis(200));
        let (handler, _) = handler_with(
            provider,
            BatchLimits {
                concurrency: 1,
                timeout: Duration::from_millis(300),
                ..BatchLimits::default()
            },
        );

        let err = handler
            .handle_batch(PredictBatchCommand {
                texts: vec!["slow one".into(), "slow two".into(), "slow three".into()],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PredictionError::Upstream(AIError::Timeout { .. })));
    }

    #[tokio::test]
    async fn empty_batch_makes_no_calls() {
        let (handler, provider) = handler(MockAIProvider::new());

        let results = handler
            .handle_batch(PredictBatchCommand { texts: vec![] })
            .await
            .unwrap();
        assert!(results.is_empty());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn oversized_or_blank_batch_is_rejected_up_front() {
        let (handler, provider) = handler_with(
            MockAIProvider::new(),
            BatchLimits {
                concurrency: 2,
                max_size: 2,
                ..BatchLimits::default()
            },
        );

        let too_many = handler
            .handle_batch(PredictBatchCommand {
                texts: vec!["a".into(), "b".into(), "c".into()],
            })
            .await;
        assert!(matches!(too_many, Err(PredictionError::InvalidRequest(_))));

        let blank = handler
            .handle_batch(PredictBatchCommand {
                texts: vec!["a".into(), " ".into()],
            })
            .await;
        match blank {
            Err(PredictionError::InvalidRequest(msg)) => assert!(msg.contains("texts[1]")),
            other => panic!("unexpected: {:?}", other.map(|r| r.len())),
        }
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn record_path_validates_and_scores() {
        let (handler, provider) = handler(MockAIProvider::new());
        let fields = serde_json::from_str::<RawFields>(&customer_json(80)).unwrap();

        let result = handler
            .handle_record(PredictFromRecordCommand { fields })
            .unwrap();
        assert_eq!(result.prediction().as_str(), "Exit");
        assert_eq!(result.probability(), Some(0.8));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn record_path_reports_validation_errors() {
        let (handler, _) = handler(MockAIProvider::new());
        let mut fields = serde_json::from_str::<RawFields>(&customer_json(80)).unwrap();
        fields.insert("Geography".into(), json!("Canada"));
        fields.remove("Age");

        match handler.handle_record(PredictFromRecordCommand { fields }) {
            Err(PredictionError::Validation(e)) => {
                assert_eq!(e.fields(), vec!["Geography", "Age"]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
