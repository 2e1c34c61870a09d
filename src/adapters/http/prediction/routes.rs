//! Axum router configuration for prediction endpoints.

use axum::{
    http::HeaderValue,
    middleware::map_response,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

use super::handlers::{
    docs, health, predict_batch, predict_from_record, predict_from_text,
    predict_from_text_with_probability, request_timeout_as_upstream_error, root,
    PredictionAppState,
};

/// Create the prediction API router.
///
/// # Routes
/// - `POST /from-text` - Extract and predict, label only
/// - `POST /from-text-with-probability` - Extract and predict with probability
/// - `POST /batch` - Batch of texts, label only, order preserved
/// - `POST /from-record` - Structured fields, label and probability
pub fn prediction_routes() -> Router<PredictionAppState> {
    Router::new()
        .route("/from-text", post(predict_from_text))
        .route(
            "/from-text-with-probability",
            post(predict_from_text_with_probability),
        )
        .route("/batch", post(predict_batch))
        .route("/from-record", post(predict_from_record))
}

/// Create the complete router: informational endpoints plus `/api/prediction`.
///
/// # Example
///
/// ```ignore
/// let app = prediction_router().with_state(state);
/// ```
pub fn prediction_router() -> Router<PredictionAppState> {
    Router::new()
        .route("/", get(root))
        .route("/docs", get(docs))
        .route("/health", get(health))
        .nest("/api/prediction", prediction_routes())
}

/// The served application: routes, state, tracing, CORS and request timeout.
///
/// A request cut off by the timeout gets the JSON upstream error, not an empty 408.
pub fn app_router(state: PredictionAppState, server: &ServerConfig) -> Router {
    prediction_router()
        .with_state(state)
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(map_response(request_timeout_as_upstream_error))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
}

/// Any origin when none are configured, otherwise exactly the listed ones.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    if server.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::application::{
        BatchLimits, ExtractCustomerHandler, ExtractionSettings, PredictChurnHandler,
        PredictFromTextHandler,
    };
    use crate::domain::features::FeatureVector;
    use crate::ports::{ChurnClassifier, FeatureTransformer, InferenceError};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    // ───────────────────────────────────────────────────────────────
    // Minimal model (route testing only)
    // ───────────────────────────────────────────────────────────────

    struct Tenure;

    impl FeatureTransformer for Tenure {
        fn transform(&self, features: &FeatureVector) -> Result<Vec<f64>, InferenceError> {
            Ok(vec![features.get("Tenure").and_then(|v| v.as_f64()).unwrap_or_default()])
        }

        fn output_width(&self) -> usize {
            1
        }
    }

    struct ShortTenureExits;

    impl ChurnClassifier for ShortTenureExits {
        fn predict(&self, encoded: &[f64]) -> Result<usize, InferenceError> {
            Ok(usize::from(encoded[0] < 2.0))
        }

        fn predict_proba(&self, encoded: &[f64]) -> Result<[f64; 2], InferenceError> {
            let p1 = if encoded[0] < 2.0 { 0.7 } else { 0.2 };
            Ok([1.0 - p1, p1])
        }

        fn n_features(&self) -> usize {
            1
        }
    }

    const CUSTOMER: &str = r#"{"CreditScore": 700, "Geography": "spain", "Gender": "MALE", "Age": 28, "Tenure": 1, "Balance": 0, "NumOfProducts": 2, "HasCrCard": false, "IsActiveMember": true, "EstimatedSalary": 50000}"#;

    fn app(provider: MockAIProvider) -> Router {
        app_with_server(provider, &ServerConfig::default())
    }

    fn app_with_server(provider: MockAIProvider, server: &ServerConfig) -> Router {
        let extractor = Arc::new(ExtractCustomerHandler::new(
            Arc::new(provider),
            ExtractionSettings::default(),
        ));
        let predictor = Arc::new(PredictChurnHandler::new(
            Arc::new(Tenure),
            Arc::new(ShortTenureExits),
        ));
        let handler = Arc::new(PredictFromTextHandler::new(
            extractor,
            predictor,
            BatchLimits::default(),
        ));
        let state = PredictionAppState::new(handler, "Churn-Detection-Model", "Churn Detection Model API");
        app_router(state, server)
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, json)
    }

    #[tokio::test]
    async fn root_returns_welcome() {
        let (status, body) = send(app(MockAIProvider::new()), "GET", "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Welcome to the Churn-Detection-Model");
        assert_eq!(body["documentation"], "/docs");
    }

    #[tokio::test]
    async fn docs_lists_prediction_endpoints() {
        let (status, body) = send(app(MockAIProvider::new()), "GET", "/docs", None).await;
        assert_eq!(status, StatusCode::OK);
        let paths: Vec<_> = body["endpoints"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["path"].as_str().unwrap().to_string())
            .collect();
        assert!(paths.contains(&"/api/prediction/batch".to_string()));
    }

    #[tokio::test]
    async fn from_text_returns_record_and_label() {
        let (status, body) = send(
            app(MockAIProvider::new().with_response(CUSTOMER)),
            "POST",
            "/api/prediction/from-text",
            Some(r#"{"text": "A 28 year old man from Spain"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["Geography"], "Spain");
        assert_eq!(body["Gender"], "Male");
        assert_eq!(body["HasCrCard"], 0);
        assert_eq!(body["Prediction"], "Exit");
        assert!(body.get("Probability").is_none());
    }

    #[tokio::test]
    async fn with_probability_includes_probability() {
        let (status, body) = send(
            app(MockAIProvider::new().with_response(CUSTOMER)),
            "POST",
            "/api/prediction/from-text-with-probability",
            Some(r#"{"text": "A 28 year old man from Spain"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["Probability"], 0.7);
    }

    #[tokio::test]
    async fn batch_returns_array() {
        let (status, body) = send(
            app(MockAIProvider::new().with_response(CUSTOMER).with_response(CUSTOMER)),
            "POST",
            "/api/prediction/batch",
            Some(r#"{"texts": ["one", "two"]}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn from_record_validates_directly() {
        let (status, body) = send(
            app(MockAIProvider::new()),
            "POST",
            "/api/prediction/from-record",
            Some(r#"{"CreditScore": 1200}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn blank_text_is_invalid_request() {
        let (status, body) = send(
            app(MockAIProvider::new()),
            "POST",
            "/api/prediction/from-text",
            Some(r#"{"text": "  "}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn missing_text_field_is_rejected_by_extractor() {
        let (status, _) = send(
            app(MockAIProvider::new()),
            "POST",
            "/api/prediction/from-text",
            Some(r#"{"txt": "typo"}"#),
        )
        .await;

        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn request_timeout_returns_json_upstream_error() {
        let provider = MockAIProvider::new()
            .with_response(CUSTOMER)
            .with_delay(Duration::from_millis(1500));
        let server = ServerConfig {
            request_timeout_secs: 1,
            ..ServerConfig::default()
        };

        let (status, body) = send(
            app_with_server(provider, &server),
            "POST",
            "/api/prediction/from-text",
            Some(r#"{"text": "A 28 year old man from Spain"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error_code"], "UPSTREAM_SERVICE_ERROR");
    }

    #[tokio::test]
    async fn configured_origin_is_allowed() {
        let server = ServerConfig {
            cors_origins: Some("http://localhost:5173,bad\norigin".to_string()),
            ..ServerConfig::default()
        };
        let request = Request::builder()
            .uri("/health")
            .header("origin", "http://localhost:5173")
            .body(Body::empty())
            .unwrap();

        let response = app_with_server(MockAIProvider::new(), &server)
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://localhost:5173"
        );
    }
}
