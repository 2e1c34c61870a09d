//! HTTP handlers for prediction endpoints.
//!
//! These handlers connect Axum routes to the application layer handlers.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::application::{
    PredictBatchCommand, PredictFromRecordCommand, PredictFromTextCommand, PredictFromTextHandler,
    PredictionError,
};
use crate::domain::customer::{RawFields, ValidationError};
use crate::domain::extraction::ExtractionError;

use super::dto::{
    BatchTextRequest, DocsResponse, EndpointDoc, ErrorResponse, HealthResponse, TextRequest,
    WelcomeResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state, cloned per request.
#[derive(Clone)]
pub struct PredictionAppState {
    pub predictor: Arc<PredictFromTextHandler>,
    pub api_name: Arc<str>,
    pub api_description: Arc<str>,
}

impl PredictionAppState {
    pub fn new(
        predictor: Arc<PredictFromTextHandler>,
        api_name: impl Into<Arc<str>>,
        api_description: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            predictor,
            api_name: api_name.into(),
            api_description: api_description.into(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Informational endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// GET / - Welcome message and docs pointer
pub async fn root(State(state): State<PredictionAppState>) -> Json<WelcomeResponse> {
    Json(WelcomeResponse::for_api(&state.api_name))
}

/// GET /health - Liveness probe
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// GET /docs - Endpoint listing with example bodies
pub async fn docs(State(state): State<PredictionAppState>) -> Json<DocsResponse> {
    let text_example = json!({
        "text": "Jane Smith is a 35-year-old female from France with a credit score of 650. \
                 She has been a customer for 3 years, has a balance of $2000, uses 1 product, \
                 has a credit card, is an active member and earns $75000 a year."
    });
    let record_example = json!({
        "CreditScore": 650, "Geography": "France", "Gender": "Female", "Age": 35,
        "Tenure": 3, "Balance": 2000.0, "NumOfProducts": 1, "HasCrCard": 1,
        "IsActiveMember": 1, "EstimatedSalary": 75000.0
    });

    Json(DocsResponse {
        name: state.api_name.to_string(),
        description: state.api_description.to_string(),
        endpoints: vec![
            EndpointDoc {
                method: "POST",
                path: "/api/prediction/from-text",
                summary: "Extract a customer from free text and predict churn",
                example_body: Some(text_example.clone()),
            },
            EndpointDoc {
                method: "POST",
                path: "/api/prediction/from-text-with-probability",
                summary: "Same as from-text, plus the probability of exit",
                example_body: Some(text_example.clone()),
            },
            EndpointDoc {
                method: "POST",
                path: "/api/prediction/batch",
                summary: "Predict churn for several texts; results keep input order",
                example_body: Some(json!({ "texts": [text_example["text"].clone()] })),
            },
            EndpointDoc {
                method: "POST",
                path: "/api/prediction/from-record",
                summary: "Predict churn with probability for structured customer fields",
                example_body: Some(record_example),
            },
            EndpointDoc {
                method: "GET",
                path: "/health",
                summary: "Liveness probe",
                example_body: None,
            },
        ],
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Prediction endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/prediction/from-text - Label only
pub async fn predict_from_text(
    State(state): State<PredictionAppState>,
    Json(request): Json<TextRequest>,
) -> Result<impl IntoResponse, PredictionApiError> {
    let result = state
        .predictor
        .handle(PredictFromTextCommand {
            text: request.text,
            with_probability: false,
        })
        .await?;
    Ok(Json(result))
}

/// POST /api/prediction/from-text-with-probability - Label and exit probability
pub async fn predict_from_text_with_probability(
    State(state): State<PredictionAppState>,
    Json(request): Json<TextRequest>,
) -> Result<impl IntoResponse, PredictionApiError> {
    let result = state
        .predictor
        .handle(PredictFromTextCommand {
            text: request.text,
            with_probability: true,
        })
        .await?;
    Ok(Json(result))
}

/// POST /api/prediction/batch - Label-only results in input order
pub async fn predict_batch(
    State(state): State<PredictionAppState>,
    Json(request): Json<BatchTextRequest>,
) -> Result<impl IntoResponse, PredictionApiError> {
    let results = state
        .predictor
        .handle_batch(PredictBatchCommand {
            texts: request.texts,
        })
        .await?;
    Ok(Json(results))
}

/// POST /api/prediction/from-record - Structured fields, label and probability
pub async fn predict_from_record(
    State(state): State<PredictionAppState>,
    Json(fields): Json<RawFields>,
) -> Result<impl IntoResponse, PredictionApiError> {
    let result = state
        .predictor
        .handle_record(PredictFromRecordCommand { fields })?;
    Ok(Json(result))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

fn upstream_error() -> ErrorResponse {
    ErrorResponse::new(
        "UPSTREAM_SERVICE_ERROR",
        "The extraction service is unavailable. Please try again later.",
    )
}

/// Replaces the timeout layer's empty 408 with the upstream error body.
///
/// Extraction is the only slow stage, so a request that runs out of time was
/// waiting on the language model.
pub async fn request_timeout_as_upstream_error(response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }
    tracing::error!(error_code = "UPSTREAM_SERVICE_ERROR", "request timed out");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(upstream_error())).into_response()
}

/// API error type that converts application errors to HTTP responses.
#[derive(Debug)]
pub struct PredictionApiError(PredictionError);

impl From<PredictionError> for PredictionApiError {
    fn from(err: PredictionError) -> Self {
        Self(err)
    }
}

fn violation_details(err: &ValidationError) -> serde_json::Value {
    err.violations()
        .iter()
        .map(|v| json!({ "field": v.field(), "message": v.to_string() }))
        .collect()
}

impl IntoResponse for PredictionApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match &self.0 {
            PredictionError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_details("VALIDATION_FAILED", e.to_string(), violation_details(e)),
            ),
            PredictionError::Extraction(e) => {
                let body = match e {
                    ExtractionError::NoJsonFound => ErrorResponse::new("NO_JSON_FOUND", e.to_string()),
                    ExtractionError::MalformedJson { .. } => {
                        ErrorResponse::new("MALFORMED_JSON", e.to_string())
                    }
                    ExtractionError::InvalidFields(v) => {
                        ErrorResponse::with_details("INVALID_FIELDS", e.to_string(), violation_details(v))
                    }
                };
                (StatusCode::BAD_REQUEST, body)
            }
            PredictionError::InvalidRequest(reason) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("INVALID_REQUEST", reason.clone()),
            ),
            PredictionError::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, upstream_error()),
            PredictionError::Inference(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("INFERENCE_FAILED", "Prediction failed due to an internal error."),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, error_code = %body.error_code, "request failed");
        }
        (status, Json(body)).into_response()
    }
}
