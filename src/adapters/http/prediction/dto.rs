//! Request and response bodies for the prediction API.

use serde::{Deserialize, Serialize};

/// Body of the single-text endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TextRequest {
    pub text: String,
}

/// Body of the batch endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchTextRequest {
    pub texts: Vec<String>,
}

/// `GET /` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
    pub documentation: String,
}

impl WelcomeResponse {
    pub fn for_api(name: &str) -> Self {
        Self {
            message: format!("Welcome to the {}", name),
            documentation: "/docs".to_string(),
        }
    }
}

/// `GET /health` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// One documented endpoint in the `GET /docs` listing.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointDoc {
    pub method: &'static str,
    pub path: &'static str,
    pub summary: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_body: Option<serde_json::Value>,
}

/// `GET /docs` response.
#[derive(Debug, Clone, Serialize)]
pub struct DocsResponse {
    pub name: String,
    pub description: String,
    pub endpoints: Vec<EndpointDoc>,
}

/// Standard error response format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Create an error response with details.
    pub fn with_details(
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}
