//! HTTP adapter for prediction endpoints.
//!
//! - `GET /` - Welcome message and docs pointer
//! - `GET /docs` - Endpoint listing
//! - `GET /health` - Liveness probe
//! - `POST /api/prediction/from-text` - Predict from free text
//! - `POST /api/prediction/from-text-with-probability` - Predict from free text with probability
//! - `POST /api/prediction/batch` - Predict for several texts
//! - `POST /api/prediction/from-record` - Predict from structured fields

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{PredictionApiError, PredictionAppState};
pub use routes::{app_router, prediction_router, prediction_routes};
