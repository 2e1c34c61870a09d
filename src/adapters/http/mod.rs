//! HTTP adapters - REST API implementations.

pub mod prediction;

pub use prediction::{app_router, prediction_router, PredictionAppState};
