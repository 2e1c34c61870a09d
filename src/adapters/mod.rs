//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the core to external systems:
//! - `ai` - Language-model providers (OpenAI, mock)
//! - `model` - JSON-artifact preprocessing and classifiers
//! - `http` - Axum REST API

pub mod ai;
pub mod http;
pub mod model;

pub use ai::{MockAIProvider, OpenAIConfig, OpenAIProvider};
pub use model::{ArtifactError, ModelArtifacts};
