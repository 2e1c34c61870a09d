//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - language-model completions used by extraction
//! - `FeatureTransformer` / `ChurnClassifier` - the pre-fitted inference pipeline

mod ai_provider;
mod churn_model;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use churn_model::{ChurnClassifier, FeatureTransformer, InferenceError};
