//! ExtractCustomerHandler - Turn free text into a validated customer record

use std::sync::Arc;
use uuid::Uuid;

use crate::application::errors::PredictionError;
use crate::domain::customer::CustomerRecord;
use crate::domain::extraction::{build_extraction_prompt, ResponseParser, SYSTEM_PROMPT};
use crate::ports::{AIProvider, CompletionRequest, FinishReason, MessageRole, RequestMetadata};

const LOG_PREVIEW_CHARS: usize = 100;

/// Command to extract a customer from free text
#[derive(Debug, Clone)]
pub struct ExtractCustomerCommand {
    pub text: String,
}

/// Decoding parameters for the extraction call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractionSettings {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_tokens: 1000,
        }
    }
}

/// Handler for LLM-backed customer extraction.
///
/// Makes exactly one provider call per command. Provider failures are
/// returned immediately as [`PredictionError::Upstream`].
pub struct ExtractCustomerHandler {
    ai_provider: Arc<dyn AIProvider>,
    parser: ResponseParser,
    settings: ExtractionSettings,
}

impl ExtractCustomerHandler {
    pub fn new(ai_provider: Arc<dyn AIProvider>, settings: ExtractionSettings) -> Self {
        Self {
            ai_provider,
            parser: ResponseParser::new(),
            settings,
        }
    }

    /// Replaces the output parser (e.g. for a provider with native JSON output).
    pub fn with_parser(mut self, parser: ResponseParser) -> Self {
        self.parser = parser;
        self
    }

    pub async fn handle(
        &self,
        cmd: ExtractCustomerCommand,
    ) -> Result<CustomerRecord, PredictionError> {
        if cmd.text.trim().is_empty() {
            return Err(PredictionError::invalid_request("text must not be empty"));
        }

        let trace_id = Uuid::new_v4().to_string();
        let provider = self.ai_provider.provider_info();
        tracing::info!(
            %trace_id,
            provider = %provider.name,
            model = %provider.model,
            chars = cmd.text.chars().count(),
            "extracting customer from text"
        );

        let prompt = build_extraction_prompt(&cmd.text);
        tracing::debug!(%trace_id, prompt = preview(&prompt), "extraction prompt");

        let request = CompletionRequest::new(RequestMetadata::new(trace_id.clone()))
            .with_system_prompt(SYSTEM_PROMPT)
            .with_message(MessageRole::User, prompt)
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_tokens);

        let response = self.ai_provider.complete(request).await.map_err(|e| {
            tracing::error!(%trace_id, error = %e, "language model call failed");
            PredictionError::Upstream(e)
        })?;

        if response.finish_reason == FinishReason::Length {
            tracing::warn!(%trace_id, max_tokens = self.settings.max_tokens, "model output was truncated");
        }
        tracing::debug!(
            %trace_id,
            model = %response.model,
            tokens = response.usage.total_tokens,
            output = preview(&response.content),
            "model output received"
        );

        let record = self.parser.parse_record(&response.content).map_err(|e| {
            tracing::warn!(%trace_id, kind = e.kind(), error = %e, "extraction failed");
            PredictionError::Extraction(e)
        })?;

        tracing::info!(%trace_id, "customer extracted");
        Ok(record)
    }
}

/// First [`LOG_PREVIEW_CHARS`] characters of `s`.
fn preview(s: &str) -> &str {
    s.char_indices()
        .nth(LOG_PREVIEW_CHARS)
        .map_or(s, |(idx, _)| &s[..idx])
}
