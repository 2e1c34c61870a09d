//! Two-phase parsing of model output: locate and decode a loosely-typed
//! mapping, then hand it to the validator.

use std::sync::Arc;

use crate::domain::customer::{CustomerRecord, RawFields};

use super::errors::ExtractionError;
use super::locator::{LastJsonObject, PayloadLocator};

/// Turns raw model output into a validated [`CustomerRecord`].
#[derive(Clone)]
pub struct ResponseParser {
    locator: Arc<dyn PayloadLocator>,
}

impl ResponseParser {
    /// Creates a parser using the last-JSON-object heuristic.
    pub fn new() -> Self {
        Self::with_locator(Arc::new(LastJsonObject))
    }

    /// Creates a parser with a custom payload locator.
    pub fn with_locator(locator: Arc<dyn PayloadLocator>) -> Self {
        Self { locator }
    }

    /// Locates and decodes the payload into a field mapping.
    pub fn parse_fields(&self, output: &str) -> Result<RawFields, ExtractionError> {
        let payload = self
            .locator
            .locate(output)
            .ok_or(ExtractionError::NoJsonFound)?;

        match serde_json::from_str::<serde_json::Value>(payload) {
            Ok(serde_json::Value::Object(fields)) => Ok(fields),
            Ok(other) => Err(ExtractionError::malformed(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
            Err(e) => Err(ExtractionError::malformed(e.to_string())),
        }
    }

    /// Full extraction: locate, decode, validate.
    pub fn parse_record(&self, output: &str) -> Result<CustomerRecord, ExtractionError> {
        let fields = self.parse_fields(output)?;
        Ok(CustomerRecord::validate(&fields)?)
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResponseParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseParser").finish_non_exhaustive()
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
