//! Customer attribute extraction from language-model output.
//!
//! - `prompt` - the instruction sent to the model
//! - `locator` - finds the JSON payload inside free-form output
//! - `parser` - decodes the payload and runs validation

mod errors;
mod locator;
mod parser;
mod prompt;

pub use errors::ExtractionError;
pub use locator::{LastJsonObject, PayloadLocator, WholeOutput};
pub use parser::ResponseParser;
pub use prompt::{build_extraction_prompt, SYSTEM_PROMPT};
