//! Prompt construction for customer attribute extraction.

use crate::domain::customer::FIELD_NAMES;

/// System instruction framing the model as a structured-data extractor.
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that extracts structured data from text.";

const EXAMPLE_TEXT: &str = "Jane Smith is a 35-year-old female from Canada with a credit score of 650. \
She has been with the bank for 3 years, has a balance of 2000.0 USD, holds 1 product, \
owns a credit card, is an active member, and earns an estimated salary of 75000.0 USD.";

const EXAMPLE_JSON: &str = r#"{
    "CreditScore": 650,
    "Geography": "Canada",
    "Gender": "Female",
    "Age": 35,
    "Tenure": 3,
    "Balance": 2000.0,
    "NumOfProducts": 1,
    "HasCrCard": true,
    "IsActiveMember": true,
    "EstimatedSalary": 75000.0
}"#;

/// Builds the user prompt asking for one JSON object with the canonical fields,
/// anchored by a worked example.
pub fn build_extraction_prompt(text: &str) -> String {
    format!(
        "Extract the following fields from the text and provide them in JSON format: {fields}.\n\
         \n\
         Example:\n\
         Text: \"{example_text}\"\n\
         JSON: {example_json}\n\
         \n\
         Text: \"{text}\"\n\
         JSON:\n",
        fields = FIELD_NAMES.join(", "),
        example_text = EXAMPLE_TEXT,
        example_json = EXAMPLE_JSON,
        text = text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_every_field() {
        let prompt = build_extraction_prompt("anything");
        for field in FIELD_NAMES {
            assert!(prompt.contains(field), "missing {field}");
        }
    }

    #[test]
    fn prompt_ends_with_the_input_text() {
        let prompt = build_extraction_prompt("John is 42 and lives in Germany.");
        assert!(prompt.contains("Text: \"John is 42 and lives in Germany.\"\nJSON:"));
        assert!(prompt.trim_end().ends_with("JSON:"));
    }

    #[test]
    fn example_json_is_valid() {
        let value: serde_json::Value = serde_json::from_str(EXAMPLE_JSON).unwrap();
        assert_eq!(value.as_object().unwrap().len(), FIELD_NAMES.len());
    }
}
