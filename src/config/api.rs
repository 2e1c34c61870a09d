//! Public API metadata

use serde::Deserialize;

/// Name and description reported by the root and docs endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_description")]
    pub description: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            description: default_description(),
        }
    }
}

fn default_name() -> String {
    "Churn-Detection-Model".to_string()
}

fn default_description() -> String {
    "Churn Detection Model API".to_string()
}
