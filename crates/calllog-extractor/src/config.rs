//! Configuration for the Extractor

use serde::{Deserialize, Serialize};

/// System prompt sent with every extraction request
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert AI assistant for call analysis. \
Your task is to analyze the provided call transcript and extract specific information based on \
the instructions. You must respond ONLY with a single, valid JSON object. Do not include any \
introductory text, explanations, or markdown formatting like ```json.";

/// Configuration for the Extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Maximum transcript length (characters)
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,

    /// Ask the provider for JSON-constrained output
    #[serde(default = "default_json_mode")]
    pub json_mode: bool,

    /// System prompt framing the extraction task
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_text_length == 0 {
            return Err("max_text_length must be greater than 0".to_string());
        }
        if self.system_prompt.trim().is_empty() {
            return Err("system_prompt must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_text_length: default_max_text_length(),
            json_mode: default_json_mode(),
            system_prompt: default_system_prompt(),
        }
    }
}

fn default_max_text_length() -> usize {
    50_000
}

fn default_json_mode() -> bool {
    true
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}
