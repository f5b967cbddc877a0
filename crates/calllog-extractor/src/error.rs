//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Transcript exceeds maximum length
    #[error("Transcript too long: {0} chars (max: {1})")]
    TextTooLong(usize, usize),

    /// LLM response was not a single JSON object
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
