//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
///
/// All of these stop the run before the first row; failures of individual
/// rows are reported in the outcome log instead.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Schema or template failed validation
    #[error(transparent)]
    Pipeline(#[from] calllog_pipeline::PipelineError),

    /// LLM provider could not be set up
    #[error("LLM error: {0}")]
    Llm(#[from] calllog_llm::LlmError),

    /// CRM client could not be set up
    #[error("CRM error: {0}")]
    Crm(#[from] calllog_crm::CrmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File-level failure with context attached
    #[error("{0:#}")]
    File(#[from] anyhow::Error),
}
