//! Error types for batch setup

use crate::template::TemplateError;
use calllog_domain::SchemaError;
use thiserror::Error;

/// Errors that stop a batch before any row is processed
///
/// Row-level failures never surface here; they become outcome log entries.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The template failed validation
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// The field schema failed validation
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}
