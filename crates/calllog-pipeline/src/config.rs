//! Immutable configuration for one batch run

use crate::dispatch::DispatchMode;
use crate::error::PipelineError;
use crate::template::Template;
use calllog_domain::FieldSchema;

/// Everything the pipeline needs to know about a job
///
/// Built once before the batch starts and never mutated while rows run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Fields to extract from each transcript
    pub schema: FieldSchema,

    /// Validated payload template
    pub template: Template,

    /// CSV column holding the lead's phone number
    pub phone_column: String,

    /// CSV column holding the call transcript
    pub transcript_column: String,

    /// Which CRM write each row ends in
    pub mode: DispatchMode,
}

impl PipelineConfig {
    /// Create a validated configuration
    ///
    /// # Errors
    /// Returns `Config` if a column name is blank
    pub fn new(
        schema: FieldSchema,
        template: Template,
        phone_column: impl Into<String>,
        transcript_column: impl Into<String>,
        mode: DispatchMode,
    ) -> Result<Self, PipelineError> {
        let config = Self {
            schema,
            template,
            phone_column: phone_column.into(),
            transcript_column: transcript_column.into(),
            mode,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check column names
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.phone_column.trim().is_empty() {
            return Err(PipelineError::Config(
                "phone_column must not be empty".to_string(),
            ));
        }
        if self.transcript_column.trim().is_empty() {
            return Err(PipelineError::Config(
                "transcript_column must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
