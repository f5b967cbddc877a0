//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_llm_response;
use crate::prompt::PromptBuilder;
use calllog_domain::traits::{FieldExtractor, LlmProvider};
use calllog_domain::{ExtractedFields, FieldSchema};
use std::fmt::Display;
use tracing::{debug, info};

/// Extracts schema fields from call transcripts with an LLM
pub struct TranscriptExtractor<L>
where
    L: LlmProvider,
{
    llm_provider: L,
    config: ExtractorConfig,
}

impl<L> TranscriptExtractor<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create a new extractor
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Self {
        Self {
            llm_provider,
            config,
        }
    }

    /// Create a new extractor after validating the configuration
    pub fn try_new(llm_provider: L, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        Ok(Self::new(llm_provider, config))
    }

    /// Call the LLM provider
    fn call_llm(&self, prompt: &str) -> Result<String, ExtractorError> {
        let system = &self.config.system_prompt;
        let result = if self.config.json_mode {
            self.llm_provider.generate_json(system, prompt)
        } else {
            self.llm_provider.generate(system, prompt)
        };
        result.map_err(|e| ExtractorError::Llm(e.to_string()))
    }
}

impl<L> FieldExtractor for TranscriptExtractor<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    type Error = ExtractorError;

    fn extract(
        &self,
        transcript: &str,
        schema: &FieldSchema,
    ) -> Result<ExtractedFields, Self::Error> {
        let length = transcript.chars().count();
        if length > self.config.max_text_length {
            return Err(ExtractorError::TextTooLong(length, self.config.max_text_length));
        }

        if schema.is_empty() {
            debug!("Schema has no fields, skipping LLM call");
            return Ok(ExtractedFields::new());
        }

        let prompt = PromptBuilder::new(transcript, schema).build();
        debug!("Prompt length: {} chars", prompt.len());

        let llm_response = self.call_llm(&prompt)?;
        debug!("LLM response length: {} chars", llm_response.len());

        let fields = parse_llm_response(&llm_response, schema)?;
        info!("Extracted {}/{} fields", fields.len(), schema.len());

        Ok(fields)
    }
}
