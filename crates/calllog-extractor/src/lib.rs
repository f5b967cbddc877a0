//! Calllog Extractor
//!
//! Turns a call transcript into the structured fields named by a
//! [`FieldSchema`](calllog_domain::FieldSchema), using an LLM.
//!
//! # Architecture
//!
//! ```text
//! Transcript + FieldSchema → PromptBuilder → LLM (JSON mode) → parser → ExtractedFields
//! ```
//!
//! The model is asked for exactly one JSON object whose keys are the schema's
//! field names. Anything else (prose, arrays, unparseable text, transport
//! errors) is an extraction failure. Keys the schema does not name are dropped.
//!
//! # Example Usage
//!
//! ```
//! use calllog_domain::{FieldExtractor, FieldSchema, FieldSpec, FieldType};
//! use calllog_extractor::{ExtractorConfig, TranscriptExtractor};
//! use calllog_llm::MockProvider;
//!
//! let schema = FieldSchema::new(vec![
//!     FieldSpec::new("sentiment", "positive, neutral or negative", FieldType::String),
//! ]).unwrap();
//!
//! let llm = MockProvider::new(r#"{"sentiment": "positive"}"#);
//! let extractor = TranscriptExtractor::new(llm, ExtractorConfig::default());
//!
//! let fields = extractor.extract("Customer: this is great!", &schema).unwrap();
//! assert_eq!(fields["sentiment"].as_deref(), Some("positive"));
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod prompt;


pub use config::{ExtractorConfig, DEFAULT_SYSTEM_PROMPT};
pub use error::ExtractorError;
pub use extractor::TranscriptExtractor;
pub use parser::parse_llm_response;
pub use prompt::PromptBuilder;
