//! Calllog Domain Layer
//!
//! This crate contains the core data model for syncing analyzed call logs into
//! a CRM. It defines the value objects shared by every other crate and the
//! trait interfaces for the external collaborators (LLM, extractor, CRM).
//!
//! ## Key Concepts
//!
//! - **FieldSpec / FieldSchema**: what to extract from a transcript, and as which type
//! - **ExtendedRow**: a CSV row plus the values extracted for it
//! - **OutcomeLogEntry**: how far a single row progressed and why it stopped
//! - **Payloads**: the lead-update and activity forms sent to the CRM
//!
//! ## Architecture
//!
//! - No I/O and no HTTP in this crate
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod job;
pub mod outcome;
pub mod payload;
pub mod row;
pub mod schema;
pub mod traits;

// Re-exports for convenience
pub use job::JobId;
pub use outcome::{OutcomeLogEntry, OutcomeStatus};
pub use payload::{ActivityField, ActivityPayload, AttributePair, LeadId};
pub use row::{ExtendedRow, Row};
pub use traits::{CrmClient, ExtractedFields, FieldExtractor, LlmProvider};
pub use schema::{CoercionError, FieldSchema, FieldSpec, FieldType, SchemaError};
