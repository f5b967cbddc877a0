//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the record pipeline and the
//! services it talks to. Implementations live in other crates.

use crate::payload::{ActivityPayload, AttributePair, LeadId};
use crate::schema::FieldSchema;
use std::collections::HashMap;

/// Raw extraction results: field name to text, `None` where the model gave null
pub type ExtractedFields = HashMap<String, Option<String>>;

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (calllog-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a completion for a system instruction and a user prompt
    fn generate(&self, system: &str, prompt: &str) -> Result<String, Self::Error>;

    /// Generate a completion constrained to a single JSON object (if supported)
    fn generate_json(&self, system: &str, prompt: &str) -> Result<String, Self::Error>;
}

/// Trait for extracting schema fields from a transcript
///
/// Implemented by the application layer (calllog-extractor)
pub trait FieldExtractor {
    /// Error type for extraction operations
    type Error;

    /// Extract the fields named by `schema` from free text
    ///
    /// Only keys named by the schema may appear in the result.
    fn extract(
        &self,
        transcript: &str,
        schema: &FieldSchema,
    ) -> Result<ExtractedFields, Self::Error>;
}

/// Trait for the CRM backend: phone lookup, lead update, activity creation
///
/// Implemented by the infrastructure layer (calllog-crm). Write calls report
/// success only when the CRM says so explicitly, not merely on HTTP 200.
pub trait CrmClient {
    /// Error type for CRM operations
    type Error;

    /// Resolve a phone number to a lead id (exact match)
    fn lookup_by_phone(&self, phone: &str) -> Result<LeadId, Self::Error>;

    /// Apply attribute updates to a lead, returning the success message
    fn update_lead(
        &self,
        lead: &LeadId,
        attributes: &[AttributePair],
    ) -> Result<String, Self::Error>;

    /// Create an activity on a lead, returning the success message
    fn create_activity(
        &self,
        lead: &LeadId,
        activity: &ActivityPayload,
    ) -> Result<String, Self::Error>;
}

impl<T: FieldExtractor + ?Sized> FieldExtractor for &T {
    type Error = T::Error;

    fn extract(
        &self,
        transcript: &str,
        schema: &FieldSchema,
    ) -> Result<ExtractedFields, Self::Error> {
        (**self).extract(transcript, schema)
    }
}

impl<T: CrmClient + ?Sized> CrmClient for &T {
    type Error = T::Error;

    fn lookup_by_phone(&self, phone: &str) -> Result<LeadId, Self::Error> {
        (**self).lookup_by_phone(phone)
    }

    fn update_lead(
        &self,
        lead: &LeadId,
        attributes: &[AttributePair],
    ) -> Result<String, Self::Error> {
        (**self).update_lead(lead, attributes)
    }

    fn create_activity(
        &self,
        lead: &LeadId,
        activity: &ActivityPayload,
    ) -> Result<String, Self::Error> {
        (**self).create_activity(lead, activity)
    }
}
