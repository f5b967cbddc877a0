//! CRM payload types
//!
//! Field names follow the CRM's wire format (PascalCase), so a rendered
//! template can be deserialized straight into these types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Internal CRM identifier of a lead, resolved from a phone number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId(String);

impl LeadId {
    /// Wrap a raw identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One attribute/value pair of a lead update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributePair {
    /// Lead attribute schema name
    #[serde(rename = "Attribute")]
    pub attribute: String,

    /// New value
    #[serde(rename = "Value")]
    pub value: Value,
}

impl AttributePair {
    /// Create a pair with a string value
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: Value::String(value.into()),
        }
    }

    /// Read an ordered update list from a rendered document
    ///
    /// # Errors
    /// Returns error unless the document is an array of `{Attribute, Value}` objects
    pub fn list_from_document(document: Value) -> Result<Vec<Self>, serde_json::Error> {
        serde_json::from_value(document)
    }
}

/// One field of an activity, optionally with nested fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityField {
    /// Activity field schema name
    #[serde(rename = "SchemaName")]
    pub schema_name: String,

    /// Field value
    #[serde(rename = "Value", default)]
    pub value: Value,

    /// Nested fields of a custom-object field
    #[serde(rename = "Fields", default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<ActivityField>>,
}

/// Activity to post against a lead
///
/// The CRM client adds the related lead id and a timestamp on transmission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityPayload {
    /// Activity event code configured in the CRM
    #[serde(rename = "ActivityEvent")]
    pub event_code: i64,

    /// Activity fields in template order
    #[serde(rename = "Fields")]
    pub fields: Vec<ActivityField>,
}

impl ActivityPayload {
    /// Build an activity from a rendered document holding its field list
    ///
    /// # Errors
    /// Returns error unless the document is an array of `{SchemaName, Value, Fields?}` objects
    pub fn from_document(event_code: i64, document: Value) -> Result<Self, serde_json::Error> {
        Ok(Self {
            event_code,
            fields: serde_json::from_value(document)?,
        })
    }
}
