//! Schema module - user-defined extraction targets and their types

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Declared type of an extracted field
///
/// Drives coercion after extraction:
/// - String: kept verbatim
/// - Integer: digits only, parsed as i64
/// - Float: digits and decimal point only, parsed as f64
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free text
    #[default]
    String,

    /// Whole number
    Integer,

    /// Decimal number
    Float,
}

impl FieldType {
    /// Get the type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
        }
    }

    /// Parse a type name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "string" => Some(FieldType::String),
            "integer" => Some(FieldType::Integer),
            "float" => Some(FieldType::Float),
            _ => None,
        }
    }

    /// Coerce a raw extracted value to this type's textual form
    ///
    /// Everything that is not a digit (or, for floats, the decimal point) is
    /// stripped before parsing, so `"about 42%"` becomes `42`. A value that
    /// reduces to nothing, or does not parse, is an error rather than zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use calllog_domain::FieldType;
    ///
    /// assert_eq!(FieldType::Integer.coerce("about 42%").unwrap(), "42");
    /// assert_eq!(FieldType::Float.coerce("3.14 approx").unwrap(), "3.14");
    /// assert!(FieldType::Integer.coerce("none").is_err());
    /// ```
    pub fn coerce(&self, raw: &str) -> Result<String, CoercionError> {
        let fail = || CoercionError {
            field_type: *self,
            raw: raw.to_string(),
        };

        match self {
            FieldType::String => Ok(raw.to_string()),
            FieldType::Integer => {
                let cleaned: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
                cleaned
                    .parse::<i64>()
                    .map(|n| n.to_string())
                    .map_err(|_| fail())
            }
            FieldType::Float => {
                let cleaned: String = raw
                    .chars()
                    .filter(|c| c.is_ascii_digit() || *c == '.')
                    .collect();
                match cleaned.parse::<f64>() {
                    Ok(n) if n.is_finite() => Ok(n.to_string()),
                    _ => Err(fail()),
                }
            }
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value that could not be reduced to its declared numeric type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not coerce '{raw}' to {field_type}")]
pub struct CoercionError {
    /// Declared type of the field
    pub field_type: FieldType,

    /// The value as returned by extraction
    pub raw: String,
}

/// One user-defined extraction target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name; also the placeholder name in templates
    pub name: String,

    /// Instruction given to the model for this field
    #[serde(alias = "instruction")]
    pub prompt: String,

    /// Expected type of the extracted value
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
}

impl FieldSpec {
    /// Create a new field spec
    pub fn new(name: impl Into<String>, prompt: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.into(),
            field_type,
        }
    }
}

/// Errors in a schema definition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A field has an empty name
    #[error("field #{0} has an empty name")]
    EmptyName(usize),

    /// Two fields share a name
    #[error("duplicate field name '{0}'")]
    DuplicateName(String),
}

/// Ordered, validated collection of field specs
///
/// Names are non-empty and unique, so merging extraction results into a row
/// is never ambiguous. Order only affects prompt and column layout.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct FieldSchema {
    fields: Vec<FieldSpec>,
}

impl FieldSchema {
    /// Build a schema, validating field names
    ///
    /// # Errors
    /// Returns error if a name is blank or appears twice
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        for (idx, field) in fields.iter().enumerate() {
            if field.name.trim().is_empty() {
                return Err(SchemaError::EmptyName(idx));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateName(field.name.clone()));
            }
        }
        Ok(Self { fields })
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether the schema names this field
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Field names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'de> Deserialize<'de> for FieldSchema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let fields = Vec::<FieldSpec>::deserialize(deserializer)?;
        FieldSchema::new(fields).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_coercion_strips_noise() {
        assert_eq!(FieldType::Integer.coerce("about 42%").unwrap(), "42");
        assert_eq!(FieldType::Integer.coerce("Score: 8/10").unwrap(), "810");
        assert_eq!(FieldType::Integer.coerce(" 7 ").unwrap(), "7");
    }

    #[test]
    fn test_float_coercion() {
        assert_eq!(FieldType::Float.coerce("3.14 approx").unwrap(), "3.14");
        assert_eq!(FieldType::Float.coerce("0.4").unwrap(), "0.4");
        assert_eq!(FieldType::Float.coerce("ratio ~ .5").unwrap(), "0.5");
    }

    #[test]
    fn test_coercion_without_digits_is_error_not_zero() {
        let err = FieldType::Integer.coerce("no idea").unwrap_err();
        assert_eq!(err.field_type, FieldType::Integer);
        assert_eq!(err.raw, "no idea");

        assert!(FieldType::Float.coerce("").is_err());
        assert!(FieldType::Float.coerce("1.2.3").is_err());
    }

    #[test]
    fn test_string_coercion_is_identity() {
        assert_eq!(FieldType::String.coerce("about 42%").unwrap(), "about 42%");
    }

    #[test]
    fn test_field_type_parse() {
        assert_eq!(FieldType::parse("Integer"), Some(FieldType::Integer));
        assert_eq!(FieldType::parse("FLOAT"), Some(FieldType::Float));
        assert_eq!(FieldType::parse("date"), None);
    }

    #[test]
    fn test_schema_rejects_duplicates() {
        let result = FieldSchema::new(vec![
            FieldSpec::new("outcome", "a", FieldType::String),
            FieldSpec::new("outcome", "b", FieldType::String),
        ]);
        assert_eq!(result, Err(SchemaError::DuplicateName("outcome".to_string())));
    }

    #[test]
    fn test_schema_rejects_blank_name() {
        let result = FieldSchema::new(vec![
            FieldSpec::new("outcome", "a", FieldType::String),
            FieldSpec::new("  ", "b", FieldType::String),
        ]);
        assert_eq!(result, Err(SchemaError::EmptyName(1)));
    }

    #[test]
    fn test_schema_deserialize_validates() {
        let ok: FieldSchema = serde_json::from_str(
            r#"[{"name": "score", "prompt": "Rate 1-10", "type": "integer"},
                {"name": "summary", "instruction": "Summarize"}]"#,
        )
        .unwrap();
        assert_eq!(ok.len(), 2);
        assert_eq!(ok.get("score").unwrap().field_type, FieldType::Integer);
        assert_eq!(ok.get("summary").unwrap().field_type, FieldType::String);

        let dup: Result<FieldSchema, _> = serde_json::from_str(
            r#"[{"name": "a", "prompt": ""}, {"name": "a", "prompt": ""}]"#,
        );
        assert!(dup.is_err());
    }
}
