//! Parse LLM output into extracted field values

use crate::error::ExtractorError;
use calllog_domain::{ExtractedFields, FieldSchema};
use serde_json::Value;
use tracing::{debug, warn};

/// Parse an LLM response into values for the schema's fields
///
/// The response must hold exactly one JSON object. Keys the schema does not
/// name are dropped; fields the model left out are simply absent.
pub fn parse_llm_response(
    response: &str,
    schema: &FieldSchema,
) -> Result<ExtractedFields, ExtractorError> {
    // LLMs sometimes wrap JSON in markdown code blocks
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| ExtractorError::InvalidFormat(format!("JSON parse error: {}", e)))?;

    let object = match json {
        Value::Object(object) => object,
        other => {
            return Err(ExtractorError::InvalidFormat(format!(
                "Expected JSON object, got {}",
                json_kind(&other)
            )))
        }
    };

    let mut fields = ExtractedFields::new();
    for (key, value) in object {
        if !schema.contains(&key) {
            debug!("Ignoring key '{}' not named by the schema", key);
            continue;
        }
        fields.insert(key, value_to_text(value));
    }

    let missing: Vec<&str> = schema.names().filter(|n| !fields.contains_key(*n)).collect();
    if !missing.is_empty() {
        warn!("LLM response omitted fields: {}", missing.join(", "));
    }

    Ok(fields)
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<String, ExtractorError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(ExtractorError::InvalidFormat("Empty code block".to_string()));
        }

        // Skip the opening fence, and the closing one if present
        let end = if lines[lines.len() - 1].trim_start().starts_with("```") {
            lines.len() - 1
        } else {
            lines.len()
        };
        Ok(lines[1..end].join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Textual form of an extracted value; `None` for JSON null
fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) if items.iter().all(Value::is_string) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => Some(other.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
