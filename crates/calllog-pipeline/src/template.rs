//! Template engine: `{{name}}` substitution followed by a JSON parse
//!
//! Substitution is a single left-to-right pass over the template text. Every
//! complete `{{name}}` span is looked up in the value table as a whole token,
//! so a key `id` never touches `{{identifier}}`, and inserted text is never
//! rescanned, so a value that itself contains `{{x}}` stays literal.
//! Placeholders naming no known key are left as they are.
//!
//! Values are inserted as plain text. The engine does no type-aware quoting:
//! the template author decides whether a placeholder sits inside a JSON string.

use regex::{Captures, Regex};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("placeholder pattern is valid"));

/// Errors raised while validating or rendering a template
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template itself is not valid JSON (checked before any row runs)
    #[error("template is not valid JSON: {0}")]
    Invalid(#[source] serde_json::Error),

    /// The template parses, but not to an object or array
    #[error("template must be a JSON object or array")]
    NotStructured,

    /// The substituted text for a row is not valid JSON
    #[error("row {row}: rendered template is not valid JSON: {source}")]
    Render {
        /// Zero-based row index
        row: usize,
        /// Raw parse error
        #[source]
        source: serde_json::Error,
    },

    /// The substituted text for a row parses, but not to an object or array
    #[error("row {row}: rendered template is not a JSON object or array")]
    RenderedNotStructured {
        /// Zero-based row index
        row: usize,
    },
}

/// Replace every `{{key}}` whose key is in `values`, in one pass
///
/// Returns the input unchanged (borrowed) when it has no placeholders.
///
/// # Examples
///
/// ```
/// use calllog_pipeline::template::substitute;
/// use std::collections::HashMap;
///
/// let values = HashMap::from([
///     ("a".to_string(), "1".to_string()),
///     ("b".to_string(), "2".to_string()),
/// ]);
/// assert_eq!(substitute("{{a}}{{b}}{{ab}}", &values), "12{{ab}}");
/// ```
pub fn substitute<'t>(template: &'t str, values: &HashMap<String, String>) -> Cow<'t, str> {
    PLACEHOLDER.replace_all(template, |caps: &Captures| match values.get(&caps[1]) {
        Some(value) => value.clone(),
        None => caps[0].to_string(),
    })
}

/// Like [`substitute`], escaping each value for use inside a JSON string
pub fn substitute_json_escaped<'t>(
    template: &'t str,
    values: &HashMap<String, String>,
) -> Cow<'t, str> {
    PLACEHOLDER.replace_all(template, |caps: &Captures| match values.get(&caps[1]) {
        Some(value) => escape_json_text(value),
        None => caps[0].to_string(),
    })
}

/// JSON string escaping without the surrounding quotes
fn escape_json_text(value: &str) -> String {
    let quoted = Value::String(value.to_string()).to_string();
    quoted[1..quoted.len() - 1].to_string()
}

/// A validated JSON template
///
/// Construction checks that the raw text is a JSON object or array, so a
/// broken template is caught before any row is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    escape_values: bool,
}

impl Template {
    /// Validate and wrap template text
    ///
    /// # Errors
    /// Returns `Invalid` if the text is not JSON, `NotStructured` if it is a scalar
    pub fn parse(source: impl Into<String>) -> Result<Self, TemplateError> {
        let source = source.into();
        let document: Value = serde_json::from_str(&source).map_err(TemplateError::Invalid)?;
        if !is_structured(&document) {
            return Err(TemplateError::NotStructured);
        }
        Ok(Self {
            source,
            escape_values: false,
        })
    }

    /// Escape substituted values for JSON string context
    ///
    /// Off by default: values are inserted verbatim, and a value containing a
    /// quote or newline makes that row's render fail.
    pub fn with_json_escaping(mut self, escape_values: bool) -> Self {
        self.escape_values = escape_values;
        self
    }

    /// Distinct placeholder names, in order of first appearance
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for caps in PLACEHOLDER.captures_iter(&self.source) {
            if let Some(name) = caps.get(1).map(|m| m.as_str()) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Substitute values into the template text
    pub fn substitute(&self, values: &HashMap<String, String>) -> String {
        if self.escape_values {
            substitute_json_escaped(&self.source, values).into_owned()
        } else {
            substitute(&self.source, values).into_owned()
        }
    }

    /// Substitute values for one row and parse the result
    ///
    /// # Errors
    /// Returns `Render` or `RenderedNotStructured` carrying the row index
    pub fn render(
        &self,
        row: usize,
        values: &HashMap<String, String>,
    ) -> Result<Value, TemplateError> {
        let text = self.substitute(values);
        let document: Value =
            serde_json::from_str(&text).map_err(|source| TemplateError::Render { row, source })?;
        if !is_structured(&document) {
            return Err(TemplateError::RenderedNotStructured { row });
        }
        Ok(document)
    }
}

fn is_structured(document: &Value) -> bool {
    document.is_object() || document.is_array()
}
