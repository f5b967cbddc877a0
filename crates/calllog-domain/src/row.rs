//! Row module - CSV rows and their extraction results

use crate::schema::FieldSchema;
use std::collections::HashMap;

/// A CSV row: column name to raw text
pub type Row = HashMap<String, String>;

/// A CSV row extended with extracted field values
///
/// Keeps the original columns and the extraction results apart. Lookups give
/// extraction precedence: a schema field that collides with a CSV column
/// overwrites it, even when the extracted value ended up unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtendedRow {
    base: Row,
    extracted: HashMap<String, Option<String>>,
}

impl ExtendedRow {
    /// Wrap a CSV row with no extraction results yet
    pub fn new(base: Row) -> Self {
        Self {
            base,
            extracted: HashMap::new(),
        }
    }

    /// Original CSV columns
    pub fn base(&self) -> &Row {
        &self.base
    }

    /// Extracted values; `None` marks a field that is present but unset
    pub fn extracted(&self) -> &HashMap<String, Option<String>> {
        &self.extracted
    }

    /// Record an extracted value (or an unset field) under `name`
    pub fn set_extracted(&mut self, name: impl Into<String>, value: Option<String>) {
        self.extracted.insert(name.into(), value);
    }

    /// Value of a column or field, extraction first
    ///
    /// Returns `None` when the name is unknown or the extracted field is unset.
    pub fn get(&self, name: &str) -> Option<&str> {
        match self.extracted.get(name) {
            Some(value) => value.as_deref(),
            None => self.base.get(name).map(String::as_str),
        }
    }

    /// Trimmed, non-empty value of a column, if any
    pub fn non_blank(&self, name: &str) -> Option<&str> {
        self.get(name).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Flatten into the value table used for template substitution
    ///
    /// Base columns first, then extracted values on top (unset becomes empty
    /// text). Schema fields that appear nowhere render as empty text too, so a
    /// row whose extraction was skipped never leaks raw placeholders.
    pub fn values(&self, schema: &FieldSchema) -> HashMap<String, String> {
        let mut values = self.base.clone();
        for (name, value) in &self.extracted {
            values.insert(name.clone(), value.clone().unwrap_or_default());
        }
        for name in schema.names() {
            values.entry(name.to_string()).or_default();
        }
        values
    }
}
