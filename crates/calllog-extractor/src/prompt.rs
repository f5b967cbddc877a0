//! LLM prompt engineering for field extraction

use calllog_domain::{FieldSchema, FieldType};

/// Builds the user prompt asking the LLM to fill a schema from a transcript
pub struct PromptBuilder<'a> {
    transcript: &'a str,
    schema: &'a FieldSchema,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(transcript: &'a str, schema: &'a FieldSchema) -> Self {
        Self { transcript, schema }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. The transcript, fenced so instructions inside it stand out as data
        prompt.push_str("Here is the call transcript:\n");
        prompt.push_str("--- TRANSCRIPT START ---\n");
        prompt.push_str(self.transcript);
        prompt.push_str("\n--- TRANSCRIPT END ---\n\n");

        // 2. One instruction per field
        prompt.push_str("Please analyze the transcript and extract the following information:\n");
        for field in self.schema.fields() {
            prompt.push_str(&format!(
                "- For the field '{}', follow this instruction: {}{}\n",
                field.name,
                field.prompt,
                type_hint(field.field_type)
            ));
        }
        prompt.push('\n');

        // 3. Output shape
        prompt.push_str(
            "Your response must be a single JSON object with the following structure:\n",
        );
        prompt.push_str(&self.json_shape());

        prompt
    }

    /// `{ "a": "...", "b": "..." }` for the schema's fields
    fn json_shape(&self) -> String {
        let keys: Vec<String> = self
            .schema
            .names()
            .map(|name| format!("{}: \"...\"", quote(name)))
            .collect();
        format!("{{ {} }}", keys.join(", "))
    }
}

fn type_hint(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::String => "",
        FieldType::Integer => " (answer with a whole number)",
        FieldType::Float => " (answer with a decimal number)",
    }
}

fn quote(name: &str) -> String {
    serde_json::to_string(name).unwrap_or_else(|_| format!("\"{}\"", name))
}
