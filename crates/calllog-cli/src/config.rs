//! Job configuration: schema, template, columns and service settings.

use crate::error::{CliError, Result};
use calllog_crm::{CrmConfig, DEFAULT_REQUEST_DELAY};
use calllog_domain::{FieldSchema, FieldSpec, FieldType};
use calllog_extractor::ExtractorConfig;
use calllog_llm::openrouter::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use calllog_pipeline::{DispatchMode, PipelineConfig, Template};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked for in the working directory
pub const LOCAL_CONFIG_FILE: &str = "calllog.toml";

/// A sync job, as stored in TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// CSV column holding the phone number
    #[serde(default = "default_phone_column")]
    pub phone_column: String,

    /// CSV column holding the transcript
    #[serde(default = "default_transcript_column")]
    pub transcript_column: String,

    /// Inline payload template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Payload template file, relative to this config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_file: Option<PathBuf>,

    /// JSON-escape values substituted into the template
    #[serde(default)]
    pub escape_values: bool,

    /// Which CRM write each row ends in
    #[serde(default)]
    pub dispatch: DispatchMode,

    /// Extraction settings
    #[serde(default)]
    pub llm: LlmSettings,

    /// CRM settings
    #[serde(default)]
    pub crm: CrmSettings,

    /// Output settings
    #[serde(default)]
    pub output: Settings,

    /// Fields to extract, in prompt order
    #[serde(default)]
    pub fields: Vec<FieldSpec>,

    /// Directory of the file this was loaded from
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

/// Extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// OpenRouter model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// OpenRouter API base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Prompt and length limits
    #[serde(flatten)]
    pub extractor: ExtractorConfig,
}

/// CRM settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrmSettings {
    /// Pause before every CRM call, in milliseconds
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl JobConfig {
    /// Fallback configuration path, `~/.calllog/job.toml`.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".calllog").join("job.toml"))
    }

    /// Pick the config file: explicit path, then `./calllog.toml`, then the fallback.
    pub fn locate(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Ok(local);
        }
        Self::default_path()
    }

    /// Load a job configuration from file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::Config(format!(
                "No job configuration at {} (run `calllog init` to create one)",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path)?;
        let mut config: JobConfig = toml::from_str(&contents)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Save the configuration to file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Validated field schema.
    pub fn schema(&self) -> Result<FieldSchema> {
        FieldSchema::new(self.fields.clone())
            .map_err(|e| CliError::Pipeline(e.into()))
    }

    /// Raw template text; `override_path` wins over the configured template.
    pub fn template_text(&self, override_path: Option<&Path>) -> Result<String> {
        if let Some(path) = override_path {
            return read_template(path);
        }
        if let Some(path) = &self.template_file {
            let path = match &self.base_dir {
                Some(dir) if path.is_relative() => dir.join(path),
                _ => path.clone(),
            };
            return read_template(&path);
        }
        self.template
            .clone()
            .ok_or_else(|| CliError::Config("No template or template_file configured".into()))
    }

    /// Validated, immutable configuration for the pipeline.
    pub fn to_pipeline_config(&self, template_override: Option<&Path>) -> Result<PipelineConfig> {
        let template = Template::parse(self.template_text(template_override)?)
            .map_err(|e| CliError::Pipeline(e.into()))?
            .with_json_escaping(self.escape_values);

        Ok(PipelineConfig::new(
            self.schema()?,
            template,
            self.phone_column.clone(),
            self.transcript_column.clone(),
            self.dispatch,
        )?)
    }

    /// Configuration written by `calllog init`.
    ///
    /// The starter template embeds the raw transcript in a JSON string, so
    /// values are escaped; literal substitution stays the default for files
    /// that leave `escape_values` out.
    pub fn starter() -> Self {
        Self {
            escape_values: true,
            ..Self::default()
        }
    }

    /// CRM client settings for the given credentials.
    pub fn crm_config(&self, host: &str, access_key: &str, secret_key: &str) -> CrmConfig {
        let config = CrmConfig::new(host, access_key, secret_key)
            .with_request_delay(Duration::from_millis(self.crm.request_delay_ms));
        match self.crm.timeout_secs {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

fn read_template(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        CliError::Config(format!("Failed to read template {}: {}", path.display(), e))
    })
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            phone_column: default_phone_column(),
            transcript_column: default_transcript_column(),
            template: Some(DEFAULT_ACTIVITY_TEMPLATE.to_string()),
            template_file: None,
            escape_values: false,
            dispatch: DispatchMode::default(),
            llm: LlmSettings::default(),
            crm: CrmSettings::default(),
            output: Settings::default(),
            fields: default_fields(),
            base_dir: None,
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: None,
            extractor: ExtractorConfig::default(),
        }
    }
}

impl Default for CrmSettings {
    fn default() -> Self {
        Self {
            request_delay_ms: default_request_delay_ms(),
            timeout_secs: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_phone_column() -> String {
    "PhoneNumber".to_string()
}

fn default_transcript_column() -> String {
    "Transcript".to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_request_delay_ms() -> u64 {
    DEFAULT_REQUEST_DELAY.as_millis() as u64
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

/// Activity template written by `calllog init`
pub const DEFAULT_ACTIVITY_TEMPLATE: &str = r#"[
  {"SchemaName": "mx_Custom_2", "Value": "{{call_outcome}}"},
  {"SchemaName": "mx_Custom_4", "Value": "", "Fields": [
    {"SchemaName": "mx_CustomObject_121", "Value": "{{call_summary}}"}
  ]},
  {"SchemaName": "mx_Custom_3", "Value": "{{recordingUrl}}"},
  {"SchemaName": "mx_Custom_1", "Value": "", "Fields": [
    {"SchemaName": "mx_CustomObject_121", "Value": "{{Transcript}}"}
  ]},
  {"SchemaName": "Status", "Value": "Active"},
  {"SchemaName": "mx_Custom_5", "Value": "{{lead_stage}}"},
  {"SchemaName": "mx_Custom_6", "Value": "{{customer_goal}}"},
  {"SchemaName": "mx_Custom_7", "Value": "{{objections}}"},
  {"SchemaName": "mx_Custom_8", "Value": "{{next_step}}"},
  {"SchemaName": "mx_Custom_9", "Value": "{{rapport_hooks}}"},
  {"SchemaName": "mx_Custom_10", "Value": "{{call_sentiment}}"},
  {"SchemaName": "mx_Custom_11", "Value": "{{ai_performance_score}}"},
  {"SchemaName": "mx_Custom_12", "Value": "{{talk_to_listen_ratio}}"},
  {"SchemaName": "mx_Custom_13", "Value": "Answered"},
  {"SchemaName": "mx_Custom_14", "Value": "Tool Test"}
]
"#;

/// Call-analysis schema written by `calllog init`
fn default_fields() -> Vec<FieldSpec> {
    let string = |name: &str, prompt: &str| FieldSpec::new(name, prompt, FieldType::String);
    vec![
        string(
            "call_outcome",
            "Analyze the transcript to determine the final outcome. You must select ONLY ONE of \
             the following: Confirmed for Tomorrow's Workshop, Confirmed for Sunday's Workshop, \
             Already Attended, Requested Recording, Declined Both, Wrong Number / Ineligible, \
             Voicemail / No Answer.",
        ),
        string(
            "call_summary",
            "Write a concise call summary, strictly under 120 words, for a human agent to review. \
             The summary must include: 1. The reason they couldn't attend. 2. What they were \
             hoping to gain. 3. How the agent responded. 4. The agreed next step.",
        ),
        string(
            "lead_stage",
            "Based on the call transcript, classify the lead into ONLY ONE of the following \
             stages: Appointment_Booked/Call_Scheduled, Call Again Later, In Pipeline, \
             Closed Not Interested, DNP, Promised To Pay.",
        ),
        string(
            "customer_goal",
            "Identify the participant's primary goal or motivation for registering for the \
             workshop. List them as a concise, comma-separated string.",
        ),
        string(
            "objections",
            "Identify all objections or concerns raised by the customer during the call. List \
             them as a concise, comma-separated string.",
        ),
        string(
            "next_step",
            "Summarize the single clear next action agreed upon at the end of the call in one \
             short sentence.",
        ),
        string(
            "rapport_hooks",
            "Extract any personal or professional details mentioned that a human agent could use \
             to build rapport on future outreach. List them as a comma-separated string.",
        ),
        string(
            "call_sentiment",
            "Classify the participant's overall tone as Positive, Neutral, or Negative. Select \
             only one.",
        ),
        FieldSpec::new(
            "ai_performance_score",
            "Rate the AI agent's performance on a scale of 1 to 10. Provide only the final \
             numeric score.",
            FieldType::Integer,
        ),
        FieldSpec::new(
            "talk_to_listen_ratio",
            "Express the agent's speaking time versus the participant's as a decimal (e.g., 0.4 \
             means the agent spoke for 40% of the call).",
            FieldType::Float,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = JobConfig::default();
        let pipeline = config.to_pipeline_config(None).unwrap();

        assert_eq!(pipeline.schema.len(), 10);
        assert_eq!(pipeline.mode, DispatchMode::PostActivity { event_code: 227 });
        assert!(pipeline.template.placeholders().contains(&"recordingUrl"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("job.toml");

        JobConfig::default().save(&path).unwrap();
        let loaded = JobConfig::load(&path).unwrap();

        assert_eq!(loaded.fields.len(), 10);
        assert_eq!(loaded.fields[8].field_type, FieldType::Integer);
        assert_eq!(loaded.dispatch, DispatchMode::PostActivity { event_code: 227 });
        assert_eq!(loaded.llm.model, DEFAULT_MODEL);
        assert_eq!(loaded.crm.request_delay_ms, 200);
        assert!(loaded.to_pipeline_config(None).is_ok());
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: JobConfig = toml::from_str(
            r#"
            template = '[{"Attribute": "mx_Stage", "Value": "{{stage}}"}]'

            [dispatch]
            mode = "update"

            [[fields]]
            name = "stage"
            prompt = "Lead stage."
            "#,
        )
        .unwrap();

        assert_eq!(config.phone_column, "PhoneNumber");
        assert_eq!(config.transcript_column, "Transcript");
        assert!(!config.escape_values);
        assert_eq!(config.dispatch, DispatchMode::UpdateLead);
        assert_eq!(config.fields[0].field_type, FieldType::String);
        assert_eq!(config.llm.extractor.max_text_length, 50_000);
        assert_eq!(config.output.format, OutputFormat::Table);
    }

    #[test]
    fn test_template_file_relative_to_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("payload.json"), r#"[{"Attribute": "a", "Value": "{{x}}"}]"#)
            .unwrap();
        let path = dir.path().join("job.toml");
        fs::write(
            &path,
            "template_file = \"payload.json\"\n[dispatch]\nmode = \"update\"\n",
        )
        .unwrap();

        let config = JobConfig::load(&path).unwrap();
        assert!(config.template_text(None).unwrap().contains("{{x}}"));
    }

    #[test]
    fn test_template_override_wins() {
        let dir = TempDir::new().unwrap();
        let override_path = dir.path().join("other.json");
        fs::write(&override_path, "[]").unwrap();

        let config = JobConfig::default();
        assert_eq!(config.template_text(Some(&override_path)).unwrap(), "[]");
    }

    #[test]
    fn test_invalid_template_is_fatal() {
        let config = JobConfig {
            template: Some(r#"[{"Value": {{score}}}]"#.to_string()),
            ..JobConfig::default()
        };
        assert!(matches!(config.to_pipeline_config(None), Err(CliError::Pipeline(_))));
    }

    #[test]
    fn test_duplicate_field_names_are_fatal() {
        let mut config = JobConfig::default();
        config.fields.push(FieldSpec::new("call_outcome", "again", FieldType::String));
        assert!(matches!(config.schema(), Err(CliError::Pipeline(_))));
    }

    #[test]
    fn test_missing_file_mentions_init() {
        let dir = TempDir::new().unwrap();
        let err = JobConfig::load(&dir.path().join("none.toml")).unwrap_err();
        assert!(err.to_string().contains("calllog init"));
    }

    #[test]
    fn test_crm_config_uses_settings() {
        let mut config = JobConfig::default();
        config.crm.request_delay_ms = 0;
        config.crm.timeout_secs = Some(5);

        let crm = config.crm_config("https://api.example.com", "a", "s");
        assert!(crm.request_delay.is_zero());
        assert_eq!(crm.timeout, Some(Duration::from_secs(5)));
    }
}
