//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use calllog_domain::{OutcomeLogEntry, OutcomeStatus};
use calllog_pipeline::{BatchReport, PipelineConfig};
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// The format in use.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format the result of a batch run.
    pub fn format_report(&self, report: &BatchReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_report_json(report),
            OutputFormat::Table => Ok(self.format_report_table(report)),
            OutputFormat::Quiet => Ok(format!("{} {}", report.succeeded(), report.failed())),
        }
    }

    fn format_report_json(&self, report: &BatchReport) -> Result<String> {
        let json = serde_json::json!({
            "job_id": report.job_id,
            "total": report.total(),
            "succeeded": report.succeeded(),
            "failed": report.failed(),
            "by_status": report.by_status(),
            "elapsed_secs": report.elapsed.as_secs_f64(),
            "outcomes": report.outcomes,
        });
        Ok(serde_json::to_string_pretty(&json)?)
    }

    fn format_report_table(&self, report: &BatchReport) -> String {
        if report.outcomes.is_empty() {
            return self.colorize("No rows processed.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Row", "Phone", "Status", "Message"]);

        for outcome in &report.outcomes {
            let mut message = outcome.message.clone();
            if !outcome.notes.is_empty() {
                message.push_str(&format!(" (notes: {})", outcome.notes.join("; ")));
            }
            builder.push_record([
                outcome.line_number().to_string(),
                outcome.phone.clone().unwrap_or_else(|| "-".to_string()),
                self.status(outcome.status),
                message,
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let summary = format!(
            "Job {}: {} row(s), {} succeeded, {} failed in {:.1}s",
            report.job_id,
            report.total(),
            report.succeeded(),
            report.failed(),
            report.elapsed.as_secs_f64()
        );
        let summary = if report.failed() == 0 {
            self.success(&summary)
        } else {
            self.warning(&summary)
        };

        format!("{}\n{}", table, summary)
    }

    /// One progress line for a finished row.
    pub fn outcome_line(&self, outcome: &OutcomeLogEntry) -> String {
        if outcome.status.is_success() {
            self.success(&outcome.log_line())
        } else {
            self.error(&outcome.log_line())
        }
    }

    /// Describe a validated job.
    pub fn format_job(&self, config: &PipelineConfig) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "phone_column": config.phone_column,
                    "transcript_column": config.transcript_column,
                    "dispatch": config.mode,
                    "fields": config.schema,
                    "placeholders": config.template.placeholders(),
                });
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Quiet => Ok(String::new()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Type", "Prompt"]);
                for field in config.schema.fields() {
                    builder.push_record([
                        field.name.clone(),
                        field.field_type.to_string(),
                        truncate(&field.prompt, 60),
                    ]);
                }
                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));

                Ok(format!(
                    "{}\nPlaceholders: {}",
                    table,
                    config.template.placeholders().join(", ")
                ))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn status(&self, status: OutcomeStatus) -> String {
        let color = match status {
            OutcomeStatus::Success => "green",
            OutcomeStatus::MissingPhone | OutcomeStatus::TemplateParseFailed => "yellow",
            OutcomeStatus::ExtractionFailed | OutcomeStatus::CrmFailed => "red",
        };
        self.colorize(status.as_str(), color)
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Shorten long text for table cells.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", cut)
}
