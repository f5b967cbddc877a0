//! Core record pipeline: extract, coerce, render, dispatch

use crate::config::PipelineConfig;
use crate::dispatch::{dispatch, DispatchMode};
use crate::report::BatchReport;
use calllog_domain::traits::{CrmClient, FieldExtractor};
use calllog_domain::{ExtendedRow, FieldType, JobId, OutcomeLogEntry, OutcomeStatus, Row};
use std::fmt::Display;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runs CSV rows through extraction, templating and the CRM
///
/// Rows are handled strictly one after another, each fully resolved before
/// the next starts. Nothing a single row does can abort the batch: every
/// failure becomes that row's outcome entry.
///
/// # Examples
///
/// ```no_run
/// use calllog_pipeline::{DispatchMode, Pipeline, PipelineConfig, Template};
/// # use calllog_domain::{FieldSchema, Row};
/// # fn demo<E, C>(extractor: E, crm: C, rows: Vec<Row>) -> Result<(), Box<dyn std::error::Error>>
/// # where
/// #     E: calllog_domain::FieldExtractor,
/// #     E::Error: std::fmt::Display,
/// #     C: calllog_domain::CrmClient,
/// #     C::Error: std::fmt::Display,
/// # {
/// let template = Template::parse(r#"[{"Attribute": "mx_Summary", "Value": "{{summary}}"}]"#)?;
/// let config = PipelineConfig::new(
///     FieldSchema::default(),
///     template,
///     "PhoneNumber",
///     "Transcript",
///     DispatchMode::UpdateLead,
/// )?;
///
/// let report = Pipeline::new(config, extractor, crm).run(rows);
/// println!("{}", report.summary());
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<E, C> {
    config: PipelineConfig,
    extractor: E,
    crm: C,
}

impl<E, C> Pipeline<E, C>
where
    E: FieldExtractor,
    E::Error: Display,
    C: CrmClient,
    C::Error: Display,
{
    /// Create a new pipeline
    pub fn new(config: PipelineConfig, extractor: E, crm: C) -> Self {
        Self {
            config,
            extractor,
            crm,
        }
    }

    /// Process every row and return the outcome log
    pub fn process(&self, rows: Vec<Row>) -> Vec<OutcomeLogEntry> {
        self.run(rows).outcomes
    }

    /// Process every row and return the full report
    pub fn run(&self, rows: Vec<Row>) -> BatchReport {
        self.run_with(rows, |_| {})
    }

    /// Process every row, calling `on_outcome` as each one finishes
    pub fn run_with<F>(&self, rows: Vec<Row>, mut on_outcome: F) -> BatchReport
    where
        F: FnMut(&OutcomeLogEntry),
    {
        let job_id = JobId::new();
        let start = Instant::now();
        info!(job = %job_id, rows = rows.len(), "Starting sync job");

        let mut outcomes = Vec::with_capacity(rows.len());
        let mut processed = Vec::with_capacity(rows.len());

        for (index, row) in rows.into_iter().enumerate() {
            let (outcome, extended) = self.process_row(index, row);
            on_outcome(&outcome);
            outcomes.push(outcome);
            processed.push(extended);
        }

        let report = BatchReport {
            job_id,
            outcomes,
            rows: processed,
            elapsed: start.elapsed(),
        };

        info!(
            job = %report.job_id,
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Sync job finished"
        );

        report
    }

    fn process_row(&self, index: usize, row: Row) -> (OutcomeLogEntry, ExtendedRow) {
        let config = &self.config;
        let mut extended = ExtendedRow::new(row);
        let mut notes = Vec::new();

        // 1-2. Extraction, skipped for blank transcripts
        let transcript = extended
            .base()
            .get(&config.transcript_column)
            .filter(|t| !t.trim().is_empty())
            .cloned();

        match transcript {
            None => debug!("Row {}: blank transcript, skipping extraction", index),
            Some(transcript) => match self.extractor.extract(&transcript, &config.schema) {
                Ok(fields) => {
                    for (name, value) in fields {
                        if config.schema.contains(&name) {
                            extended.set_extracted(name, value);
                        }
                    }
                }
                Err(e) => {
                    warn!("Row {}: extraction failed: {}", index, e);
                    let phone = extended.non_blank(&config.phone_column).map(str::to_string);
                    let entry = OutcomeLogEntry::new(
                        index,
                        phone,
                        OutcomeStatus::ExtractionFailed,
                        format!("AI extraction failed: {}", e),
                    );
                    return (entry, extended);
                }
            },
        }

        // 3. Numeric coercion
        for field in config.schema.fields() {
            if field.field_type == FieldType::String {
                continue;
            }
            let raw = match extended.extracted().get(&field.name) {
                Some(Some(raw)) => raw.clone(),
                _ => continue,
            };
            match field.field_type.coerce(&raw) {
                Ok(value) => extended.set_extracted(field.name.clone(), Some(value)),
                Err(e) => {
                    warn!("Row {}: field '{}': {}", index, field.name, e);
                    notes.push(format!("{}: {}", field.name, e));
                    extended.set_extracted(field.name.clone(), None);
                }
            }
        }

        // 4. Phone
        let phone = match extended.non_blank(&config.phone_column) {
            Some(phone) => phone.to_string(),
            None => {
                let entry = OutcomeLogEntry::new(
                    index,
                    None,
                    OutcomeStatus::MissingPhone,
                    "Missing phone number",
                )
                .with_notes(notes);
                return (entry, extended);
            }
        };

        // 5. Render and shape the payload
        let values = extended.values(&config.schema);
        let payload = config
            .template
            .render(index, &values)
            .map_err(|e| format!("Template could not be parsed as JSON: {}", e))
            .and_then(|document| {
                config.mode.build_payload(document).map_err(|e| {
                    format!(
                        "Template does not match the {} payload shape: {}",
                        mode_name(&config.mode),
                        e
                    )
                })
            });

        let payload = match payload {
            Ok(payload) => payload,
            Err(message) => {
                warn!("Row {}: {}", index, message);
                let entry = OutcomeLogEntry::new(
                    index,
                    Some(phone),
                    OutcomeStatus::TemplateParseFailed,
                    message,
                )
                .with_notes(notes);
                return (entry, extended);
            }
        };

        // 6. Dispatch
        let entry = match dispatch(&self.crm, &phone, &payload) {
            Ok(message) => {
                info!("Row {}: {}", index, message);
                OutcomeLogEntry::new(index, Some(phone), OutcomeStatus::Success, message)
            }
            Err(e) => {
                warn!("Row {}: CRM call failed: {}", index, e);
                OutcomeLogEntry::new(index, Some(phone), OutcomeStatus::CrmFailed, e.to_string())
            }
        };

        (entry.with_notes(notes), extended)
    }
}

fn mode_name(mode: &DispatchMode) -> &'static str {
    match mode {
        DispatchMode::UpdateLead => "lead update",
        DispatchMode::PostActivity { .. } => "activity",
    }
}
