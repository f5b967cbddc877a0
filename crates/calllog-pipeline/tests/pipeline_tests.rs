//! Integration tests for the record pipeline
//!
//! Collaborators are in-memory stubs that count their calls, so each test can
//! assert exactly which CRM operations a row reached.

use calllog_domain::{
    ActivityPayload, AttributePair, CrmClient, ExtractedFields, FieldExtractor, FieldSchema,
    FieldSpec, FieldType, LeadId, OutcomeStatus, Row,
};
use calllog_pipeline::{DispatchMode, Pipeline, PipelineConfig, Template};
use proptest::prelude::*;
use std::cell::{Cell, RefCell};

const UNKNOWN_PHONE: &str = "0000000000";

/// Extractor returning canned fields, or failing
struct StubExtractor {
    result: Result<ExtractedFields, String>,
    calls: Cell<usize>,
}

impl StubExtractor {
    fn returning(pairs: &[(&str, Option<&str>)]) -> Self {
        let fields = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect();
        Self {
            result: Ok(fields),
            calls: Cell::new(0),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            calls: Cell::new(0),
        }
    }
}

impl FieldExtractor for StubExtractor {
    type Error = String;

    fn extract(&self, _transcript: &str, _schema: &FieldSchema) -> Result<ExtractedFields, String> {
        self.calls.set(self.calls.get() + 1);
        self.result.clone()
    }
}

/// CRM that knows every phone except `UNKNOWN_PHONE`
struct StubCrm {
    write_result: Result<String, String>,
    lookups: Cell<usize>,
    updates: RefCell<Vec<Vec<AttributePair>>>,
    activities: RefCell<Vec<ActivityPayload>>,
}

impl StubCrm {
    fn accepting() -> Self {
        Self::with_write_result(Ok("Record saved".to_string()))
    }

    fn with_write_result(write_result: Result<String, String>) -> Self {
        Self {
            write_result,
            lookups: Cell::new(0),
            updates: RefCell::new(Vec::new()),
            activities: RefCell::new(Vec::new()),
        }
    }

    fn writes(&self) -> usize {
        self.updates.borrow().len() + self.activities.borrow().len()
    }
}

impl CrmClient for StubCrm {
    type Error = String;

    fn lookup_by_phone(&self, phone: &str) -> Result<LeadId, String> {
        self.lookups.set(self.lookups.get() + 1);
        if phone == UNKNOWN_PHONE {
            Err(format!("No lead found for phone number {}", phone))
        } else {
            Ok(LeadId::new(format!("lead-{}", phone)))
        }
    }

    fn update_lead(&self, _lead: &LeadId, attributes: &[AttributePair]) -> Result<String, String> {
        self.updates.borrow_mut().push(attributes.to_vec());
        self.write_result.clone()
    }

    fn create_activity(
        &self,
        _lead: &LeadId,
        activity: &ActivityPayload,
    ) -> Result<String, String> {
        self.activities.borrow_mut().push(activity.clone());
        self.write_result.clone()
    }
}

fn schema() -> FieldSchema {
    FieldSchema::new(vec![
        FieldSpec::new("summary", "Summarize the call.", FieldType::String),
        FieldSpec::new("score", "Rate the agent 1-10.", FieldType::Integer),
        FieldSpec::new("ratio", "Talk-to-listen ratio.", FieldType::Float),
    ])
    .unwrap()
}

fn update_config(template: &str) -> PipelineConfig {
    PipelineConfig::new(
        schema(),
        Template::parse(template).unwrap(),
        "PhoneNumber",
        "Transcript",
        DispatchMode::UpdateLead,
    )
    .unwrap()
}

fn activity_config() -> PipelineConfig {
    PipelineConfig::new(
        schema(),
        Template::parse(
            r#"[{"SchemaName": "mx_Custom_1", "Value": "{{summary}}"},
                {"SchemaName": "mx_Custom_2", "Value": "{{score}}"}]"#,
        )
        .unwrap(),
        "PhoneNumber",
        "Transcript",
        DispatchMode::PostActivity { event_code: 227 },
    )
    .unwrap()
}

const UPDATE_TEMPLATE: &str = r#"[
    {"Attribute": "mx_Summary", "Value": "{{summary}}"},
    {"Attribute": "mx_Score", "Value": "{{score}}"},
    {"Attribute": "mx_Ratio", "Value": "{{ratio}}"}
]"#;

fn row(phone: &str, transcript: &str) -> Row {
    Row::from([
        ("PhoneNumber".to_string(), phone.to_string()),
        ("Transcript".to_string(), transcript.to_string()),
    ])
}

#[test]
fn test_full_row_reaches_crm() {
    let extractor = StubExtractor::returning(&[
        ("summary", Some("Wants a callback")),
        ("score", Some("8/10")),
        ("ratio", Some("0.6 roughly")),
    ]);
    let crm = StubCrm::accepting();
    let pipeline = Pipeline::new(update_config(UPDATE_TEMPLATE), &extractor, &crm);

    let outcomes = pipeline.process(vec![row(" 9876543210 ", "Agent: hello")]);

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].status, OutcomeStatus::Success);
    assert_eq!(outcomes[0].message, "Record saved");
    assert_eq!(outcomes[0].phone.as_deref(), Some("9876543210"));

    let updates = crm.updates.borrow();
    assert_eq!(updates[0][0], AttributePair::new("mx_Summary", "Wants a callback"));
    // "8/10" keeps every digit
    assert_eq!(updates[0][1], AttributePair::new("mx_Score", "810"));
    assert_eq!(updates[0][2], AttributePair::new("mx_Ratio", "0.6"));
}

#[test]
fn test_blank_transcript_skips_extraction_but_still_dispatches() {
    let extractor = StubExtractor::returning(&[("summary", Some("unused"))]);
    let crm = StubCrm::accepting();
    let pipeline = Pipeline::new(activity_config(), &extractor, &crm);

    let outcomes = pipeline.process(vec![row("5551234567", "   ")]);

    assert_eq!(extractor.calls.get(), 0);
    assert_eq!(outcomes[0].status, OutcomeStatus::Success);

    let activities = crm.activities.borrow();
    assert_eq!(activities[0].event_code, 227);
    assert_eq!(activities[0].fields[0].value, "");
}

#[test]
fn test_missing_phone_makes_no_crm_call() {
    let extractor = StubExtractor::returning(&[("summary", Some("ok"))]);
    let crm = StubCrm::accepting();
    let pipeline = Pipeline::new(update_config(UPDATE_TEMPLATE), &extractor, &crm);

    let outcomes = pipeline.process(vec![row("  ", "Agent: hello")]);

    assert_eq!(outcomes[0].status, OutcomeStatus::MissingPhone);
    assert_eq!(outcomes[0].phone, None);
    assert_eq!(crm.lookups.get(), 0);
    assert_eq!(crm.writes(), 0);
}

#[test]
fn test_coercion_strips_noise() {
    let extractor =
        StubExtractor::returning(&[("score", Some("about 42%")), ("ratio", Some("3.14 approx"))]);
    let crm = StubCrm::accepting();
    let pipeline = Pipeline::new(update_config(UPDATE_TEMPLATE), &extractor, &crm);

    let report = pipeline.run(vec![row("111", "t")]);

    assert_eq!(report.rows[0].get("score"), Some("42"));
    assert_eq!(report.rows[0].get("ratio"), Some("3.14"));
    assert!(report.outcomes[0].notes.is_empty());
}

#[test]
fn test_coercion_failure_unsets_field_and_continues() {
    let extractor = StubExtractor::returning(&[("score", Some("none"))]);
    let crm = StubCrm::accepting();
    let pipeline = Pipeline::new(update_config(UPDATE_TEMPLATE), &extractor, &crm);

    let report = pipeline.run(vec![row("111", "t")]);

    assert_eq!(report.outcomes[0].status, OutcomeStatus::Success);
    assert_eq!(report.rows[0].get("score"), None);
    assert_eq!(report.outcomes[0].notes.len(), 1);
    assert!(report.outcomes[0].notes[0].starts_with("score:"));

    let updates = crm.updates.borrow();
    assert_eq!(updates[0][1], AttributePair::new("mx_Score", ""));
}

#[test]
fn test_unknown_lead_fails_without_write() {
    let extractor = StubExtractor::returning(&[]);
    let crm = StubCrm::accepting();
    let pipeline = Pipeline::new(update_config(UPDATE_TEMPLATE), &extractor, &crm);

    let outcomes = pipeline.process(vec![row(UNKNOWN_PHONE, "t")]);

    assert_eq!(outcomes[0].status, OutcomeStatus::CrmFailed);
    assert_eq!(outcomes[0].message, "No lead found for phone number 0000000000");
    assert_eq!(crm.lookups.get(), 1);
    assert_eq!(crm.writes(), 0);
}

#[test]
fn test_rejected_write_is_crm_failure() {
    let extractor = StubExtractor::returning(&[]);
    let crm = StubCrm::with_write_result(Err("Invalid attribute mx_Score".to_string()));
    let pipeline = Pipeline::new(update_config(UPDATE_TEMPLATE), &extractor, &crm);

    let outcomes = pipeline.process(vec![row("111", "t")]);

    assert_eq!(outcomes[0].status, OutcomeStatus::CrmFailed);
    assert_eq!(outcomes[0].message, "Invalid attribute mx_Score");
}

#[test]
fn test_extraction_failure_skips_row_without_merge() {
    let extractor = StubExtractor::failing("model timed out");
    let crm = StubCrm::accepting();
    let pipeline = Pipeline::new(update_config(UPDATE_TEMPLATE), &extractor, &crm);

    let report = pipeline.run(vec![row("111", "t")]);

    assert_eq!(report.outcomes[0].status, OutcomeStatus::ExtractionFailed);
    assert_eq!(report.outcomes[0].message, "AI extraction failed: model timed out");
    assert!(report.rows[0].extracted().is_empty());
    assert_eq!(crm.lookups.get(), 0);
}

#[test]
fn test_value_breaking_json_is_template_failure() {
    let extractor = StubExtractor::returning(&[("summary", Some("He said \"call me\""))]);
    let crm = StubCrm::accepting();
    let pipeline = Pipeline::new(update_config(UPDATE_TEMPLATE), &extractor, &crm);

    let outcomes = pipeline.process(vec![row("111", "t")]);

    assert_eq!(outcomes[0].status, OutcomeStatus::TemplateParseFailed);
    assert_eq!(crm.lookups.get(), 0);
}

#[test]
fn test_json_escaping_keeps_quoted_values_valid() {
    let mut config = update_config(UPDATE_TEMPLATE);
    config.template = config.template.with_json_escaping(true);
    let extractor = StubExtractor::returning(&[("summary", Some("He said \"call me\""))]);
    let crm = StubCrm::accepting();
    let pipeline = Pipeline::new(config, &extractor, &crm);

    let outcomes = pipeline.process(vec![row("111", "t")]);

    assert_eq!(outcomes[0].status, OutcomeStatus::Success);
    assert_eq!(crm.updates.borrow()[0][0].value, "He said \"call me\"");
}

#[test]
fn test_payload_shape_mismatch_is_template_failure() {
    // An activity template dispatched as a lead update
    let config = update_config(r#"[{"SchemaName": "mx_Custom_1", "Value": "{{summary}}"}]"#);
    let extractor = StubExtractor::returning(&[]);
    let crm = StubCrm::accepting();
    let pipeline = Pipeline::new(config, &extractor, &crm);

    let outcomes = pipeline.process(vec![row("111", "t")]);

    assert_eq!(outcomes[0].status, OutcomeStatus::TemplateParseFailed);
    assert!(outcomes[0].message.contains("lead update"));
}

#[test]
fn test_extracted_field_overwrites_colliding_column() {
    let schema =
        FieldSchema::new(vec![FieldSpec::new("Stage", "Lead stage.", FieldType::String)]).unwrap();
    let config = PipelineConfig::new(
        schema,
        Template::parse(r#"[{"Attribute": "mx_Stage", "Value": "{{Stage}}"}]"#).unwrap(),
        "PhoneNumber",
        "Transcript",
        DispatchMode::UpdateLead,
    )
    .unwrap();
    let extractor =
        StubExtractor::returning(&[("Stage", Some("Closed")), ("PhoneNumber", Some("999"))]);
    let crm = StubCrm::accepting();
    let pipeline = Pipeline::new(config, &extractor, &crm);

    let mut input = row("111", "t");
    input.insert("Stage".to_string(), "New".to_string());
    let outcomes = pipeline.process(vec![input]);

    assert_eq!(crm.updates.borrow()[0][0], AttributePair::new("mx_Stage", "Closed"));
    // Keys outside the schema never reach the row
    assert_eq!(outcomes[0].phone.as_deref(), Some("111"));
}

#[test]
fn test_failures_do_not_stop_the_batch() {
    let extractor = StubExtractor::returning(&[("summary", Some("ok"))]);
    let crm = StubCrm::accepting();
    let pipeline = Pipeline::new(update_config(UPDATE_TEMPLATE), &extractor, &crm);

    let outcomes = pipeline.process(vec![
        row("", "t"),
        row(UNKNOWN_PHONE, "t"),
        row("222", "t"),
    ]);

    let statuses: Vec<_> = outcomes.iter().map(|o| o.status).collect();
    assert_eq!(
        statuses,
        vec![OutcomeStatus::MissingPhone, OutcomeStatus::CrmFailed, OutcomeStatus::Success]
    );
    assert_eq!(outcomes.iter().map(|o| o.row_index).collect::<Vec<_>>(), vec![0, 1, 2]);
}

#[test]
fn test_run_with_reports_each_row() {
    let extractor = StubExtractor::returning(&[]);
    let crm = StubCrm::accepting();
    let pipeline = Pipeline::new(update_config(UPDATE_TEMPLATE), &extractor, &crm);

    let mut seen = Vec::new();
    let report = pipeline.run_with(vec![row("1", "t"), row("2", "t")], |o| seen.push(o.row_index));

    assert_eq!(seen, vec![0, 1]);
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.sync_log().len(), 3);
}

proptest! {
    #[test]
    fn prop_one_outcome_per_row_in_order(phones in prop::collection::vec("[0-9 ]{0,4}", 0..20)) {
        let extractor = StubExtractor::returning(&[("score", Some("7"))]);
        let crm = StubCrm::accepting();
        let pipeline = Pipeline::new(update_config(UPDATE_TEMPLATE), &extractor, &crm);

        let rows: Vec<Row> = phones.iter().map(|p| row(p, "t")).collect();
        let outcomes = pipeline.process(rows);

        prop_assert_eq!(outcomes.len(), phones.len());
        for (index, outcome) in outcomes.iter().enumerate() {
            prop_assert_eq!(outcome.row_index, index);
            let expected = if phones[index].trim().is_empty() {
                OutcomeStatus::MissingPhone
            } else {
                OutcomeStatus::Success
            };
            prop_assert_eq!(outcome.status, expected);
        }
    }

    #[test]
    fn prop_substitution_without_placeholders_is_identity(text in "[^{}]*") {
        let values = std::collections::HashMap::from([("a".to_string(), "1".to_string())]);
        prop_assert_eq!(calllog_pipeline::substitute(&text, &values), text.as_str());
    }
}
