//! Outcome module - per-row result of a batch run

use serde::{Deserialize, Serialize};
use std::fmt;

/// How far a row got through the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// The CRM accepted the record
    Success,

    /// The extraction call failed; nothing was merged
    ExtractionFailed,

    /// Phone column was blank; no CRM call was made
    MissingPhone,

    /// The rendered template was not a usable payload
    TemplateParseFailed,

    /// Lookup, update or activity creation failed
    CrmFailed,
}

impl OutcomeStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Success => "success",
            OutcomeStatus::ExtractionFailed => "extraction_failed",
            OutcomeStatus::MissingPhone => "missing_phone",
            OutcomeStatus::TemplateParseFailed => "template_parse_failed",
            OutcomeStatus::CrmFailed => "crm_failed",
        }
    }

    /// Whether this status counts as a success
    pub fn is_success(&self) -> bool {
        matches!(self, OutcomeStatus::Success)
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in the outcome log; exactly one per input row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeLogEntry {
    /// Zero-based index of the row in the input
    pub row_index: usize,

    /// Trimmed phone number, when the row had one
    pub phone: Option<String>,

    /// Final status of the row
    pub status: OutcomeStatus,

    /// Human-readable detail (collaborator messages are kept verbatim)
    pub message: String,

    /// Non-fatal notes, such as fields that failed numeric coercion
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl OutcomeLogEntry {
    /// Create an entry without notes
    pub fn new(
        row_index: usize,
        phone: Option<String>,
        status: OutcomeStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            row_index,
            phone,
            status,
            message: message.into(),
            notes: Vec::new(),
        }
    }

    /// Attach non-fatal notes
    pub fn with_notes(mut self, notes: Vec<String>) -> Self {
        self.notes = notes;
        self
    }

    /// Line number of the row in the CSV file (header is line 1)
    pub fn line_number(&self) -> usize {
        self.row_index + 2
    }

    /// Render as a single sync-log line
    ///
    /// # Examples
    ///
    /// ```
    /// use calllog_domain::{OutcomeLogEntry, OutcomeStatus};
    ///
    /// let entry =
    ///     OutcomeLogEntry::new(0, None, OutcomeStatus::MissingPhone, "Missing phone number");
    /// assert_eq!(entry.log_line(), "Row 2: [missing_phone] Missing phone number");
    /// ```
    pub fn log_line(&self) -> String {
        let mut line = match &self.phone {
            Some(phone) => format!(
                "Row {} (Phone: {}): [{}] {}",
                self.line_number(),
                phone,
                self.status,
                self.message
            ),
            None => format!("Row {}: [{}] {}", self.line_number(), self.status, self.message),
        };
        if !self.notes.is_empty() {
            line.push_str(&format!(" (notes: {})", self.notes.join("; ")));
        }
        line
    }
}
