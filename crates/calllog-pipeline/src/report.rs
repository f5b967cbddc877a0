//! Batch report: outcome log plus the processed rows

use calllog_domain::{ExtendedRow, JobId, OutcomeLogEntry, OutcomeStatus};
use std::collections::BTreeMap;
use std::time::Duration;

/// Result of one batch run
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Identifier of this run
    pub job_id: JobId,

    /// One entry per input row, in input order
    pub outcomes: Vec<OutcomeLogEntry>,

    /// Rows after extraction and coercion, in input order
    pub rows: Vec<ExtendedRow>,

    /// Wall-clock time spent on the batch
    pub elapsed: Duration,
}

impl BatchReport {
    /// Number of rows that ended with `status`
    pub fn count(&self, status: OutcomeStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// Number of rows processed
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Rows the CRM accepted
    pub fn succeeded(&self) -> usize {
        self.count(OutcomeStatus::Success)
    }

    /// Rows that ended in any failure status
    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Row counts keyed by status name
    pub fn by_status(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for outcome in &self.outcomes {
            *counts.entry(outcome.status.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// The sync log: a header line, then one line per row
    pub fn sync_log(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.outcomes.len() + 1);
        lines.push(format!("Sync job {} ({} rows)", self.job_id, self.total()));
        lines.extend(self.outcomes.iter().map(OutcomeLogEntry::log_line));
        lines
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("Sync job {}", self.job_id),
            format!("Rows processed: {}", self.total()),
            format!("Succeeded: {}", self.succeeded()),
            format!("Failed: {}", self.failed()),
        ];

        let failures: Vec<String> = self
            .by_status()
            .into_iter()
            .filter(|(status, _)| *status != OutcomeStatus::Success.as_str())
            .map(|(status, count)| format!("  {}: {}", status, count))
            .collect();
        if !failures.is_empty() {
            lines.push("Failures by status:".to_string());
            lines.extend(failures);
        }

        lines.push(format!("Elapsed: {:.1}s", self.elapsed.as_secs_f64()));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> BatchReport {
        BatchReport {
            job_id: JobId::new(),
            outcomes: vec![
                OutcomeLogEntry::new(0, Some("111".into()), OutcomeStatus::Success, "ok"),
                OutcomeLogEntry::new(1, None, OutcomeStatus::MissingPhone, "Missing phone number"),
                OutcomeLogEntry::new(
                    2,
                    Some("222".into()),
                    OutcomeStatus::CrmFailed,
                    "Lead not found",
                ),
                OutcomeLogEntry::new(3, Some("333".into()), OutcomeStatus::CrmFailed, "Rejected"),
            ],
            rows: Vec::new(),
            elapsed: Duration::from_millis(1500),
        }
    }

    #[test]
    fn test_counts() {
        let report = report();
        assert_eq!(report.total(), 4);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 3);
        assert_eq!(report.count(OutcomeStatus::CrmFailed), 2);
        assert_eq!(report.by_status()["missing_phone"], 1);
    }

    #[test]
    fn test_sync_log_has_header_and_one_line_per_row() {
        let report = report();
        let log = report.sync_log();
        assert_eq!(log.len(), 5);
        assert!(log[0].starts_with(&format!("Sync job {}", report.job_id)));
        assert_eq!(log[2], "Row 3: [missing_phone] Missing phone number");
    }

    #[test]
    fn test_summary_lists_failures() {
        let summary = report().summary();
        assert!(summary.contains("Rows processed: 4"));
        assert!(summary.contains("  crm_failed: 2"));
        assert!(!summary.contains("  success:"));
        assert!(summary.contains("Elapsed: 1.5s"));
    }
}
