//! Run command implementation.

use crate::cli::{Credentials, RunArgs};
use crate::config::{JobConfig, OutputFormat};
use crate::error::{CliError, Result};
use crate::io;
use crate::output::Formatter;
use calllog_crm::LeadSquaredClient;
use calllog_extractor::TranscriptExtractor;
use calllog_llm::OpenRouterProvider;
use calllog_pipeline::{BatchReport, Pipeline};
use std::time::Duration;
use tracing::info;

/// Execute the run command.
///
/// Everything that can stop the job (template, schema, credentials, the CSV
/// itself) is checked before the first row is sent anywhere.
pub fn execute_run(args: RunArgs, job: &JobConfig, formatter: &Formatter) -> Result<BatchReport> {
    let config = job.to_pipeline_config(args.template.as_deref())?;
    let model = args.model.clone().unwrap_or_else(|| job.llm.model.clone());
    let (extractor, crm) = connect(&args.credentials, job, &model)?;

    let input = io::read_rows(&args.input)?;
    info!(
        "Read {} row(s) from {}",
        input.rows.len(),
        args.input.display()
    );

    let schema = config.schema.clone();
    let pipeline = Pipeline::new(config, extractor, crm);
    let show_progress = formatter.format() == OutputFormat::Table;
    let report = pipeline.run_with(input.rows, |outcome| {
        if show_progress {
            eprintln!("{}", formatter.outcome_line(outcome));
        }
    });

    if let Some(path) = &args.output {
        io::write_processed(path, &input.headers, &schema, &report.rows)?;
        info!("Wrote processed rows to {}", path.display());
    }
    if let Some(path) = &args.log {
        io::write_sync_log(path, &report.sync_log())?;
        info!("Wrote sync log to {}", path.display());
    }

    println!("{}", formatter.format_report(&report)?);
    Ok(report)
}

/// Build both service clients, failing fast on missing credentials.
fn connect(
    credentials: &Credentials,
    job: &JobConfig,
    model: &str,
) -> Result<(TranscriptExtractor<OpenRouterProvider>, LeadSquaredClient)> {
    let api_key = credentials.openrouter_key.clone().unwrap_or_default();
    let mut llm = OpenRouterProvider::new(api_key, model)?.with_endpoint(job.llm.endpoint.as_str());
    if let Some(secs) = job.llm.timeout_secs {
        llm = llm.with_timeout(Duration::from_secs(secs))?;
    }
    let extractor = TranscriptExtractor::try_new(llm, job.llm.extractor.clone())
        .map_err(|e| CliError::Config(e.to_string()))?;

    let crm = LeadSquaredClient::new(job.crm_config(
        credentials.host.as_deref().unwrap_or_default(),
        credentials.access_key.as_deref().unwrap_or_default(),
        credentials.secret_key.as_deref().unwrap_or_default(),
    ))?;

    Ok((extractor, crm))
}

#[cfg(test)]
mod tests {
    use super::*;
    use calllog_crm::CrmError;
    use calllog_llm::LlmError;
    use std::path::PathBuf;

    fn args(credentials: Credentials) -> RunArgs {
        RunArgs {
            input: PathBuf::from("/nonexistent/calls.csv"),
            output: None,
            log: None,
            template: None,
            model: None,
            credentials,
        }
    }

    fn full_credentials() -> Credentials {
        Credentials {
            openrouter_key: Some("sk-or-test".to_string()),
            access_key: Some("access".to_string()),
            secret_key: Some("secret".to_string()),
            host: Some("https://api.example.com".to_string()),
        }
    }

    #[test]
    fn test_missing_llm_key_is_fatal() {
        let credentials = Credentials {
            openrouter_key: None,
            ..full_credentials()
        };
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let result = execute_run(args(credentials), &JobConfig::default(), &formatter);
        assert!(matches!(result, Err(CliError::Llm(LlmError::MissingApiKey))));
    }

    #[test]
    fn test_missing_crm_credentials_are_fatal() {
        let credentials = Credentials {
            secret_key: Some("  ".to_string()),
            ..full_credentials()
        };
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let result = execute_run(args(credentials), &JobConfig::default(), &formatter);
        assert!(matches!(result, Err(CliError::Crm(CrmError::MissingCredentials(_)))));
    }

    #[test]
    fn test_unreadable_csv_is_fatal() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let result = execute_run(args(full_credentials()), &JobConfig::default(), &formatter);
        match result {
            Err(CliError::File(e)) => assert!(e.to_string().contains("Failed to open CSV file")),
            other => panic!("Expected file error, got {:?}", other.map(|r| r.total())),
        }
    }
}
