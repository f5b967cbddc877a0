//! Validate command implementation.

use crate::cli::ValidateArgs;
use crate::config::JobConfig;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the validate command.
///
/// Checks the schema and the template exactly as `run` would, without
/// touching any service.
pub fn execute_validate(args: ValidateArgs, job: &JobConfig, formatter: &Formatter) -> Result<()> {
    let config = job.to_pipeline_config(args.template.as_deref())?;

    let output = formatter.format_job(&config)?;
    if !output.is_empty() {
        println!("{}", output);
    }

    // Placeholders that match no schema field must come from CSV columns
    let columns: Vec<&str> = config
        .template
        .placeholders()
        .into_iter()
        .filter(|p| !config.schema.contains(p))
        .collect();
    if !columns.is_empty() {
        eprintln!(
            "{}",
            formatter.info(&format!("Expected from CSV columns: {}", columns.join(", ")))
        );
    }

    eprintln!("{}", formatter.success("Job configuration is valid"));
    Ok(())
}
