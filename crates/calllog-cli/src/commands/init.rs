//! Init command implementation.

use crate::cli::InitArgs;
use crate::config::JobConfig;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the init command.
pub fn execute_init(args: InitArgs, config_path: &Path, formatter: &Formatter) -> Result<()> {
    let path = args.path.as_deref().unwrap_or(config_path);

    if path.exists() && !args.force {
        return Err(CliError::InvalidInput(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    JobConfig::starter().save(path)?;
    println!(
        "{}",
        formatter.success(&format!("Wrote starter job configuration to {}", path.display()))
    );
    Ok(())
}
