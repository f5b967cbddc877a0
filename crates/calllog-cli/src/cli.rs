//! CLI command definitions and argument parsing.

use crate::config::OutputFormat;
use calllog_crm::{ACCESS_KEY_ENV, HOST_ENV, SECRET_KEY_ENV};
use calllog_llm::openrouter::API_KEY_ENV;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Calllog - Extract call insights with an LLM and sync them to LeadSquared.
#[derive(Debug, Parser)]
#[command(name = "calllog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Job configuration file
    #[arg(short, long, global = true, env = "CALLLOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (summary counts only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write a starter job configuration
    Init(InitArgs),

    /// Check the job's schema and template without calling any service
    Validate(ValidateArgs),

    /// Process a CSV of call transcripts and push the results to the CRM
    Run(RunArgs),
}

/// Arguments for the init command.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Where to write the configuration (defaults to the --config path)
    pub path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the validate command.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Template file overriding the one in the job configuration
    #[arg(short, long)]
    pub template: Option<PathBuf>,
}

/// Arguments for the run command.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// CSV file of calls
    #[arg(short, long)]
    pub input: PathBuf,

    /// Write the processed rows (input columns plus extracted fields) here
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the sync log here
    #[arg(short, long)]
    pub log: Option<PathBuf>,

    /// Template file overriding the one in the job configuration
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Model overriding the one in the job configuration
    #[arg(short, long)]
    pub model: Option<String>,

    #[command(flatten)]
    pub credentials: Credentials,
}

/// Service credentials, taken from flags or the environment.
#[derive(Debug, Clone, Default, Args)]
pub struct Credentials {
    /// OpenRouter API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub openrouter_key: Option<String>,

    /// LeadSquared access key
    #[arg(long, env = ACCESS_KEY_ENV, hide_env_values = true)]
    pub access_key: Option<String>,

    /// LeadSquared secret key
    #[arg(long, env = SECRET_KEY_ENV, hide_env_values = true)]
    pub secret_key: Option<String>,

    /// LeadSquared API host
    #[arg(long, env = HOST_ENV)]
    pub host: Option<String>,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => OutputFormat::Table,
            CliFormat::Json => OutputFormat::Json,
            CliFormat::Quiet => OutputFormat::Quiet,
        }
    }
}
