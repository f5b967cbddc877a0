//! Calllog CLI - Sync call transcript insights into LeadSquared.

use calllog_cli::commands;
use calllog_cli::{Cli, Command, Formatter, JobConfig};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    // Credentials may live in a .env file next to the job
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> calllog_cli::Result<()> {
    let config_path = JobConfig::locate(cli.config.as_deref())?;

    if let Command::Init(args) = cli.command {
        let formatter = Formatter::new(
            cli.format.map(Into::into).unwrap_or_default(),
            !cli.no_color,
        );
        return commands::execute_init(args, &config_path, &formatter);
    }

    let job = JobConfig::load(&config_path)?;

    // Determine output format
    let format = cli.format.map(Into::into).unwrap_or(job.output.format);

    // Determine color setting
    let color_enabled = !cli.no_color && job.output.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Validate(args) => commands::execute_validate(args, &job, &formatter),
        Command::Run(args) => commands::execute_run(args, &job, &formatter).map(|_| ()),
        Command::Init(_) => unreachable!("handled above"),
    }
}
