//! Calllog CLI library.
//!
//! Job configuration, CSV input/output, command execution and output
//! formatting for the `calllog` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod io;
pub mod output;

pub use cli::{Cli, Command};
pub use config::JobConfig;
pub use error::{CliError, Result};
pub use output::Formatter;
