// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `procherd`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "procherd",
    version,
    about = "Supervise external processes from an XML task list.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the XML task-list document.
    #[arg(value_name = "TASK_LIST")]
    pub input: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PROCHERD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
