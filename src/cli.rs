// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `eventexec`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "eventexec",
    version,
    about = "Run configured external commands when a lifecycle event fires.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the handler config file (TOML).
    #[arg(long, value_name = "PATH", default_value = "eventexec.toml")]
    pub config: String,

    /// Name of the event to emit.
    #[arg(long, value_name = "NAME", required_unless_present = "dry_run")]
    pub event: Option<String>,

    /// Event data, available to args as `{event.data.KEY}`. Repeatable.
    #[arg(long = "data", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub data: Vec<(String, String)>,

    /// Keep running this long after dispatch so background commands can
    /// finish and report failures (e.g. `5s`).
    #[arg(long, value_name = "DURATION")]
    pub linger: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `EVENTEXEC_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print handlers, but don't run any commands.
    #[arg(long)]
    pub dry_run: bool,
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

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
