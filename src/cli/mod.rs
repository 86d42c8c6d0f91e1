//! Command-line interface definitions and handlers.

use std::fmt;

/// CLI argument parsing with clap.
pub mod args;

/// Subcommand implementations.
pub mod commands;

pub use args::{Args, Command};

/// A failure that maps to a specific process exit code.
#[derive(Debug)]
pub struct CliError {
    pub code: exitcode::ExitCode,
    pub message: String,
}

impl CliError {
    pub fn new(code: exitcode::ExitCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

/// Exit code for an error returned from a command handler.
pub fn exit_code(err: &anyhow::Error) -> exitcode::ExitCode {
    err.downcast_ref::<CliError>()
        .map_or(exitcode::SOFTWARE, |e| e.code)
}
