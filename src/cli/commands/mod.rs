//! Subcommand implementations.

/// File and directory conversion.
pub mod convert;

/// Capability and provider listing.
pub mod providers;

use std::path::Path;

use super::CliError;
use crate::config::{ConfigFile, ConfigManager};

/// Loads the config file named on the command line, or the default one.
///
/// An explicitly named file must exist; the default location may be absent.
pub(crate) fn load_config(path: Option<&Path>) -> anyhow::Result<ConfigFile> {
    let loaded = match path {
        Some(path) => ConfigManager::with_path(path).load(),
        None => ConfigManager::new().load_or_default(),
    };
    loaded.map_err(|e| CliError::new(exitcode::CONFIG, format!("{e:#}")).into())
}
