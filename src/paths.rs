//! Where the config file and the translation cache live.
//!
//! XDG base directories win on every platform; an unset, empty or relative
//! `XDG_*_HOME` falls back to the dotted directory under `$HOME`.

use std::ffi::OsString;
use std::path::PathBuf;

const APP_DIR: &str = "simplify";

/// `$XDG_CONFIG_HOME/simplify/config.toml`, else `~/.config/simplify/config.toml`.
pub fn config_file() -> PathBuf {
    base_dir(std::env::var_os("XDG_CONFIG_HOME"), ".config")
        .join(APP_DIR)
        .join("config.toml")
}

/// `$XDG_CACHE_HOME/simplify/translations.db`, else `~/.cache/simplify/translations.db`.
pub fn cache_db() -> PathBuf {
    base_dir(std::env::var_os("XDG_CACHE_HOME"), ".cache")
        .join(APP_DIR)
        .join("translations.db")
}

fn base_dir(xdg: Option<OsString>, home_fallback: &str) -> PathBuf {
    xdg.map(PathBuf::from)
        .filter(|dir| dir.is_absolute())
        .unwrap_or_else(|| home_dir().join(home_fallback))
}

/// The current directory stands in when there is no home (bare containers).
fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}
