//! Configuration file management and resolution against CLI options.

mod manager;

pub use manager::{
    ConfigFile, ConfigManager, DEFAULT_TIMEOUT_SECS, GeneralConfig, OfflineConfig, OnlineSettings,
    ProviderConfig, ResolveOptions, ResolvedConfig, resolve_config,
};
