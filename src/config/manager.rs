use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::paths;
use crate::translation::{DEFAULT_COMMAND, DEFAULT_CONCURRENCY};

/// Default per-call translation deadline in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default settings in the `[simplify]` section of config.toml.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralConfig {
    /// Online provider to fall back to, by name.
    pub provider: Option<String>,
    /// Model for the online provider.
    pub model: Option<String>,
    /// Worker count for fragment/document fan-out and provider calls.
    pub jobs: Option<usize>,
    /// Deadline for one provider call; `0` disables it.
    pub timeout_secs: Option<u64>,
    /// Translate plain-text documents too, not only XML string resources.
    pub translate_plain: Option<bool>,
    /// Also pick up untagged `>TEXT</string>` values in XML resources.
    pub legacy_markup: Option<bool>,
}

/// The `[offline]` section: the local Argos Translate client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfflineConfig {
    pub command: Option<String>,
    pub enabled: Option<bool>,
}

/// Configuration for an online translation provider.
///
/// Each provider has an endpoint and optional API key settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// The OpenAI-compatible API endpoint URL.
    pub endpoint: String,
    /// API key stored directly in config (not recommended).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// List of available models for this provider.
    #[serde(default)]
    pub models: Vec<String>,
}

impl ProviderConfig {
    /// Gets the API key, preferring environment variable over config file.
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(env_var) = &self.api_key_env
            && let Ok(key) = std::env::var(env_var)
            && !key.is_empty()
        {
            return Some(key);
        }
        self.api_key.clone()
    }

    /// Returns `true` if this provider requires an API key.
    pub const fn requires_api_key(&self) -> bool {
        self.api_key.is_some() || self.api_key_env.is_some()
    }
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/simplify/config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub simplify: GeneralConfig,
    #[serde(default)]
    pub offline: OfflineConfig,
    /// Online provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

/// Everything the online provider needs once configuration is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnlineSettings {
    pub provider_name: String,
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
}

/// Resolved configuration after merging CLI arguments and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Whether English fragments are translated at all.
    pub translate: bool,
    /// Offline client command, `None` when disabled.
    pub offline_command: Option<String>,
    /// Online provider, `None` when not (correctly) configured.
    pub online: Option<OnlineSettings>,
    pub jobs: usize,
    pub timeout: Option<Duration>,
    pub translate_plain: bool,
    pub legacy_markup: bool,
    pub use_cache: bool,
    /// Startup diagnostics about settings that were ignored.
    pub notes: Vec<String>,
}

/// CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub jobs: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub no_translate: bool,
    pub offline_only: bool,
    pub legacy_markup: bool,
    pub no_cache: bool,
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// CLI options take precedence over config file values. An online provider
/// that is named but unusable is dropped with a note instead of failing the
/// run; only invalid values are errors.
pub fn resolve_config(
    options: &ResolveOptions,
    config_file: &ConfigFile,
) -> Result<ResolvedConfig> {
    let general = &config_file.simplify;
    let mut notes = Vec::new();

    let jobs = options
        .jobs
        .or(general.jobs)
        .unwrap_or(DEFAULT_CONCURRENCY);
    if jobs == 0 {
        bail!(
            "Invalid configuration: 'jobs' must be at least 1\n\n\
             Set it via:\n  \
             - CLI option: simplify --jobs <n>\n  \
             - Config file: ~/.config/simplify/config.toml"
        );
    }

    let timeout_secs = options
        .timeout_secs
        .or(general.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    let timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

    let translate = !options.no_translate;

    let offline_command = (translate && config_file.offline.enabled.unwrap_or(true)).then(|| {
        config_file
            .offline
            .command
            .clone()
            .unwrap_or_else(|| DEFAULT_COMMAND.to_string())
    });

    let online = if translate && !options.offline_only {
        resolve_online(options, config_file, &mut notes)
    } else {
        None
    };

    Ok(ResolvedConfig {
        translate,
        offline_command,
        online,
        jobs,
        timeout,
        translate_plain: general.translate_plain.unwrap_or(true),
        legacy_markup: options.legacy_markup || general.legacy_markup.unwrap_or(false),
        use_cache: !options.no_cache,
        notes,
    })
}

fn resolve_online(
    options: &ResolveOptions,
    config_file: &ConfigFile,
    notes: &mut Vec<String>,
) -> Option<OnlineSettings> {
    let provider_name = options
        .provider
        .as_ref()
        .or(config_file.simplify.provider.as_ref())
        .cloned()?;

    let Some(provider_config) = config_file.providers.get(&provider_name) else {
        let mut available: Vec<_> = config_file.providers.keys().map(String::as_str).collect();
        available.sort_unstable();
        notes.push(if available.is_empty() {
            format!("Provider '{provider_name}' not found; no providers configured")
        } else {
            format!(
                "Provider '{provider_name}' not found; available providers: {}",
                available.join(", ")
            )
        });
        return None;
    };

    let Some(model) = options
        .model
        .as_ref()
        .or(config_file.simplify.model.as_ref())
        .or(provider_config.models.first())
        .cloned()
    else {
        notes.push(format!(
            "Provider '{provider_name}' has no model configured; set 'model' or pass --model"
        ));
        return None;
    };

    if !provider_config.models.is_empty() && !provider_config.models.contains(&model) {
        notes.push(format!(
            "Model '{model}' is not in the configured models list for '{provider_name}' ({}); proceeding anyway",
            provider_config.models.join(", ")
        ));
    }

    let api_key = provider_config.get_api_key();
    if provider_config.requires_api_key() && api_key.is_none() {
        let env_var = provider_config.api_key_env.as_deref().unwrap_or("API_KEY");
        notes.push(format!(
            "Provider '{provider_name}' requires an API key; set {env_var} to enable it"
        ));
        return None;
    }

    Some(OnlineSettings {
        provider_name,
        endpoint: provider_config.endpoint.clone(),
        model,
        api_key,
    })
}

/// Manages loading configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/simplify/config.toml`
    /// or `~/.config/simplify/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Self {
        Self {
            config_path: paths::config_file(),
        }
    }

    /// Uses an explicit config file instead of the XDG location.
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile = toml::from_str(&contents).with_context(|| {
            format!("Failed to parse config file: {}", self.config_path.display())
        })?;

        Ok(config_file)
    }

    /// Loads the config file, treating a missing file as empty.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        match fs::metadata(&self.config_path) {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(ConfigFile::default()),
            _ => self.load(),
        }
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> ConfigManager {
        ConfigManager::with_path(temp_dir.path().join("config.toml"))
    }

    fn create_test_config() -> ConfigFile {
        let mut providers = HashMap::new();
        providers.insert(
            "ollama".to_string(),
            ProviderConfig {
                endpoint: "http://localhost:11434".to_string(),
                api_key: None,
                api_key_env: None,
                models: vec!["qwen2.5:7b".to_string()],
            },
        );
        providers.insert(
            "openrouter".to_string(),
            ProviderConfig {
                endpoint: "https://openrouter.ai/api".to_string(),
                api_key: None,
                api_key_env: Some("SIMPLIFY_TEST_NONEXISTENT_API_KEY".to_string()),
                models: vec!["gpt-4o".to_string()],
            },
        );

        ConfigFile {
            simplify: GeneralConfig {
                provider: Some("ollama".to_string()),
                model: Some("qwen2.5:7b".to_string()),
                ..GeneralConfig::default()
            },
            offline: OfflineConfig::default(),
            providers,
        }
    }

    #[test]
    fn test_load_parses_all_sections() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(
            manager.config_path(),
            r#"
[simplify]
provider = "ollama"
jobs = 2
timeout_secs = 10
translate_plain = false

[offline]
command = "/opt/argos/bin/argos-translate-cli"

[providers.ollama]
endpoint = "http://localhost:11434"
models = ["qwen2.5:7b"]
"#,
        )
        .unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(loaded.simplify.provider.as_deref(), Some("ollama"));
        assert_eq!(loaded.simplify.jobs, Some(2));
        assert_eq!(loaded.simplify.translate_plain, Some(false));
        assert_eq!(
            loaded.offline.command.as_deref(),
            Some("/opt/argos/bin/argos-translate-cli")
        );
        assert!(loaded.providers.contains_key("ollama"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        assert!(manager.load().is_err());
        let defaulted = manager.load_or_default().unwrap();
        assert!(defaulted.providers.is_empty());
    }

    #[test]
    fn test_load_or_default_reports_parse_errors() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(manager.config_path(), "[simplify\njobs = ").unwrap();

        let err = manager.load_or_default().unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    #[serial]
    fn test_provider_get_api_key_from_env() {
        // SAFETY: serialized with other env-mutating tests
        unsafe {
            std::env::set_var("SIMPLIFY_TEST_API_KEY", "test-key-value");
        }

        let provider = ProviderConfig {
            endpoint: "https://api.example.com".to_string(),
            api_key: Some("fallback-key".to_string()),
            api_key_env: Some("SIMPLIFY_TEST_API_KEY".to_string()),
            models: vec![],
        };

        assert_eq!(provider.get_api_key(), Some("test-key-value".to_string()));

        // SAFETY: Cleanup test env var
        unsafe {
            std::env::remove_var("SIMPLIFY_TEST_API_KEY");
        }

        assert_eq!(provider.get_api_key(), Some("fallback-key".to_string()));
    }

    #[test]
    fn test_defaults_without_config() {
        let resolved = resolve_config(&ResolveOptions::default(), &ConfigFile::default()).unwrap();

        assert!(resolved.translate);
        assert_eq!(resolved.offline_command.as_deref(), Some(DEFAULT_COMMAND));
        assert!(resolved.online.is_none());
        assert_eq!(resolved.jobs, DEFAULT_CONCURRENCY);
        assert_eq!(resolved.timeout, Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)));
        assert!(resolved.translate_plain);
        assert!(!resolved.legacy_markup);
        assert!(resolved.use_cache);
        assert!(resolved.notes.is_empty());
    }

    #[test]
    fn test_online_provider_from_file() {
        let resolved = resolve_config(&ResolveOptions::default(), &create_test_config()).unwrap();

        let online = resolved.online.unwrap();
        assert_eq!(online.provider_name, "ollama");
        assert_eq!(online.endpoint, "http://localhost:11434");
        assert_eq!(online.model, "qwen2.5:7b");
        assert!(online.api_key.is_none());
    }

    #[test]
    fn test_cli_overrides_file() {
        let options = ResolveOptions {
            model: Some("llama3".to_string()),
            jobs: Some(8),
            timeout_secs: Some(0),
            legacy_markup: true,
            ..ResolveOptions::default()
        };

        let resolved = resolve_config(&options, &create_test_config()).unwrap();

        assert_eq!(resolved.online.as_ref().unwrap().model, "llama3");
        assert_eq!(resolved.jobs, 8);
        assert_eq!(resolved.timeout, None);
        assert!(resolved.legacy_markup);
        assert_eq!(resolved.notes.len(), 1);
        assert!(resolved.notes[0].contains("not in the configured models list"));
    }

    #[test]
    fn test_model_falls_back_to_first_listed() {
        let mut config = create_test_config();
        config.simplify.model = None;

        let resolved = resolve_config(&ResolveOptions::default(), &config).unwrap();
        assert_eq!(resolved.online.unwrap().model, "qwen2.5:7b");
    }

    #[test]
    fn test_unknown_provider_is_dropped_with_note() {
        let options = ResolveOptions {
            provider: Some("nonexistent".to_string()),
            ..ResolveOptions::default()
        };

        let resolved = resolve_config(&options, &create_test_config()).unwrap();

        assert!(resolved.online.is_none());
        assert!(resolved.notes[0].contains("not found"));
        assert!(resolved.notes[0].contains("ollama, openrouter"));
    }

    #[test]
    fn test_missing_api_key_is_dropped_with_note() {
        let options = ResolveOptions {
            provider: Some("openrouter".to_string()),
            ..ResolveOptions::default()
        };

        let resolved = resolve_config(&options, &create_test_config()).unwrap();

        assert!(resolved.online.is_none());
        assert!(resolved.notes[0].contains("API key"));
    }

    #[test]
    fn test_no_translate_disables_both_providers() {
        let options = ResolveOptions {
            no_translate: true,
            ..ResolveOptions::default()
        };

        let resolved = resolve_config(&options, &create_test_config()).unwrap();

        assert!(!resolved.translate);
        assert!(resolved.offline_command.is_none());
        assert!(resolved.online.is_none());
    }

    #[test]
    fn test_offline_only_and_disabled_offline() {
        let mut config = create_test_config();
        let options = ResolveOptions {
            offline_only: true,
            ..ResolveOptions::default()
        };
        let resolved = resolve_config(&options, &config).unwrap();
        assert!(resolved.online.is_none());
        assert!(resolved.offline_command.is_some());

        config.offline.enabled = Some(false);
        let resolved = resolve_config(&ResolveOptions::default(), &config).unwrap();
        assert!(resolved.offline_command.is_none());
        assert!(resolved.online.is_some());
    }

    #[test]
    fn test_zero_jobs_is_rejected() {
        let options = ResolveOptions {
            jobs: Some(0),
            ..ResolveOptions::default()
        };

        let err = resolve_config(&options, &ConfigFile::default()).unwrap_err();
        assert!(err.to_string().contains("jobs"));
    }
}
