//! Capability and provider listing command handler.

use anyhow::{Result, bail};
use std::path::Path;

use super::load_config;
use crate::capability::Capabilities;
use crate::config::{ConfigFile, ResolveOptions, resolve_config};
use crate::ui::Style;

/// Prints what this run could use and the configured online providers.
///
/// If `specific_provider` is given, shows details for that provider only.
pub async fn print_providers(
    config_path: Option<&Path>,
    resolve: &ResolveOptions,
    specific_provider: Option<&str>,
) -> Result<()> {
    let config_file = load_config(config_path)?;

    if let Some(provider_name) = specific_provider {
        return print_provider_details(&config_file, provider_name);
    }

    let config = resolve_config(resolve, &config_file)?;
    let capabilities = Capabilities::probe(&config).await;

    println!("{}", Style::header("Capabilities"));
    match (&capabilities.offline, &config.offline_command) {
        (Some(provider), Some(command)) => println!(
            "  {}  {} {}",
            Style::label("offline"),
            Style::value(provider.name()),
            Style::secondary(format!("({command})"))
        ),
        _ => println!("  {}  unavailable", Style::label("offline")),
    }
    match (&capabilities.online, &config.online) {
        (Some(_), Some(settings)) => println!(
            "  {}   {} {} {}",
            Style::label("online"),
            Style::value(&settings.provider_name),
            Style::value(&settings.model),
            Style::secondary(format!("({})", settings.endpoint))
        ),
        _ => println!("  {}   unavailable", Style::label("online")),
    }
    match &capabilities.pdf {
        Some(extractor) => println!(
            "  {}      {}",
            Style::label("pdf"),
            Style::value(extractor.name())
        ),
        None => println!("  {}      unavailable", Style::label("pdf")),
    }
    for note in &capabilities.diagnostics {
        println!("  {}", Style::hint(note));
    }

    println!();
    if config_file.providers.is_empty() {
        println!("No online providers configured.");
        println!(
            "{}",
            Style::hint("Add [providers.<name>] sections to ~/.config/simplify/config.toml")
        );
        return Ok(());
    }

    let default_provider = config_file.simplify.provider.as_deref();
    let mut names: Vec<_> = config_file.providers.keys().collect();
    names.sort_unstable();

    println!("{}", Style::header("Configured providers"));
    for name in names {
        let provider = &config_file.providers[name];
        let marker = if default_provider == Some(name.as_str()) {
            " (default)"
        } else {
            ""
        };
        println!("  {}{marker}", Style::value(name));
        println!("    endpoint: {}", Style::secondary(&provider.endpoint));
        if !provider.models.is_empty() {
            println!("    models: {}", provider.models.join(", "));
        }
    }

    Ok(())
}

fn print_provider_details(config_file: &ConfigFile, provider_name: &str) -> Result<()> {
    let Some(provider) = config_file.providers.get(provider_name) else {
        bail!("Provider '{provider_name}' not found");
    };

    let is_default = config_file.simplify.provider.as_deref() == Some(provider_name);
    println!(
        "Provider: {}{}",
        Style::value(provider_name),
        if is_default { " (default)" } else { "" }
    );
    println!("  endpoint = {}", provider.endpoint);
    if provider.requires_api_key() {
        let has_key = provider.get_api_key().is_some();
        println!(
            "  api_key  = {}",
            if has_key { "(set)" } else { "(not set)" }
        );
    }
    if provider.models.is_empty() {
        println!("  models   = (none configured)");
    } else {
        println!("  models:");
        for model in &provider.models {
            println!("    - {model}");
        }
    }

    Ok(())
}
