use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "simplify")]
#[command(about = "Convert traditional Chinese to simplified and translate English fragments")]
#[command(version)]
pub struct Args {
    /// File or directory to convert
    pub input: Option<PathBuf>,

    /// Output file or directory (defaults to a `_simplified` sibling)
    pub output: Option<PathBuf>,

    /// Config file (defaults to ~/.config/simplify/config.toml)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Online provider name from the config file
    #[arg(short = 'p', long)]
    pub provider: Option<String>,

    /// Model for the online provider
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Documents, fragments and provider calls in flight at once
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,

    /// Deadline for one provider call in seconds (0 disables it)
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Only convert the script, never translate
    #[arg(long)]
    pub no_translate: bool,

    /// Only use the offline translator
    #[arg(long, conflicts_with = "no_translate")]
    pub offline: bool,

    /// Also translate untagged `>Text</string>` values in XML resources
    #[arg(long)]
    pub legacy_markup: bool,

    /// Disable the translation cache
    #[arg(short = 'n', long)]
    pub no_cache: bool,

    /// Suppress status output
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Log fallbacks and provider failures
    #[arg(short = 'v', long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show available translation backends and configured providers
    Providers {
        /// Show details for one configured provider
        provider: Option<String>,
    },
}
