use anyhow::Result;
use clap::{CommandFactory, Parser};

use simplify_cli::cli::commands::{convert, providers};
use simplify_cli::cli::{Args, CliError, Command, exit_code};
use simplify_cli::config::ResolveOptions;
use simplify_cli::output::{self, OutputConfig};
use simplify_cli::ui::Style;

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "warn,simplify_cli=debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

async fn run(args: Args) -> Result<()> {
    let resolve = ResolveOptions {
        provider: args.provider,
        model: args.model,
        jobs: args.jobs,
        timeout_secs: args.timeout_secs,
        no_translate: args.no_translate,
        offline_only: args.offline,
        legacy_markup: args.legacy_markup,
        no_cache: args.no_cache,
    };

    match args.command {
        Some(Command::Providers { provider }) => {
            providers::print_providers(args.config.as_deref(), &resolve, provider.as_deref()).await
        }
        None => {
            let Some(input) = args.input else {
                eprintln!("{}", Args::command().render_usage());
                return Err(CliError::new(exitcode::USAGE, "No input file or directory given").into());
            };

            convert::run_convert(convert::ConvertOptions {
                input,
                output: args.output,
                config: args.config,
                resolve,
            })
            .await
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(args.verbose);
    let defaults = OutputConfig::default();
    output::init(OutputConfig {
        quiet: args.quiet,
        no_color: args.no_color || defaults.no_color,
    });

    if let Err(e) = run(args).await {
        output::flush_stderr();
        eprintln!("{} {e:#}", Style::error("Error:"));
        std::process::exit(exit_code(&e));
    }
}
