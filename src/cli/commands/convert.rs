//! Conversion command handler.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::load_config;
use crate::batch::{Batch, BatchReport, Job, Outcome};
use crate::cache::CacheManager;
use crate::capability::Capabilities;
use crate::cli::CliError;
use crate::config::{ResolveOptions, ResolvedConfig, resolve_config};
use crate::document::ExtractOptions;
use crate::input::{batch_outputs, default_batch_root, discover, single_file_output};
use crate::pipeline::{Pipeline, PipelineOptions};
use crate::script::Hans;
use crate::translation::BackendChain;
use crate::ui::{BatchProgress, Style};
use crate::{diagnostic, status};

pub struct ConvertOptions {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub resolve: ResolveOptions,
}

pub async fn run_convert(options: ConvertOptions) -> Result<()> {
    let input = options.input.as_path();
    if !input.exists() {
        return Err(CliError::new(
            exitcode::NOINPUT,
            format!("Input not found: {}", input.display()),
        )
        .into());
    }

    let config_file = load_config(options.config.as_deref())?;
    let config = resolve_config(&options.resolve, &config_file)
        .map_err(|e| CliError::new(exitcode::CONFIG, format!("{e:#}")))?;

    let capabilities = Capabilities::probe(&config).await;
    for note in &capabilities.diagnostics {
        diagnostic!("{} {note}", Style::warning("note:"));
    }

    let pipeline = build_pipeline(&config, &capabilities);
    let batch = Batch::new(&pipeline, capabilities.pdf.clone(), config.jobs);

    if input.is_dir() {
        convert_directory(&batch, input, options.output.as_deref()).await
    } else {
        convert_file(&batch, input, options.output.as_deref()).await
    }
}

fn build_pipeline(config: &ResolvedConfig, capabilities: &Capabilities) -> Pipeline {
    let mut chain = BackendChain::new(capabilities.providers())
        .with_deadline(config.timeout)
        .with_concurrency(config.jobs);

    if config.use_cache && capabilities.can_translate() {
        match CacheManager::new() {
            Ok(cache) => chain = chain.with_cache(cache),
            Err(e) => log::warn!("Translation cache disabled: {e:#}"),
        }
    }

    log::debug!("Provider chain: {:?}", chain.provider_names());

    Pipeline::new(
        chain,
        Arc::new(Hans),
        PipelineOptions {
            translate: config.translate,
            translate_plain: config.translate_plain,
            extract: ExtractOptions {
                legacy_markup: config.legacy_markup,
            },
            jobs: config.jobs,
        },
    )
}

async fn convert_file(batch: &Batch<'_>, input: &Path, output: Option<&Path>) -> Result<()> {
    let job = Job::new(input, single_file_output(input, output));

    match batch.run_one(&job).await {
        Ok(report) => {
            status!(
                "{} {} → {}",
                Style::success("Converted:"),
                Style::path(job.input.display()),
                Style::path(job.output.display())
            );
            log::info!("{}: {report}", job.input.display());
            Ok(())
        }
        Err(e) => {
            let code = if e.is_skip() {
                exitcode::DATAERR
            } else {
                exitcode::IOERR
            };
            Err(CliError::new(code, e.to_string()).into())
        }
    }
}

async fn convert_directory(
    batch: &Batch<'_>,
    input: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let output_root = output.map_or_else(|| default_batch_root(input), Path::to_path_buf);

    std::fs::create_dir_all(&output_root).map_err(|e| {
        CliError::new(
            exitcode::CANTCREAT,
            format!(
                "Failed to create output directory {}: {e}",
                output_root.display()
            ),
        )
    })?;

    // Compare canonical paths so an output root inside the input is excluded.
    let input_root = input.canonicalize().unwrap_or_else(|_| input.to_path_buf());
    let excluded = output_root
        .canonicalize()
        .unwrap_or_else(|_| output_root.clone());

    let files = discover(&input_root, Some(&excluded));
    let targets = batch_outputs(&input_root, &files, &output_root);
    let jobs: Vec<Job> = files
        .into_iter()
        .zip(targets)
        .map(|(file, target)| Job::new(file, target))
        .collect();

    status!(
        "Converting {} files from {} into {}",
        jobs.len(),
        Style::path(input.display()),
        Style::path(output_root.display())
    );

    let progress = BatchProgress::new(jobs.len());
    let report = batch
        .run(jobs, |job, outcome| {
            let relative = job
                .input
                .strip_prefix(&input_root)
                .unwrap_or(&job.input)
                .display()
                .to_string();
            match outcome {
                Outcome::Converted(report) => log::info!("{relative}: {report}"),
                Outcome::Skipped(e) => {
                    progress.println(&format!("{} {e}", Style::warning("skipped:")));
                }
                Outcome::Failed(e) => {
                    progress.println(&format!("{} {e}", Style::error("failed:")));
                }
            }
            progress.advance(&relative);
        })
        .await;
    progress.finish();

    summarize(&report, &output_root);

    if report.aborted {
        return Err(CliError::new(
            exitcode::IOERR,
            "Stopped early: the output location is not writable",
        )
        .into());
    }

    Ok(())
}

fn summarize(report: &BatchReport, output_root: &Path) {
    status!(
        "{} {} converted, {} skipped, {} failed → {}",
        Style::success("Done:"),
        report.converted,
        report.skipped,
        report.failed,
        Style::path(output_root.display())
    );
}
