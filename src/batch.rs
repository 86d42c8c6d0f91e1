//! Converting files on disk, one at a time or a directory's worth at once.

use futures_util::{StreamExt, stream};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::document::Document;
use crate::fs::atomic_write;
use crate::input::{PdfExtractor, SourceKind, classify};
use crate::pipeline::{DocumentReport, Pipeline};

/// One input file and where its converted text goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Job {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FileError {
    #[error("Unsupported file type: {}", path.display())]
    Unsupported { path: PathBuf },

    #[error("PDF extraction is not available for {}", path.display())]
    PdfUnavailable { path: PathBuf },

    #[error("{message}")]
    Pdf { path: PathBuf, message: String },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    /// The file was never attempted.
    pub const fn is_skip(&self) -> bool {
        matches!(self, Self::Unsupported { .. } | Self::PdfUnavailable { .. })
    }

    /// The output side is unusable, so later documents would fail too.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Write { source, .. } => matches!(
                source.kind(),
                ErrorKind::ReadOnlyFilesystem | ErrorKind::StorageFull
            ),
            _ => false,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Unsupported { path }
            | Self::PdfUnavailable { path }
            | Self::Pdf { path, .. }
            | Self::Read { path, .. }
            | Self::Write { path, .. } => path,
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Converted(DocumentReport),
    Skipped(FileError),
    Failed(FileError),
}

impl Outcome {
    /// Whether the run has to stop after this outcome.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Failed(e) if e.is_fatal())
    }
}

impl From<Result<DocumentReport, FileError>> for Outcome {
    fn from(result: Result<DocumentReport, FileError>) -> Self {
        match result {
            Ok(report) => Self::Converted(report),
            Err(e) if e.is_skip() => Self::Skipped(e),
            Err(e) => Self::Failed(e),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    /// A fatal output error stopped the run before every job finished.
    pub aborted: bool,
}

impl BatchReport {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Converted(_) => self.converted += 1,
            Outcome::Skipped(_) => self.skipped += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Writes converted text to its destination.
pub type WriteFn = fn(&Path, &str) -> io::Result<()>;

pub struct Batch<'a> {
    pipeline: &'a Pipeline,
    pdf: Option<Arc<dyn PdfExtractor>>,
    jobs: usize,
    write: WriteFn,
}

impl<'a> Batch<'a> {
    pub fn new(pipeline: &'a Pipeline, pdf: Option<Arc<dyn PdfExtractor>>, jobs: usize) -> Self {
        Self {
            pipeline,
            pdf,
            jobs: jobs.max(1),
            write: atomic_write,
        }
    }

    /// Replaces the default atomic file writer.
    #[must_use]
    pub fn with_writer(mut self, write: WriteFn) -> Self {
        self.write = write;
        self
    }

    /// Reads, converts and writes a single file.
    pub async fn run_one(&self, job: &Job) -> Result<DocumentReport, FileError> {
        let document = self.load(&job.input).await?;
        let output = self.pipeline.run(&document).await;

        (self.write)(&job.output, &output.document.content).map_err(|source| {
            FileError::Write {
                path: job.output.clone(),
                source,
            }
        })?;

        Ok(output.report)
    }

    async fn load(&self, path: &Path) -> Result<Document, FileError> {
        match classify(path) {
            SourceKind::Unsupported => Err(FileError::Unsupported {
                path: path.to_path_buf(),
            }),
            SourceKind::Pdf => {
                let Some(extractor) = self.pdf.clone() else {
                    return Err(FileError::PdfUnavailable {
                        path: path.to_path_buf(),
                    });
                };
                let owned = path.to_path_buf();
                let text = tokio::task::spawn_blocking(move || extractor.extract_text(&owned))
                    .await
                    .map_err(|e| extraction_interrupted(path, &e))?
                    .map_err(|e| FileError::Pdf {
                        path: path.to_path_buf(),
                        message: format!("{e:#}"),
                    })?;
                Ok(Document::plain(text))
            }
            SourceKind::Text(format) => {
                let content =
                    tokio::fs::read_to_string(path)
                        .await
                        .map_err(|source| FileError::Read {
                            path: path.to_path_buf(),
                            source,
                        })?;
                Ok(Document::new(content, format))
            }
        }
    }

    /// Converts every job with bounded concurrency.
    ///
    /// `on_done` sees each job as it finishes, in completion order. A fatal
    /// output error stops the run; every other failure is counted and the
    /// remaining jobs continue.
    pub async fn run(&self, jobs: Vec<Job>, mut on_done: impl FnMut(&Job, &Outcome)) -> BatchReport {
        let mut report = BatchReport::default();

        let mut pending = stream::iter(jobs.into_iter().map(|job| async move {
            let outcome = Outcome::from(self.run_one(&job).await);
            (job, outcome)
        }))
        .buffer_unordered(self.jobs);

        while let Some((job, outcome)) = pending.next().await {
            report.record(&outcome);
            on_done(&job, &outcome);

            if let Outcome::Failed(e) = &outcome
                && outcome.is_fatal()
            {
                log::error!("Aborting remaining documents: {e}");
                report.aborted = true;
                break;
            }
        }

        report
    }
}

fn extraction_interrupted(path: &Path, error: &tokio::task::JoinError) -> FileError {
    let what = if error.is_panic() {
        "panicked"
    } else {
        "was cancelled"
    };
    FileError::Pdf {
        path: path.to_path_buf(),
        message: format!("PDF extraction of {} {what}", path.display()),
    }
}
