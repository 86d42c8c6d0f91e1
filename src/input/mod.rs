//! Input classification, discovery and PDF extraction.

mod classify;
mod discover;
mod pdf;

pub use classify::{
    SUPPORTED_EXTENSIONS, SourceKind, batch_outputs, classify, default_batch_root,
    single_file_output,
};
pub use discover::discover;
#[cfg(feature = "pdf")]
pub use pdf::PdfExtract;
pub use pdf::{PdfExtractor, detect as detect_pdf};
