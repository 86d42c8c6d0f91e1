//! PDF text extraction capability.

use anyhow::Result;
use std::fmt::Debug;
use std::path::Path;

/// Pulls the plain text out of a PDF file.
pub trait PdfExtractor: Send + Sync + Debug {
    fn name(&self) -> &str;

    fn extract_text(&self, path: &Path) -> Result<String>;
}

/// Extractor backed by the `pdf-extract` crate.
#[cfg(feature = "pdf")]
#[derive(Debug, Default)]
pub struct PdfExtract;

#[cfg(feature = "pdf")]
impl PdfExtractor for PdfExtract {
    fn name(&self) -> &str {
        "pdf-extract"
    }

    fn extract_text(&self, path: &Path) -> Result<String> {
        pdf_extract::extract_text(path)
            .map_err(|e| anyhow::anyhow!("Failed to extract text from {}: {e:?}", path.display()))
    }
}

/// Returns the extractor compiled into this binary, if any.
#[cfg(feature = "pdf")]
pub fn detect() -> Option<std::sync::Arc<dyn PdfExtractor>> {
    Some(std::sync::Arc::new(PdfExtract))
}

/// Returns the extractor compiled into this binary, if any.
#[cfg(not(feature = "pdf"))]
pub fn detect() -> Option<std::sync::Arc<dyn PdfExtractor>> {
    None
}
