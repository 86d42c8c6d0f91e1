//! File classification and output path resolution.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::document::Format;

/// Extensions picked up from disk, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "xml", "json", "html", "md", "pdf"];

const OUTPUT_SUFFIX: &str = "_simplified";

/// How an input file is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// UTF-8 text processed with the given fragment strategy.
    Text(Format),
    /// Text is extracted first; output is plain text.
    Pdf,
    Unsupported,
}

fn extension_lowercase(path: &Path) -> Option<String> {
    path.extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase)
}

/// Classifies a file by its name.
///
/// XML files whose name contains "strings" are string resources; other
/// supported text files are plain.
pub fn classify(path: &Path) -> SourceKind {
    let Some(extension) = extension_lowercase(path) else {
        return SourceKind::Unsupported;
    };
    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return SourceKind::Unsupported;
    }

    match extension.as_str() {
        "pdf" => SourceKind::Pdf,
        "xml" => {
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            if file_name.contains("strings") {
                SourceKind::Text(Format::XmlStrings)
            } else {
                SourceKind::Text(Format::Plain)
            }
        }
        _ => SourceKind::Text(Format::Plain),
    }
}

/// Extension of the converted file: PDFs become `.txt`.
fn output_extension(input: &Path) -> Option<String> {
    match classify(input) {
        SourceKind::Pdf => Some("txt".to_string()),
        _ => input
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned()),
    }
}

fn simplified_file_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    match output_extension(input) {
        Some(ext) => format!("{stem}{OUTPUT_SUFFIX}.{ext}"),
        None => format!("{stem}{OUTPUT_SUFFIX}"),
    }
}

/// Where a single converted file is written.
///
/// - no output: `<stem>_simplified.<ext>` next to the input
/// - an existing directory or a path without extension: that directory,
///   same naming
/// - anything else: exactly that path, with `.txt` forced for PDF input
pub fn single_file_output(input: &Path, output: Option<&Path>) -> PathBuf {
    let Some(output) = output else {
        let parent = input.parent().unwrap_or_else(|| Path::new(""));
        return parent.join(simplified_file_name(input));
    };

    if output.is_dir() || output.extension().is_none() {
        return output.join(simplified_file_name(input));
    }

    if classify(input) == SourceKind::Pdf {
        output.with_extension("txt")
    } else {
        output.to_path_buf()
    }
}

/// Default output root for a directory run: a `<dir>_simplified` sibling.
pub fn default_batch_root(input_dir: &Path) -> PathBuf {
    let name = input_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input_dir.with_file_name(format!("{name}{OUTPUT_SUFFIX}"))
}

/// Mirrors `file` (found under `input_root`) into `output_root`.
///
/// File names are kept; PDFs are renamed to `.txt`.
fn batch_output(input_root: &Path, file: &Path, output_root: &Path) -> PathBuf {
    let relative = file.strip_prefix(input_root).unwrap_or(file);
    let mirrored = output_root.join(relative);
    if classify(file) == SourceKind::Pdf {
        mirrored.with_extension("txt")
    } else {
        mirrored
    }
}

/// Output paths for every file of a directory run, in input order.
///
/// Text files keep their mirrored names. A PDF whose `.txt` name is already
/// taken keeps its whole file name instead, so `a.pdf` next to `a.txt`
/// becomes `a.pdf.txt`.
pub fn batch_outputs(input_root: &Path, files: &[PathBuf], output_root: &Path) -> Vec<PathBuf> {
    let mut taken: HashSet<PathBuf> = files
        .iter()
        .filter(|file| classify(file) != SourceKind::Pdf)
        .map(|file| batch_output(input_root, file, output_root))
        .collect();

    files
        .iter()
        .map(|file| {
            let target = batch_output(input_root, file, output_root);
            if classify(file) != SourceKind::Pdf {
                return target;
            }
            let target = if taken.contains(&target) {
                let renamed = free_pdf_output(input_root, file, output_root, &taken);
                log::warn!(
                    "{} would overwrite {}; writing {} instead",
                    file.display(),
                    target.display(),
                    renamed.display()
                );
                renamed
            } else {
                target
            };
            taken.insert(target.clone());
            target
        })
        .collect()
}

fn free_pdf_output(
    input_root: &Path,
    file: &Path,
    output_root: &Path,
    taken: &HashSet<PathBuf>,
) -> PathBuf {
    let relative = file.strip_prefix(input_root).unwrap_or(file);
    let mirrored = output_root.join(relative);
    let name = mirrored
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut candidate = mirrored.with_file_name(format!("{name}.txt"));
    let mut n = 1;
    while taken.contains(&candidate) {
        candidate = mirrored.with_file_name(format!("{name}.{n}.txt"));
        n += 1;
    }
    candidate
}
