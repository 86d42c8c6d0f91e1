use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::fs::is_temp_file;

/// Lists every regular file under `root`, in a stable order.
///
/// The output root is never descended into, so converting a directory into
/// a subdirectory of itself does not pick up its own results. Entries that
/// cannot be read are logged and left out.
pub fn discover(root: &Path, output_root: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| output_root.is_none_or(|out| entry.path() != out));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry under {}: {e}", root.display());
                continue;
            }
        };

        if entry.file_type().is_file() && !is_temp_file(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn test_discover_is_recursive_and_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(&root.join("b.txt"));
        touch(&root.join("a.txt"));
        touch(&root.join("res/values/strings.xml"));

        let files = discover(root, None);

        assert_eq!(
            files,
            vec![
                root.join("a.txt"),
                root.join("b.txt"),
                root.join("res/values/strings.xml"),
            ]
        );
    }

    #[test]
    fn test_discover_skips_output_root_and_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(&root.join("a.txt"));
        touch(&root.join(".a.txt.tmp"));
        touch(&root.join("out/a.txt"));

        let files = discover(root, Some(&root.join("out")));

        assert_eq!(files, vec![root.join("a.txt")]);
    }

    #[test]
    fn test_discover_keeps_unsupported_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(&root.join("image.bin"));

        assert_eq!(discover(root, None), vec![root.join("image.bin")]);
    }
}
