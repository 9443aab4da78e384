//! Filesystem adapter for the desktop conversion path
//!
//! Path derivation, measurement-file discovery, and report writing. Reports
//! are written through a temporary file in the target directory and renamed
//! into place, so a failed conversion never leaves a partially-written
//! report visible.

use crate::constants::{MEASUREMENT_FILE_EXTENSION, REPORT_FILE_EXTENSION};
use crate::{Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Report path for a source file: same location, `.dis` extension
pub fn report_target_path(source: &Path) -> PathBuf {
    source.with_extension(REPORT_FILE_EXTENSION)
}

/// Expand the given paths into the list of files to convert
///
/// Directories are walked recursively for `.ft` measurement files, sorted
/// for a deterministic batch order. Explicitly-named files pass through
/// regardless of extension; the reader decides whether they are usable.
pub fn discover_measurement_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if !path.exists() {
            return Err(Error::configuration(format!(
                "Input path does not exist: {}",
                path.display()
            )));
        }

        if path.is_file() {
            files.push(path.clone());
            continue;
        }

        let mut found: Vec<PathBuf> = WalkDir::new(path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|file| {
                file.extension()
                    .and_then(|extension| extension.to_str())
                    .map(|extension| extension.eq_ignore_ascii_case(MEASUREMENT_FILE_EXTENSION))
                    .unwrap_or(false)
            })
            .collect();

        found.sort();
        debug!(
            "Discovered {} measurement files under {}",
            found.len(),
            path.display()
        );
        files.extend(found);
    }

    Ok(files)
}

/// Write report text to its target path atomically
///
/// The text lands in a temporary file beside the target and is renamed over
/// it, so readers only ever observe a complete report.
pub fn write_report_atomic(target: &Path, text: &str) -> Result<()> {
    let directory = target.parent().unwrap_or_else(|| Path::new("."));

    let mut temp_file = tempfile::NamedTempFile::new_in(directory)
        .map_err(|e| Error::io(format!("Failed to create temporary file in {}", directory.display()), e))?;

    temp_file
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(format!("Failed to write report for {}", target.display()), e))?;

    temp_file
        .persist(target)
        .map_err(|e| Error::io(format!("Failed to persist report {}", target.display()), e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_report_target_path_swaps_extension() {
        assert_eq!(
            report_target_path(Path::new("/data/creek.ft")),
            PathBuf::from("/data/creek.dis")
        );
        assert_eq!(
            report_target_path(Path::new("creek")),
            PathBuf::from("creek.dis")
        );
    }

    #[test]
    fn test_discovery_walks_directories_for_measurement_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        std::fs::create_dir(root.join("nested")).unwrap();
        std::fs::write(root.join("a.ft"), b"x").unwrap();
        std::fs::write(root.join("b.FT"), b"x").unwrap();
        std::fs::write(root.join("notes.txt"), b"x").unwrap();
        std::fs::write(root.join("nested/c.ft"), b"x").unwrap();

        let files = discover_measurement_files(&[root.to_path_buf()]).unwrap();

        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|file| {
            file.extension()
                .unwrap()
                .to_str()
                .unwrap()
                .eq_ignore_ascii_case("ft")
        }));
    }

    #[test]
    fn test_discovery_passes_explicit_files_through() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("renamed.bin");
        std::fs::write(&file, b"x").unwrap();

        let files = discover_measurement_files(&[file.clone()]).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_discovery_rejects_missing_paths() {
        let result = discover_measurement_files(&[PathBuf::from("/no/such/path")]);
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_atomic_report_write() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("creek.dis");

        write_report_atomic(&target, "report body\n").unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "report body\n");

        // Overwrites an existing report in place
        write_report_atomic(&target, "second body\n").unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "second body\n");
    }
}
