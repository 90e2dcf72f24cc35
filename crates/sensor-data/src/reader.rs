//! CSV discovery and loading.
//!
//! Turns paths on disk into [`SensorTable`]s for the engine. Failures are
//! recorded per file so one unreadable export never hides the others.

use std::path::{Path, PathBuf};

use sensor_core::error::{FileError, IngestError, Result};
use tracing::{debug, warn};

use crate::table::SensorTable;

/// Find all `.csv` files under `path`, sorted by path.
///
/// A path naming a file is returned as-is regardless of extension.
pub fn find_csv_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }
    if !path.exists() {
        warn!("Input path does not exist: {}", path.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_csv(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Discover CSV files under every path in `inputs`, preserving input order.
pub fn discover_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    inputs.iter().flat_map(|p| find_csv_files(p)).collect()
}

/// Read one CSV file into a [`SensorTable`] tagged with the file's base name.
pub fn load_table(path: &Path) -> Result<SensorTable> {
    let file = std::fs::File::open(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let table = SensorTable::from_reader(file_source_name(path), std::io::BufReader::new(file))?;
    debug!(
        "Loaded {}: {} columns, {} rows",
        path.display(),
        table.headers.len(),
        table.row_count()
    );
    Ok(table)
}

/// Load every path, collecting a [`FileError`] for each one that fails.
pub fn load_tables(paths: &[PathBuf]) -> (Vec<SensorTable>, Vec<FileError>) {
    let mut tables = Vec::with_capacity(paths.len());
    let mut errors = Vec::new();

    for path in paths {
        match load_table(path) {
            Ok(table) => tables.push(table),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                errors.push(FileError::new(file_source_name(path), &e));
            }
        }
    }

    (tables, errors)
}

/// Base name of `path`, used as the provenance tag on readings.
pub fn file_source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensor_core::error::FileErrorKind;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) -> PathBuf {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    // ── find_csv_files ────────────────────────────────────────────────────────

    #[test]
    fn test_find_csv_files_recursive_sorted() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b/rig_b.csv", "TimeStamp\n");
        write(dir.path(), "a.CSV", "TimeStamp\n");
        write(dir.path(), "notes.txt", "ignore me");

        let files = find_csv_files(dir.path());
        let names: Vec<String> = files.iter().map(|p| file_source_name(p)).collect();
        assert_eq!(names, vec!["a.CSV", "rig_b.csv"]);
    }

    #[test]
    fn test_find_csv_files_missing_path() {
        let dir = TempDir::new().unwrap();
        assert!(find_csv_files(&dir.path().join("nope")).is_empty());
    }

    #[test]
    fn test_find_csv_files_single_file() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "export.dat", "TimeStamp\n");
        assert_eq!(find_csv_files(&path), vec![path]);
    }

    #[test]
    fn test_discover_inputs_preserves_order() {
        let dir = TempDir::new().unwrap();
        let z = write(dir.path(), "z.csv", "TimeStamp\n");
        let a = write(dir.path(), "sub/a.csv", "TimeStamp\n");

        let found = discover_inputs(&[z.clone(), dir.path().join("sub")]);
        assert_eq!(found, vec![z, a]);
    }

    // ── load_table / load_tables ──────────────────────────────────────────────

    #[test]
    fn test_load_table_uses_base_name() {
        let dir = TempDir::new().unwrap();
        let path = write(
            dir.path(),
            "nested/rig_a.csv",
            "TimeStamp,Temp1_WIN\n2024-01-01T00:00,45\n",
        );
        let table = load_table(&path).unwrap();
        assert_eq!(table.file_source, "rig_a.csv");
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_load_tables_collects_errors() {
        let dir = TempDir::new().unwrap();
        let good = write(dir.path(), "good.csv", "TimeStamp,Temp1\n2024-01-01,1\n");
        let missing = dir.path().join("gone.csv");

        let (tables, errors) = load_tables(&[good, missing]);

        assert_eq!(tables.len(), 1);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].file, "gone.csv");
        assert_eq!(errors[0].kind, FileErrorKind::Unreadable);
    }
}
