use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// All errors produced while ingesting sensor archives.
#[derive(Error, Debug)]
pub enum IngestError {
    /// No header contains the substring `timestamp` (case-insensitive).
    #[error("No timestamp column found")]
    MissingTimestampColumn,

    /// The table could not be interpreted, e.g. ragged rows.
    #[error("Malformed table: {reason}")]
    MalformedTable { reason: String },

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV document could not be decoded.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl IngestError {
    /// Shorthand for [`IngestError::MalformedTable`].
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedTable {
            reason: reason.into(),
        }
    }

    /// Discriminant used when the error is recorded against a single file.
    pub fn kind(&self) -> FileErrorKind {
        match self {
            Self::MissingTimestampColumn => FileErrorKind::MissingTimestampColumn,
            Self::MalformedTable { .. } | Self::Csv(_) => FileErrorKind::MalformedTable,
            Self::FileRead { .. } => FileErrorKind::Unreadable,
        }
    }
}

/// Convenience alias used throughout the sensor crates.
pub type Result<T> = std::result::Result<T, IngestError>;

// ── Per-file errors ───────────────────────────────────────────────────────────

/// Category of a failure isolated to one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileErrorKind {
    MissingTimestampColumn,
    MalformedTable,
    Unreadable,
}

/// A processing failure for a single file that did not affect its siblings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileError {
    /// Base name of the offending file.
    pub file: String,
    pub kind: FileErrorKind,
    /// Human-readable description.
    pub message: String,
}

impl FileError {
    /// Record `err` against `file`.
    pub fn new(file: impl Into<String>, err: &IngestError) -> Self {
        let file = file.into();
        Self {
            message: format!("Error processing {}: {}", file, err),
            kind: err.kind(),
            file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_missing_timestamp() {
        let err = IngestError::MissingTimestampColumn;
        assert_eq!(err.to_string(), "No timestamp column found");
    }

    #[test]
    fn test_error_display_malformed() {
        let err = IngestError::malformed("row 3 has 2 cells, expected 4");
        assert_eq!(
            err.to_string(),
            "Malformed table: row 3 has 2 cells, expected 4"
        );
    }

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = IngestError::FileRead {
            path: PathBuf::from("/data/rig_a.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/data/rig_a.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_from_csv() {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(&b"\xff\xfe,1\n"[..]);
        let csv_err = reader.records().next().unwrap().unwrap_err();
        let err: IngestError = csv_err.into();
        assert!(err.to_string().starts_with("Failed to parse CSV"));
        assert_eq!(err.kind(), FileErrorKind::MalformedTable);
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            IngestError::MissingTimestampColumn.kind(),
            FileErrorKind::MissingTimestampColumn
        );
        assert_eq!(
            IngestError::malformed("x").kind(),
            FileErrorKind::MalformedTable
        );
        let read = IngestError::FileRead {
            path: PathBuf::from("a.csv"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(read.kind(), FileErrorKind::Unreadable);
    }

    #[test]
    fn test_file_error_message_names_file() {
        let fe = FileError::new("rig_b.csv", &IngestError::MissingTimestampColumn);
        assert_eq!(fe.file, "rig_b.csv");
        assert_eq!(fe.kind, FileErrorKind::MissingTimestampColumn);
        assert_eq!(
            fe.message,
            "Error processing rig_b.csv: No timestamp column found"
        );
    }

    #[test]
    fn test_file_error_kind_serializes_snake_case() {
        let fe = FileError::new("a.csv", &IngestError::malformed("ragged"));
        let json = serde_json::to_value(&fe).unwrap();
        assert_eq!(json["kind"], "malformed_table");
    }
}
