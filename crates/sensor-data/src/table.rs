//! In-memory wide table: one timestamp column plus N sensor columns.

use std::collections::{HashMap, HashSet};
use std::io::Read;

use sensor_core::error::Result;

/// A parsed tabular file with raw text cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SensorTable {
    /// Base name of the originating file.
    pub file_source: String,
    pub headers: Vec<String>,
    /// Row-major cells. Rows may be ragged; the normalizer rejects them.
    pub rows: Vec<Vec<String>>,
}

impl SensorTable {
    pub fn new(
        file_source: impl Into<String>,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Self {
        Self {
            file_source: file_source.into(),
            headers,
            rows,
        }
    }

    /// Decode CSV text from `reader`. The first record is the header row.
    ///
    /// Header text is kept byte for byte; repeated names are made unique
    /// with [`dedupe_headers`]. Parsing is flexible about row length so that
    /// shape problems are reported per table by the normalizer rather than here.
    pub fn from_reader<R: Read>(file_source: impl Into<String>, reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers = dedupe_headers(csv_reader.headers()?.iter().map(str::to_string).collect());

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self::new(file_source, headers, rows))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Rename repeated header names so every column keeps its own sensor id.
///
/// The second `X` becomes `X.1`, the third `X.2`, skipping any suffix that
/// is already taken by another header.
pub fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut next_suffix: HashMap<String, usize> = HashMap::new();
    headers
        .into_iter()
        .map(|name| {
            if taken.insert(name.clone()) {
                return name;
            }
            let n = next_suffix.entry(name.clone()).or_insert(1);
            loop {
                let candidate = format!("{}.{}", name, n);
                *n += 1;
                if taken.insert(candidate.clone()) {
                    return candidate;
                }
            }
        })
        .collect()
}
