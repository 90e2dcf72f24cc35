//! Wide-to-long normalization.
//!
//! Reshapes one [`SensorTable`] (one row per timestamp, one column per
//! sensor) into a flat sequence of [`SensorReading`]s, one per
//! (timestamp, sensor) pair that carries a value.

use chrono::NaiveDateTime;
use sensor_core::classifier::{classify, find_timestamp_column};
use sensor_core::data_processors::{TimestampProcessor, ValueProcessor};
use sensor_core::error::{IngestError, Result};
use sensor_core::models::{Platform, SensorReading, SensorType};
use tracing::debug;

use crate::table::SensorTable;

/// A sensor column that produces readings.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorColumn {
    pub index: usize,
    pub name: String,
    pub sensor_type: SensorType,
    pub platform: Platform,
}

/// Classify every non-timestamp column and keep the measured ones, in
/// left-to-right order.
pub fn sensor_columns(headers: &[String], timestamp_index: usize) -> Vec<SensorColumn> {
    headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != timestamp_index)
        .filter_map(|(index, name)| {
            let (sensor_type, platform) = classify(name);
            sensor_type.is_measured().then(|| SensorColumn {
                index,
                name: name.clone(),
                sensor_type,
                platform,
            })
        })
        .collect()
}

/// Normalize `table` into readings tagged with `file_name`.
///
/// Output is ordered by row, then by column position. Rows whose timestamp
/// does not parse contribute nothing; missing cells are skipped.
///
/// # Errors
///
/// * [`IngestError::MissingTimestampColumn`] when no header contains
///   `timestamp`.
/// * [`IngestError::MalformedTable`] when a row's length differs from the
///   header's.
pub fn normalize(table: &SensorTable, file_name: &str) -> Result<Vec<SensorReading>> {
    let ts_index =
        find_timestamp_column(&table.headers).ok_or(IngestError::MissingTimestampColumn)?;

    let width = table.headers.len();
    if let Some((row_no, row)) = table
        .rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != width)
    {
        return Err(IngestError::malformed(format!(
            "row {} has {} cells, expected {}",
            row_no + 1,
            row.len(),
            width
        )));
    }

    let columns = sensor_columns(&table.headers, ts_index);

    let timestamps: Vec<Option<NaiveDateTime>> = table
        .rows
        .iter()
        .map(|row| TimestampProcessor::parse(&row[ts_index]))
        .collect();

    let mut readings = Vec::with_capacity(table.rows.len() * columns.len());
    for (row, ts) in table.rows.iter().zip(&timestamps) {
        let Some(timestamp) = *ts else { continue };
        for col in &columns {
            let Some(value) = ValueProcessor::parse(&row[col.index]) else {
                continue;
            };
            readings.push(SensorReading {
                timestamp,
                date: timestamp.date(),
                value,
                sensor_type: col.sensor_type,
                platform: col.platform,
                sensor_id: col.name.clone(),
                file_source: file_name.to_string(),
            });
        }
    }

    debug!(
        "{}: {} rows ({} bad timestamps), {} sensor columns, {} readings",
        file_name,
        table.rows.len(),
        timestamps.iter().filter(|t| t.is_none()).count(),
        columns.len(),
        readings.len()
    );

    Ok(readings)
}
