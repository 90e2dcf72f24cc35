//! Batch pipeline: classify → normalize → alert per table, then aggregate once.
//!
//! A failure in one table is recorded as a [`FileError`] and never aborts the
//! rest of the batch.

use serde::{Deserialize, Serialize};
use sensor_core::error::{FileError, Result};
use sensor_core::models::{
    AlertEntry, DailyAggregate, SensorReading, SummaryStatistics, ThresholdConfig,
};
use tracing::{info, warn};

use crate::aggregator::DailyAggregator;
use crate::alerts;
use crate::normalizer::normalize;
use crate::table::SensorTable;

// ── Public types ──────────────────────────────────────────────────────────────

/// Readings and alerts produced by one table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableOutput {
    pub readings: Vec<SensorReading>,
    pub alerts: Vec<AlertEntry>,
    /// Data rows in the source table, for drop-count inference.
    pub rows: usize,
}

/// Counters describing a batch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchMetadata {
    pub files_received: usize,
    pub files_processed: usize,
    pub files_failed: usize,
    /// Data rows across successfully processed tables.
    pub rows_seen: usize,
}

/// The complete output of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub readings: Vec<SensorReading>,
    pub alerts: Vec<AlertEntry>,
    pub daily_aggregates: Vec<DailyAggregate>,
    pub summary: SummaryStatistics,
    pub file_errors: Vec<FileError>,
    pub metadata: BatchMetadata,
}

impl BatchResult {
    /// `true` when no table contributed readings.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Fold in failures from files that never became tables (e.g. unreadable
    /// on disk), ahead of the errors raised during processing.
    pub fn record_load_errors(&mut self, errors: Vec<FileError>) {
        self.metadata.files_received += errors.len();
        self.metadata.files_failed += errors.len();
        self.file_errors.splice(0..0, errors);
    }
}

// ── Per-table stage ───────────────────────────────────────────────────────────

/// Normalize one table and evaluate its alerts.
pub fn process_table(table: &SensorTable, thresholds: &ThresholdConfig) -> Result<TableOutput> {
    let readings = normalize(table, &table.file_source)?;
    let alerts = alerts::evaluate(&readings, thresholds);
    Ok(TableOutput {
        readings,
        alerts,
        rows: table.row_count(),
    })
}

// ── BatchCollector ────────────────────────────────────────────────────────────

/// Append-only accumulator for per-table outcomes.
///
/// Outcomes must be pushed in input order; [`BatchCollector::finish`] runs
/// the aggregation step exactly once.
#[derive(Debug, Default)]
pub struct BatchCollector {
    readings: Vec<SensorReading>,
    alerts: Vec<AlertEntry>,
    file_errors: Vec<FileError>,
    metadata: BatchMetadata,
}

impl BatchCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of processing the table named `file_source`.
    pub fn push(&mut self, file_source: &str, outcome: Result<TableOutput>) {
        self.metadata.files_received += 1;
        match outcome {
            Ok(output) => {
                self.metadata.files_processed += 1;
                self.metadata.rows_seen += output.rows;
                self.readings.extend(output.readings);
                self.alerts.extend(output.alerts);
            }
            Err(e) => {
                warn!("Error processing {}: {}", file_source, e);
                self.metadata.files_failed += 1;
                self.file_errors.push(FileError::new(file_source, &e));
            }
        }
    }

    /// Aggregate everything collected so far into a [`BatchResult`].
    pub fn finish(self) -> BatchResult {
        if self.metadata.files_received == 0 {
            info!("Empty batch: no tables supplied");
        }

        let (daily_aggregates, summary) = DailyAggregator::aggregate(&self.readings);

        info!(
            "Batch complete: {} files ok, {} failed, {} readings, {} alerts",
            self.metadata.files_processed,
            self.metadata.files_failed,
            self.readings.len(),
            self.alerts.len()
        );

        BatchResult {
            readings: self.readings,
            alerts: self.alerts,
            daily_aggregates,
            summary,
            file_errors: self.file_errors,
            metadata: self.metadata,
        }
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full pipeline sequentially over `tables`.
pub fn run(tables: &[SensorTable], thresholds: ThresholdConfig) -> BatchResult {
    let mut collector = BatchCollector::new();
    for table in tables {
        collector.push(&table.file_source, process_table(table, &thresholds));
    }
    collector.finish()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
