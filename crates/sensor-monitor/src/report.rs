//! JSON report handed to display clients.

use sensor_core::error::FileError;
use sensor_core::models::{
    AlertEntry, DailyAggregate, SensorReading, SensorType, SummaryStatistics, ThresholdConfig,
};
use sensor_data::charts::ChartSeries;
use sensor_data::engine::{BatchMetadata, BatchResult};
use serde::Serialize;

/// Per-type chart payloads.
#[derive(Debug, Serialize)]
pub struct Charts {
    pub temperature: ChartSeries,
    pub strain: ChartSeries,
}

/// The serialised output of one CLI run.
#[derive(Debug, Serialize)]
pub struct Report {
    /// `false` when no file yielded readings.
    pub success: bool,
    pub total_records: usize,
    /// Readings, truncated to the configured cap.
    pub readings: Vec<SensorReading>,
    pub truncated: bool,
    pub alerts: Vec<AlertEntry>,
    pub daily_aggregates: Vec<DailyAggregate>,
    pub summary: SummaryStatistics,
    pub charts: Charts,
    pub errors: Vec<FileError>,
    pub metadata: BatchMetadata,
    pub thresholds: ThresholdConfig,
}

impl Report {
    /// Build a report from `result`. A `max_readings` of zero disables the cap.
    pub fn build(result: BatchResult, thresholds: ThresholdConfig, max_readings: usize) -> Self {
        let BatchResult {
            mut readings,
            alerts,
            daily_aggregates,
            summary,
            file_errors,
            metadata,
        } = result;

        let total_records = readings.len();
        let truncated = max_readings > 0 && total_records > max_readings;
        if truncated {
            readings.truncate(max_readings);
        }

        let charts = Charts {
            temperature: ChartSeries::build(
                &daily_aggregates,
                SensorType::Temperature,
                thresholds.temperature_threshold,
            ),
            strain: ChartSeries::build(
                &daily_aggregates,
                SensorType::Strain,
                thresholds.strain_threshold,
            ),
        };

        Self {
            success: total_records > 0,
            total_records,
            readings,
            truncated,
            alerts,
            daily_aggregates,
            summary,
            charts,
            errors: file_errors,
            metadata,
            thresholds,
        }
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
