//! Threshold alert evaluation.

use sensor_core::data_processors::TimestampProcessor;
use sensor_core::models::{AlertEntry, AlertKind, SensorReading, ThresholdConfig};

/// Check a single reading. Returns an alert iff the value is strictly above
/// the threshold for its sensor type.
pub fn check_reading(reading: &SensorReading, thresholds: &ThresholdConfig) -> Option<AlertEntry> {
    let kind = AlertKind::from_sensor_type(reading.sensor_type)?;
    let threshold = thresholds.for_kind(kind);
    if reading.value <= threshold {
        return None;
    }
    Some(AlertEntry {
        kind,
        value: reading.value,
        threshold,
        sensor_id: reading.sensor_id.clone(),
        platform: reading.platform,
        timestamp: TimestampProcessor::format(&reading.timestamp),
        file_source: reading.file_source.clone(),
    })
}

/// Evaluate every reading, one alert per qualifying reading, in input order.
pub fn evaluate(readings: &[SensorReading], thresholds: &ThresholdConfig) -> Vec<AlertEntry> {
    readings
        .iter()
        .filter_map(|r| check_reading(r, thresholds))
        .collect()
}
