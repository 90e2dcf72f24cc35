use std::collections::BTreeSet;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Physical quantity a sensor column measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorType {
    Temperature,
    Strain,
    /// Column name matched neither pattern. Never materialised into readings.
    Unknown,
}

impl SensorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Strain => "strain",
            Self::Unknown => "unknown",
        }
    }

    /// `true` for the types that produce readings.
    pub fn is_measured(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Test rig a sensor is mounted on, encoded in the column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "WIN")]
    Win,
    #[serde(rename = "NC")]
    Nc,
    Unknown,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Win => "WIN",
            Self::Nc => "NC",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalised observation: a single sensor value at a single instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Wall-clock instant as recorded in the source file (no zone conversion).
    pub timestamp: NaiveDateTime,
    /// Calendar date of `timestamp`.
    pub date: NaiveDate,
    pub value: f64,
    pub sensor_type: SensorType,
    pub platform: Platform,
    /// Original column name, verbatim.
    pub sensor_id: String,
    /// Base name of the file the reading came from.
    pub file_source: String,
}

/// Alert category. Only measured sensor types can raise alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Temperature,
    Strain,
}

impl AlertKind {
    /// Map a sensor type onto its alert kind; `None` for [`SensorType::Unknown`].
    pub fn from_sensor_type(sensor_type: SensorType) -> Option<Self> {
        match sensor_type {
            SensorType::Temperature => Some(Self::Temperature),
            SensorType::Strain => Some(Self::Strain),
            SensorType::Unknown => None,
        }
    }
}

/// One reading that exceeded its threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEntry {
    pub kind: AlertKind,
    pub value: f64,
    /// Threshold in force when the reading was evaluated.
    pub threshold: f64,
    pub sensor_id: String,
    pub platform: Platform,
    /// `%Y-%m-%d %H:%M:%S`.
    pub timestamp: String,
    pub file_source: String,
}

/// Alert thresholds for one engine invocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub temperature_threshold: f64,
    pub strain_threshold: f64,
}

impl ThresholdConfig {
    pub const DEFAULT_TEMPERATURE: f64 = 50.0;
    pub const DEFAULT_STRAIN: f64 = 5000.0;

    pub fn new(temperature_threshold: f64, strain_threshold: f64) -> Self {
        Self {
            temperature_threshold,
            strain_threshold,
        }
    }

    /// Threshold applying to `kind`.
    pub fn for_kind(&self, kind: AlertKind) -> f64 {
        match kind {
            AlertKind::Temperature => self.temperature_threshold,
            AlertKind::Strain => self.strain_threshold,
        }
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TEMPERATURE, Self::DEFAULT_STRAIN)
    }
}

/// Mean value of one sensor on one platform for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub sensor_id: String,
    pub platform: Platform,
    pub sensor_type: SensorType,
    pub mean_value: f64,
}

/// Min / max / mean over a non-empty set of values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Batch-wide statistics for one sensor type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelStats {
    pub count: usize,
    /// `None` when the batch has no readings of this type.
    pub values: Option<ValueStats>,
    /// Distinct sensor ids seen for this type.
    pub sensors: BTreeSet<String>,
}

impl ChannelStats {
    pub fn has_data(&self) -> bool {
        self.values.is_some()
    }
}

/// Inclusive first and last calendar date of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Whole-batch summary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub total_records: usize,
    pub temperature: ChannelStats,
    pub strain: ChannelStats,
    pub platforms: BTreeSet<Platform>,
    pub files: BTreeSet<String>,
    /// `None` for an empty batch.
    pub date_range: Option<DateRange>,
}

impl SummaryStatistics {
    /// Statistics for `sensor_type`; `None` for [`SensorType::Unknown`].
    pub fn channel(&self, sensor_type: SensorType) -> Option<&ChannelStats> {
        match sensor_type {
            SensorType::Temperature => Some(&self.temperature),
            SensorType::Strain => Some(&self.strain),
            SensorType::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_serializes_as_tag() {
        assert_eq!(serde_json::to_string(&Platform::Win).unwrap(), "\"WIN\"");
        assert_eq!(serde_json::to_string(&Platform::Nc).unwrap(), "\"NC\"");
        assert_eq!(
            serde_json::to_string(&Platform::Unknown).unwrap(),
            "\"Unknown\""
        );
    }

    #[test]
    fn test_sensor_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SensorType::Temperature).unwrap(),
            "\"temperature\""
        );
        assert_eq!(SensorType::Strain.to_string(), "strain");
        assert!(!SensorType::Unknown.is_measured());
    }

    #[test]
    fn test_alert_kind_from_sensor_type() {
        assert_eq!(
            AlertKind::from_sensor_type(SensorType::Strain),
            Some(AlertKind::Strain)
        );
        assert_eq!(AlertKind::from_sensor_type(SensorType::Unknown), None);
    }

    #[test]
    fn test_threshold_defaults() {
        let t = ThresholdConfig::default();
        assert_eq!(t.for_kind(AlertKind::Temperature), 50.0);
        assert_eq!(t.for_kind(AlertKind::Strain), 5000.0);
    }

    #[test]
    fn test_empty_summary_has_no_data() {
        let s = SummaryStatistics::default();
        assert!(!s.temperature.has_data());
        assert!(s.channel(SensorType::Strain).unwrap().sensors.is_empty());
        assert!(s.channel(SensorType::Unknown).is_none());
        assert!(s.date_range.is_none());
    }
}
