//! Column-name classification.
//!
//! Every decision about what a column holds is made here, from the header
//! text alone.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::{Platform, SensorType};

fn temperature_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^temp\d*[_\w/]*").expect("regex is valid"))
}

fn strain_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^strain\d*[_\w/]*").expect("regex is valid"))
}

/// Classify a column into `(sensor_type, platform)`.
pub fn classify(column_name: &str) -> (SensorType, Platform) {
    (sensor_type(column_name), platform(column_name))
}

/// Sensor type from an anchored prefix match on the lower-cased name.
///
/// `"Temp1_WIN"` is temperature, `"skin_temp"` is not.
pub fn sensor_type(column_name: &str) -> SensorType {
    let lower = column_name.to_lowercase();
    if temperature_pattern().is_match(&lower) {
        SensorType::Temperature
    } else if strain_pattern().is_match(&lower) {
        SensorType::Strain
    } else {
        SensorType::Unknown
    }
}

/// Platform from a case-insensitive substring match. `WIN` wins over `NC`.
pub fn platform(column_name: &str) -> Platform {
    let upper = column_name.to_uppercase();
    if upper.contains("WIN") {
        Platform::Win
    } else if upper.contains("NC") {
        Platform::Nc
    } else {
        Platform::Unknown
    }
}

/// Index of the first header whose lower-cased name contains `timestamp`.
pub fn find_timestamp_column<S: AsRef<str>>(headers: &[S]) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.as_ref().to_lowercase().contains("timestamp"))
}
