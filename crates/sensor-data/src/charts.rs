//! Chart-ready grouping of daily aggregates.
//!
//! One chart per sensor type, one line per platform, with the active
//! threshold carried along for the critical-level marker. Rendering is left
//! to the consumer.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sensor_core::models::{DailyAggregate, Platform, SensorType};

/// A single plotted point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub sensor_id: String,
    pub mean_value: f64,
}

/// All points for one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformSeries {
    pub platform: Platform,
    pub points: Vec<SeriesPoint>,
}

/// Daily means of one sensor type, split by platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub sensor_type: SensorType,
    pub threshold: f64,
    pub series: Vec<PlatformSeries>,
}

impl ChartSeries {
    /// Build the chart for `sensor_type` from `aggregates`.
    ///
    /// Platforms appear in `WIN`, `NC`, `Unknown` order; points are ordered
    /// by date, then sensor id. Platforms without data are omitted.
    pub fn build(aggregates: &[DailyAggregate], sensor_type: SensorType, threshold: f64) -> Self {
        let mut by_platform: BTreeMap<Platform, Vec<SeriesPoint>> = BTreeMap::new();

        for agg in aggregates.iter().filter(|a| a.sensor_type == sensor_type) {
            by_platform.entry(agg.platform).or_default().push(SeriesPoint {
                date: agg.date,
                sensor_id: agg.sensor_id.clone(),
                mean_value: agg.mean_value,
            });
        }

        let series = by_platform
            .into_iter()
            .map(|(platform, mut points)| {
                points.sort_by(|a, b| {
                    a.date
                        .cmp(&b.date)
                        .then_with(|| a.sensor_id.cmp(&b.sensor_id))
                });
                PlatformSeries { platform, points }
            })
            .collect();

        Self {
            sensor_type,
            threshold,
            series,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
