//! Daily aggregation and batch statistics.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use sensor_core::models::{
    ChannelStats, DailyAggregate, DateRange, Platform, SensorReading, SensorType,
    SummaryStatistics, ValueStats,
};

// ── RunningStats ──────────────────────────────────────────────────────────────

/// Count / sum / min / max accumulated over a stream of values.
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    pub count: usize,
    pub sum: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl RunningStats {
    pub fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    /// Arithmetic mean, `None` when nothing was added.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    pub fn value_stats(&self) -> Option<ValueStats> {
        Some(ValueStats {
            min: self.min?,
            max: self.max?,
            mean: self.mean()?,
        })
    }
}

// ── Grouping key ──────────────────────────────────────────────────────────────

/// `(date, sensor_id, platform)`; ordering gives the output order.
type DailyKey = (NaiveDate, String, Platform);

struct DailyGroup {
    sensor_type: SensorType,
    stats: RunningStats,
}

// ── DailyAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that groups readings by day and summarises the batch.
pub struct DailyAggregator;

impl DailyAggregator {
    /// Daily means and summary statistics in one call.
    pub fn aggregate(readings: &[SensorReading]) -> (Vec<DailyAggregate>, SummaryStatistics) {
        (Self::aggregate_daily(readings), Self::summarize(readings))
    }

    /// Mean value per `(date, sensor_id, platform)`.
    ///
    /// Returns aggregates sorted by date, then sensor id, then platform.
    pub fn aggregate_daily(readings: &[SensorReading]) -> Vec<DailyAggregate> {
        let mut map: BTreeMap<DailyKey, DailyGroup> = BTreeMap::new();

        for r in readings {
            map.entry((r.date, r.sensor_id.clone(), r.platform))
                .or_insert_with(|| DailyGroup {
                    sensor_type: r.sensor_type,
                    stats: RunningStats::default(),
                })
                .stats
                .add(r.value);
        }

        map.into_iter()
            .filter_map(|((date, sensor_id, platform), group)| {
                Some(DailyAggregate {
                    date,
                    sensor_id,
                    platform,
                    sensor_type: group.sensor_type,
                    mean_value: group.stats.mean()?,
                })
            })
            .collect()
    }

    /// Batch-wide statistics over the ungrouped readings.
    pub fn summarize(readings: &[SensorReading]) -> SummaryStatistics {
        let mut temperature = ChannelAccumulator::default();
        let mut strain = ChannelAccumulator::default();
        let mut platforms = BTreeSet::new();
        let mut files = BTreeSet::new();
        let mut date_range: Option<DateRange> = None;

        for r in readings {
            match r.sensor_type {
                SensorType::Temperature => temperature.add(r),
                SensorType::Strain => strain.add(r),
                SensorType::Unknown => {}
            }
            platforms.insert(r.platform);
            if !files.contains(&r.file_source) {
                files.insert(r.file_source.clone());
            }
            date_range = Some(match date_range {
                None => DateRange {
                    start: r.date,
                    end: r.date,
                },
                Some(range) => DateRange {
                    start: range.start.min(r.date),
                    end: range.end.max(r.date),
                },
            });
        }

        SummaryStatistics {
            total_records: readings.len(),
            temperature: temperature.finish(),
            strain: strain.finish(),
            platforms,
            files,
            date_range,
        }
    }
}

#[derive(Default)]
struct ChannelAccumulator {
    stats: RunningStats,
    sensors: BTreeSet<String>,
}

impl ChannelAccumulator {
    fn add(&mut self, reading: &SensorReading) {
        self.stats.add(reading.value);
        if !self.sensors.contains(&reading.sensor_id) {
            self.sensors.insert(reading.sensor_id.clone());
        }
    }

    fn finish(self) -> ChannelStats {
        ChannelStats {
            count: self.stats.count,
            values: self.stats.value_stats(),
            sensors: self.sensors,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn reading(
        ts: &str,
        sensor_id: &str,
        sensor_type: SensorType,
        platform: Platform,
        value: f64,
    ) -> SensorReading {
        let timestamp = NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap();
        SensorReading {
            timestamp,
            date: timestamp.date(),
            value,
            sensor_type,
            platform,
            sensor_id: sensor_id.to_string(),
            file_source: "a.csv".to_string(),
        }
    }

    fn temp(ts: &str, sensor_id: &str, value: f64) -> SensorReading {
        reading(ts, sensor_id, SensorType::Temperature, Platform::Win, value)
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    // ── RunningStats ──────────────────────────────────────────────────────────

    #[test]
    fn test_running_stats_empty() {
        let s = RunningStats::default();
        assert_eq!(s.mean(), None);
        assert_eq!(s.value_stats(), None);
    }

    #[test]
    fn test_running_stats_values() {
        let mut s = RunningStats::default();
        for v in [3.0, -1.0, 4.0] {
            s.add(v);
        }
        assert_eq!(
            s.value_stats(),
            Some(ValueStats {
                min: -1.0,
                max: 4.0,
                mean: 2.0
            })
        );
    }

    // ── aggregate_daily ───────────────────────────────────────────────────────

    #[test]
    fn test_daily_mean_per_key() {
        let readings = vec![
            temp("2024-01-01 00:00:00", "Temp1_WIN", 45.0),
            temp("2024-01-01 12:00:00", "Temp1_WIN", 55.0),
            temp("2024-01-02 00:00:00", "Temp1_WIN", 10.0),
        ];
        let daily = DailyAggregator::aggregate_daily(&readings);

        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].date, day("2024-01-01"));
        assert_eq!(daily[0].mean_value, 50.0);
        assert_eq!(daily[0].sensor_type, SensorType::Temperature);
        assert_eq!(daily[1].date, day("2024-01-02"));
        assert_eq!(daily[1].mean_value, 10.0);
    }

    #[test]
    fn test_daily_groups_are_exhaustive_and_disjoint() {
        let readings = vec![
            temp("2024-01-01 01:00:00", "Temp1_WIN", 1.0),
            temp("2024-01-01 02:00:00", "Temp2_WIN", 2.0),
            reading(
                "2024-01-01 03:00:00",
                "Strain1_NC",
                SensorType::Strain,
                Platform::Nc,
                300.0,
            ),
            temp("2024-01-01 04:00:00", "Temp1_WIN", 3.0),
        ];
        let daily = DailyAggregator::aggregate_daily(&readings);

        assert_eq!(daily.len(), 3);
        let keys: Vec<&str> = daily.iter().map(|d| d.sensor_id.as_str()).collect();
        assert_eq!(keys, vec!["Strain1_NC", "Temp1_WIN", "Temp2_WIN"]);
        assert_eq!(daily[1].mean_value, 2.0);
    }

    #[test]
    fn test_daily_sorted_by_date() {
        let readings = vec![
            temp("2024-01-20 08:00:00", "Temp1_WIN", 1.0),
            temp("2024-01-10 08:00:00", "Temp1_WIN", 1.0),
            temp("2024-01-15 08:00:00", "Temp1_WIN", 1.0),
        ];
        let dates: Vec<NaiveDate> = DailyAggregator::aggregate_daily(&readings)
            .iter()
            .map(|d| d.date)
            .collect();
        assert_eq!(
            dates,
            vec![day("2024-01-10"), day("2024-01-15"), day("2024-01-20")]
        );
    }

    #[test]
    fn test_daily_empty() {
        assert!(DailyAggregator::aggregate_daily(&[]).is_empty());
    }

    // ── summarize ─────────────────────────────────────────────────────────────

    #[test]
    fn test_summary_per_type() {
        let readings = vec![
            temp("2024-01-01 00:00:00", "Temp1_WIN", 45.0),
            temp("2024-01-03 12:00:00", "Temp1_WIN", 55.0),
            reading(
                "2024-01-02 00:00:00",
                "Strain1_NC",
                SensorType::Strain,
                Platform::Nc,
                6000.0,
            ),
        ];
        let summary = DailyAggregator::summarize(&readings);

        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.temperature.count, 2);
        assert_eq!(
            summary.temperature.values,
            Some(ValueStats {
                min: 45.0,
                max: 55.0,
                mean: 50.0
            })
        );
        assert_eq!(summary.strain.count, 1);
        assert!(summary.strain.sensors.contains("Strain1_NC"));
        assert_eq!(
            summary.platforms.iter().copied().collect::<Vec<_>>(),
            vec![Platform::Win, Platform::Nc]
        );
        assert_eq!(summary.files.len(), 1);
        assert_eq!(
            summary.date_range,
            Some(DateRange {
                start: day("2024-01-01"),
                end: day("2024-01-03"),
            })
        );
    }

    #[test]
    fn test_summary_missing_type_is_no_data() {
        let readings = vec![temp("2024-01-01 00:00:00", "Temp1_WIN", 45.0)];
        let summary = DailyAggregator::summarize(&readings);

        assert!(summary.temperature.has_data());
        assert_eq!(summary.strain.count, 0);
        assert!(summary.strain.values.is_none());
        assert!(summary.strain.sensors.is_empty());
    }

    #[test]
    fn test_summary_empty_batch() {
        let summary = DailyAggregator::summarize(&[]);
        assert_eq!(summary, SummaryStatistics::default());
    }
}
