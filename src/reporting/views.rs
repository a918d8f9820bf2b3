//! Dashboard views: per-type statistics and trend series.

use std::collections::BTreeMap;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Timelike, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::buckets::mean;
use crate::domain::{EventType, TrashLogEntry, WasteType};

/// Days covered by the emissions trend.
pub const EMISSIONS_TREND_DAYS: u64 = 30;
/// Days covered by the collected-weight chart.
pub const COLLECTED_WEIGHT_DAYS: u64 = 7;

/// Lifetime statistics for one bin.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TypeStatistics {
    /// Bin the statistics describe.
    pub waste_type: WasteType,
    /// Number of add events.
    pub add_count: u64,
    /// Number of empty events.
    pub empty_count: u64,
    /// Volume deposited over all adds.
    pub total_volume_added: f64,
    /// Weight deposited over all adds.
    pub total_weight_added: f64,
    /// Mean volume per add.
    pub avg_volume_added: f64,
    /// Mean weight per add.
    pub avg_weight_added: f64,
    /// Weight removed over all empties.
    pub total_weight_emptied: f64,
    /// Summed signed CO2e.
    pub total_co2: f64,
}

/// One point of the daily emissions trend.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailyEmissions {
    /// Calendar day (UTC).
    pub date: NaiveDate,
    /// Bin the point describes.
    pub waste_type: WasteType,
    /// Weight deposited that day.
    pub weight_added: f64,
    /// Weight emptied that day.
    pub weight_emptied: f64,
    /// Signed CO2e recognized that day.
    pub total_co2: f64,
}

/// Activity for one hour of the current day.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HourlyActivity {
    /// Hour label, e.g. `"14:00"`.
    pub hour: String,
    /// Bin the row describes.
    pub waste_type: WasteType,
    /// Mean event volume in that hour.
    pub avg_volume: f64,
    /// Number of events in that hour.
    pub event_count: u64,
}

/// Weight deposited per day, both bins side by side.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailyCollectedWeight {
    /// Calendar day (UTC).
    pub date: NaiveDate,
    /// Weight added to the general waste bin.
    pub normal_weight: f64,
    /// Weight added to the recycling bin.
    pub recycle_weight: f64,
}

/// Midnight UTC `days` days before the day containing `now`.
#[must_use]
pub fn window_start(now: DateTime<Utc>, days: u64) -> DateTime<Utc> {
    let today = now.date_naive();
    today
        .checked_sub_days(Days::new(days))
        .unwrap_or(NaiveDate::MIN)
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// Lifetime statistics for both bins, normal first.
///
/// Bins without events report zeroes.
#[must_use]
pub fn type_statistics(entries: &[TrashLogEntry]) -> Vec<TypeStatistics> {
    WasteType::ALL
        .into_iter()
        .map(|waste_type| {
            let mut stats = TypeStatistics {
                waste_type,
                add_count: 0,
                empty_count: 0,
                total_volume_added: 0.0,
                total_weight_added: 0.0,
                avg_volume_added: 0.0,
                avg_weight_added: 0.0,
                total_weight_emptied: 0.0,
                total_co2: 0.0,
            };
            for entry in entries.iter().filter(|e| e.waste_type == waste_type) {
                match entry.event_type {
                    EventType::Add => {
                        stats.add_count += 1;
                        stats.total_volume_added += entry.volume;
                        stats.total_weight_added += entry.weight;
                    }
                    EventType::Empty => {
                        stats.empty_count += 1;
                        stats.total_weight_emptied += entry.weight;
                    }
                }
                stats.total_co2 += entry.co2_emissions;
            }
            stats.avg_volume_added = mean(stats.total_volume_added, stats.add_count);
            stats.avg_weight_added = mean(stats.total_weight_added, stats.add_count);
            stats
        })
        .collect()
}

/// Daily weight and CO2e per bin, ascending by date then bin.
#[must_use]
pub fn daily_emissions(entries: &[TrashLogEntry]) -> Vec<DailyEmissions> {
    let mut days: BTreeMap<(NaiveDate, WasteType), DailyEmissions> = BTreeMap::new();
    for entry in entries {
        let date = entry.timestamp.date_naive();
        let point = days
            .entry((date, entry.waste_type))
            .or_insert_with(|| DailyEmissions {
                date,
                waste_type: entry.waste_type,
                weight_added: 0.0,
                weight_emptied: 0.0,
                total_co2: 0.0,
            });
        match entry.event_type {
            EventType::Add => point.weight_added += entry.weight,
            EventType::Empty => point.weight_emptied += entry.weight,
        }
        point.total_co2 += entry.co2_emissions;
    }
    days.into_values().collect()
}

/// Per-hour activity of the given entries, ascending by hour then bin.
#[must_use]
pub fn hourly_activity(entries: &[TrashLogEntry]) -> Vec<HourlyActivity> {
    let mut hours: BTreeMap<(u32, WasteType), (f64, u64)> = BTreeMap::new();
    for entry in entries {
        let slot = hours
            .entry((entry.timestamp.hour(), entry.waste_type))
            .or_insert((0.0, 0));
        slot.0 += entry.volume;
        slot.1 += 1;
    }
    hours
        .into_iter()
        .map(|((hour, waste_type), (volume, count))| HourlyActivity {
            hour: format!("{hour:02}:00"),
            waste_type,
            avg_volume: mean(volume, count),
            event_count: count,
        })
        .collect()
}

/// Weight deposited per day by add events, ascending by date.
///
/// Days without adds are omitted; a day with adds to only one bin reports
/// zero for the other.
#[must_use]
pub fn daily_collected_weight(entries: &[TrashLogEntry]) -> Vec<DailyCollectedWeight> {
    let mut days: BTreeMap<NaiveDate, DailyCollectedWeight> = BTreeMap::new();
    for entry in entries.iter().filter(|e| e.event_type == EventType::Add) {
        let date = entry.timestamp.date_naive();
        let day = days.entry(date).or_insert_with(|| DailyCollectedWeight {
            date,
            normal_weight: 0.0,
            recycle_weight: 0.0,
        });
        match entry.waste_type {
            WasteType::Normal => day.normal_weight += entry.weight,
            WasteType::Recycle => day.recycle_weight += entry.weight,
        }
    }
    days.into_values().collect()
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        let Some(ts) = Utc.with_ymd_and_hms(2026, 5, d, h, 15, 0).single() else {
            panic!("valid timestamp");
        };
        ts
    }

    fn add(ts: DateTime<Utc>, waste_type: WasteType, volume: f64, weight: f64) -> TrashLogEntry {
        TrashLogEntry {
            id: 0,
            batch_id: Uuid::new_v4(),
            waste_type,
            volume,
            weight,
            event_type: EventType::Add,
            co2_emissions: 0.0,
            timestamp: ts,
        }
    }

    fn empty(ts: DateTime<Utc>, waste_type: WasteType, weight: f64, co2: f64) -> TrashLogEntry {
        TrashLogEntry {
            event_type: EventType::Empty,
            co2_emissions: co2,
            ..add(ts, waste_type, weight, weight)
        }
    }

    #[test]
    fn window_start_is_midnight_days_ago() {
        let start = window_start(at(10, 13), 7);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 5, 3, 0, 0, 0).single().unwrap_or_default());
    }

    #[test]
    fn statistics_split_adds_and_empties() {
        let entries = vec![
            add(at(1, 8), WasteType::Normal, 10.0, 4.0),
            add(at(1, 9), WasteType::Normal, 6.0, 2.0),
            empty(at(1, 20), WasteType::Normal, 6.0, 3.0),
        ];
        let stats = type_statistics(&entries);

        assert_eq!(stats.len(), 2);
        let normal = &stats[0];
        assert_eq!(normal.add_count, 2);
        assert_eq!(normal.empty_count, 1);
        assert_eq!(normal.total_weight_added, 6.0);
        assert_eq!(normal.avg_volume_added, 8.0);
        assert_eq!(normal.total_weight_emptied, 6.0);
        assert_eq!(normal.total_co2, 3.0);

        let recycle = &stats[1];
        assert_eq!(recycle.waste_type, WasteType::Recycle);
        assert_eq!(recycle.add_count, 0);
        assert_eq!(recycle.avg_weight_added, 0.0);
    }

    #[test]
    fn daily_emissions_group_by_date_and_type() {
        let entries = vec![
            add(at(2, 8), WasteType::Recycle, 5.0, 2.0),
            empty(at(2, 18), WasteType::Recycle, 2.0, -3.8),
            empty(at(1, 18), WasteType::Normal, 4.0, 2.0),
        ];
        let trend = daily_emissions(&entries);

        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].date, at(1, 0).date_naive());
        assert_eq!(trend[0].total_co2, 2.0);
        assert_eq!(trend[1].weight_added, 2.0);
        assert_eq!(trend[1].weight_emptied, 2.0);
        assert_eq!(trend[1].total_co2, -3.8);
    }

    #[test]
    fn hourly_activity_averages_volume() {
        let entries = vec![
            add(at(3, 14), WasteType::Normal, 4.0, 1.0),
            add(at(3, 14), WasteType::Normal, 8.0, 1.0),
            add(at(3, 9), WasteType::Recycle, 3.0, 1.0),
        ];
        let hourly = hourly_activity(&entries);

        assert_eq!(hourly.len(), 2);
        assert_eq!(hourly[0].hour, "09:00");
        assert_eq!(hourly[1].hour, "14:00");
        assert_eq!(hourly[1].avg_volume, 6.0);
        assert_eq!(hourly[1].event_count, 2);
    }

    #[test]
    fn collected_weight_ignores_empties_and_fills_missing_type() {
        let entries = vec![
            add(at(4, 8), WasteType::Normal, 5.0, 2.5),
            empty(at(4, 9), WasteType::Normal, 2.5, 1.25),
            add(at(5, 8), WasteType::Recycle, 5.0, 1.5),
            add(at(5, 10), WasteType::Normal, 5.0, 1.0),
        ];
        let collected = daily_collected_weight(&entries);

        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].normal_weight, 2.5);
        assert_eq!(collected[0].recycle_weight, 0.0);
        assert_eq!(collected[1].normal_weight, 1.0);
        assert_eq!(collected[1].recycle_weight, 1.5);
    }
}
