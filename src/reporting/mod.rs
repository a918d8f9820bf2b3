//! Read-only reporting over the trash log.
//!
//! Everything here is a pure function of a slice of [`crate::domain::TrashLogEntry`]
//! values, so the same views work over any [`crate::persistence::LedgerStore`].

pub mod buckets;
pub mod replay;
pub mod views;

pub use buckets::{BucketTotals, TimeBucket, group_entries};
pub use replay::{AuditReport, ReplayedBins, audit, replay};
pub use views::{
    DailyCollectedWeight, DailyEmissions, HourlyActivity, TypeStatistics, daily_collected_weight,
    daily_emissions, hourly_activity, type_statistics, window_start,
};
