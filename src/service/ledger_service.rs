//! Ledger service: the single owner of bin state and emissions totals.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use utoipa::ToSchema;

use crate::domain::{
    BinState, EmissionsFactors, EmissionsSummary, EmptyTarget, LedgerState, LedgerTransition,
    TrashLogEntry, WasteType,
};
use crate::error::LedgerError;
use crate::persistence::{HistoryQuery, LedgerCommit, LedgerStore};
use crate::reporting::{
    self, AuditReport, BucketTotals, DailyCollectedWeight, DailyEmissions, HourlyActivity,
    TimeBucket, TypeStatistics,
};

/// Everything the dashboard renders, read in one pass.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Dashboard {
    /// Current bin contents.
    pub status: BinState,
    /// Running emissions totals.
    pub emissions: EmissionsSummary,
    /// Most recent log entries, newest first.
    pub recent_logs: Vec<TrashLogEntry>,
    /// Lifetime per-bin statistics.
    pub stats: Vec<TypeStatistics>,
    /// Daily emissions over the trend window, ascending.
    pub daily_emissions: Vec<DailyEmissions>,
    /// Today's activity per hour, ascending.
    pub hourly_activity: Vec<HourlyActivity>,
    /// Weight collected per day over the chart window, ascending.
    pub daily_collected: Vec<DailyCollectedWeight>,
    /// When the dashboard was assembled.
    pub generated_at: DateTime<Utc>,
}

/// Orchestration layer for all ledger operations.
///
/// Holds the authoritative [`LedgerState`] behind a single
/// [`tokio::sync::RwLock`]. Every mutation follows the pattern: acquire
/// write lock → plan the transition on a copy → commit to the store →
/// swap the copy in. A failed commit leaves both memory and store as they
/// were. Readers never observe a half-applied `both` empty.
#[derive(Debug)]
pub struct LedgerService {
    state: Arc<RwLock<LedgerState>>,
    store: Arc<dyn LedgerStore>,
    factors: EmissionsFactors,
    recent_log_limit: usize,
}

impl LedgerService {
    /// Opens the ledger over `store`, writing the zero state on first use.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::StorageFailure`] if the store cannot be read
    /// or initialized.
    pub async fn open(
        store: Arc<dyn LedgerStore>,
        factors: EmissionsFactors,
        normal_capacity: f64,
        recycle_capacity: f64,
        recent_log_limit: usize,
    ) -> Result<Self, LedgerError> {
        let initial = LedgerState::initial(normal_capacity, recycle_capacity, Utc::now());
        let state = store.initialize(&initial).await?;
        tracing::info!(
            normal_weight = state.bin.normal_weight,
            recycle_weight = state.bin.recycle_weight,
            net_co2 = state.summary.net_co2_emissions,
            "ledger opened"
        );
        Ok(Self {
            state: Arc::new(RwLock::new(state)),
            store,
            factors,
            recent_log_limit,
        })
    }

    /// Returns the active emissions factors.
    #[must_use]
    pub const fn factors(&self) -> &EmissionsFactors {
        &self.factors
    }

    /// Returns the backing store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn LedgerStore> {
        &self.store
    }

    /// Deposits waste into a bin and returns the new bin state.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidInput`] for non-positive amounts and
    /// [`LedgerError::StorageFailure`] if the commit fails.
    pub async fn add_waste(
        &self,
        waste_type: WasteType,
        volume: f64,
        weight: f64,
    ) -> Result<BinState, LedgerError> {
        self.add_waste_at(waste_type, volume, weight, Utc::now()).await
    }

    /// Like [`Self::add_waste`] with an explicit event time.
    ///
    /// # Errors
    ///
    /// See [`Self::add_waste`].
    pub async fn add_waste_at(
        &self,
        waste_type: WasteType,
        volume: f64,
        weight: f64,
        at: DateTime<Utc>,
    ) -> Result<BinState, LedgerError> {
        let factors = self.factors;
        let (state, _) = self
            .apply(|current| current.plan_add(waste_type, volume, weight, &factors, at))
            .await?;

        tracing::info!(%waste_type, volume, weight, "waste added");
        Ok(state.bin)
    }

    /// Empties one or both bins and returns the logged empty entries.
    ///
    /// Emptying an already empty bin succeeds and logs a zero entry.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidInput`] if the emissions totals would
    /// overflow and [`LedgerError::StorageFailure`] if the commit fails; in
    /// either case no bin was emptied.
    pub async fn empty_bins(&self, target: EmptyTarget) -> Result<Vec<TrashLogEntry>, LedgerError> {
        self.empty_bins_at(target, Utc::now()).await
    }

    /// Like [`Self::empty_bins`] with an explicit event time.
    ///
    /// # Errors
    ///
    /// See [`Self::empty_bins`].
    pub async fn empty_bins_at(
        &self,
        target: EmptyTarget,
        at: DateTime<Utc>,
    ) -> Result<Vec<TrashLogEntry>, LedgerError> {
        let factors = self.factors;
        let (state, entries) = self
            .apply(|current| current.plan_empty(target, &factors, at))
            .await?;

        for entry in &entries {
            tracing::info!(
                waste_type = %entry.waste_type,
                weight = entry.weight,
                co2 = entry.co2_emissions,
                "bin emptied"
            );
        }
        tracing::debug!(net_co2 = state.summary.net_co2_emissions, "emissions summary updated");
        Ok(entries)
    }

    /// Returns a snapshot of the bins.
    pub async fn status(&self) -> BinState {
        self.state.read().await.bin.clone()
    }

    /// Returns a snapshot of the emissions totals.
    pub async fn summary(&self) -> EmissionsSummary {
        self.state.read().await.summary.clone()
    }

    /// Returns bins and totals from the same instant.
    pub async fn snapshot(&self) -> LedgerState {
        self.state.read().await.clone()
    }

    /// Reads the trash log.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidDateRange`] for an inverted range and
    /// [`LedgerError::StorageFailure`] if the read fails.
    pub async fn history(&self, query: &HistoryQuery) -> Result<Vec<TrashLogEntry>, LedgerError> {
        query.validate()?;
        let entries = self.store.fetch_entries(query).await?;
        tracing::debug!(count = entries.len(), "history read");
        Ok(entries)
    }

    /// The `n` most recent entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::StorageFailure`] if the read fails.
    pub async fn recent(&self, n: usize) -> Result<Vec<TrashLogEntry>, LedgerError> {
        self.history(&HistoryQuery::recent(n)).await
    }

    /// Groups matching entries into time buckets per waste type.
    ///
    /// Order and limit in `query` are ignored; buckets are ascending.
    ///
    /// # Errors
    ///
    /// See [`Self::history`].
    pub async fn grouped_history(
        &self,
        bucket: TimeBucket,
        query: &HistoryQuery,
    ) -> Result<Vec<BucketTotals>, LedgerError> {
        let query = HistoryQuery {
            order: crate::persistence::SortOrder::Asc,
            limit: None,
            ..query.clone()
        };
        let entries = self.history(&query).await?;
        Ok(reporting::group_entries(&entries, bucket))
    }

    /// Lifetime statistics per bin.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::StorageFailure`] if the read fails.
    pub async fn statistics(&self) -> Result<Vec<TypeStatistics>, LedgerError> {
        let entries = self.history(&HistoryQuery::all()).await?;
        Ok(reporting::type_statistics(&entries))
    }

    /// Assembles the dashboard as of now.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::StorageFailure`] if a read fails.
    pub async fn dashboard(&self) -> Result<Dashboard, LedgerError> {
        self.dashboard_at(Utc::now()).await
    }

    /// Assembles the dashboard as of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::StorageFailure`] if a read fails.
    pub async fn dashboard_at(&self, now: DateTime<Utc>) -> Result<Dashboard, LedgerError> {
        let LedgerState { bin, summary } = self.snapshot().await;

        let recent_logs = self.recent(self.recent_log_limit).await?;
        let stats = self.statistics().await?;

        let trend_start = reporting::window_start(now, reporting::views::EMISSIONS_TREND_DAYS);
        let trend_entries = self.history(&HistoryQuery::range(trend_start, now)).await?;

        let today = reporting::window_start(now, 0);
        let today_entries: Vec<TrashLogEntry> = trend_entries
            .iter()
            .filter(|e| e.timestamp >= today)
            .cloned()
            .collect();

        let collected_start = reporting::window_start(now, reporting::views::COLLECTED_WEIGHT_DAYS);
        let collected_entries: Vec<TrashLogEntry> = trend_entries
            .iter()
            .filter(|e| e.timestamp >= collected_start)
            .cloned()
            .collect();

        Ok(Dashboard {
            status: bin,
            emissions: summary,
            recent_logs,
            stats,
            daily_emissions: reporting::daily_emissions(&trend_entries),
            hourly_activity: reporting::hourly_activity(&today_entries),
            daily_collected: reporting::daily_collected_weight(&collected_entries),
            generated_at: now,
        })
    }

    /// Replays the full log and compares it with the live bin state.
    ///
    /// Holds the read lock while reading so no mutation lands in between.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::StorageFailure`] if the read fails.
    pub async fn audit(&self) -> Result<AuditReport, LedgerError> {
        let state = self.state.read().await;
        let entries = self.store.fetch_entries(&HistoryQuery::all()).await?;
        let report = reporting::audit(&entries, &state.bin);
        drop(state);

        if !report.consistent {
            tracing::warn!(
                replayed_normal = report.replayed.normal.weight,
                current_normal = report.current.normal.weight,
                replayed_recycle = report.replayed.recycle.weight,
                current_recycle = report.current.recycle.weight,
                "ledger replay does not match bin state"
            );
        }
        Ok(report)
    }

    /// Plans, commits, and publishes one mutation under the write lock.
    ///
    /// The commit and swap run on a spawned task so that a cancelled
    /// request cannot leave the store committed but memory stale.
    async fn apply<F>(&self, plan: F) -> Result<(LedgerState, Vec<TrashLogEntry>), LedgerError>
    where
        F: FnOnce(&LedgerState) -> Result<LedgerTransition, LedgerError>,
    {
        let mut guard = Arc::clone(&self.state).write_owned().await;
        let transition = plan(&guard)?;
        let commit = LedgerCommit {
            state: transition.next,
            entries: transition.entries,
            summary_changed: transition.summary_changed,
        };
        let store = Arc::clone(&self.store);

        tokio::spawn(async move {
            match store.commit(&commit).await {
                Ok(appended) => {
                    *guard = commit.state;
                    Ok((guard.clone(), appended))
                }
                Err(err) => {
                    tracing::warn!(error = %err, "ledger commit failed; state unchanged");
                    Err(err)
                }
            }
        })
        .await
        .map_err(|e| LedgerError::Internal(format!("commit task failed: {e}")))?
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::EventType;
    use crate::persistence::MemoryStore;
    use chrono::{Duration, TimeZone};

    async fn make_service() -> (LedgerService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let dyn_store: Arc<dyn LedgerStore> = Arc::clone(&store) as Arc<dyn LedgerStore>;
        let Ok(service) =
            LedgerService::open(dyn_store, EmissionsFactors::default(), 100.0, 100.0, 20).await
        else {
            panic!("memory store opens");
        };
        (service, store)
    }

    #[tokio::test]
    async fn add_returns_updated_state() {
        let (service, _) = make_service().await;
        let Ok(bin) = service.add_waste(WasteType::Normal, 5.0, 2.0).await else {
            panic!("valid add");
        };
        assert_eq!(bin.normal_volume, 5.0);
        assert_eq!(bin.normal_weight, 2.0);
        assert_eq!(service.status().await, bin);
    }

    #[tokio::test]
    async fn invalid_add_changes_nothing() {
        let (service, store) = make_service().await;
        let result = service.add_waste(WasteType::Recycle, 0.0, 2.0).await;
        assert!(matches!(result, Err(LedgerError::InvalidInput(_))));
        assert_eq!(store.log_len().await, 0);
        assert_eq!(service.status().await.recycle_volume, 0.0);
    }

    #[tokio::test]
    async fn empty_normal_updates_summary() {
        let (service, _) = make_service().await;
        let _ = service.add_waste(WasteType::Normal, 20.0, 10.0).await;

        let Ok(entries) = service.empty_bins(EmptyTarget::Normal).await else {
            panic!("empty succeeds");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].co2_emissions, 5.0);
        assert_eq!(entries[0].weight, 10.0);

        let summary = service.summary().await;
        assert_eq!(summary.total_co2_landfill, 5.0);
        assert_eq!(summary.net_co2_emissions, 5.0);
        assert_eq!(service.status().await.normal_weight, 0.0);
    }

    #[tokio::test]
    async fn storage_failure_leaves_state_untouched() {
        let (service, store) = make_service().await;
        let _ = service.add_waste(WasteType::Normal, 20.0, 10.0).await;
        let _ = service.add_waste(WasteType::Recycle, 20.0, 10.0).await;
        let before = service.snapshot().await;

        store.fail_next_commit();
        let result = service.empty_bins(EmptyTarget::Both).await;
        assert!(matches!(result, Err(LedgerError::StorageFailure(_))));

        assert_eq!(service.snapshot().await, before);
        assert_eq!(store.log_len().await, 2);
    }

    #[tokio::test]
    async fn concurrent_adds_are_not_lost() {
        let (service, store) = make_service().await;
        let service = Arc::new(service);

        let mut handles = Vec::new();
        for _ in 0..50 {
            let svc = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                svc.add_waste(WasteType::Recycle, 1.0, 0.5).await
            }));
        }
        for handle in handles {
            let Ok(Ok(_)) = handle.await else {
                panic!("add failed");
            };
        }

        let bin = service.status().await;
        assert_eq!(bin.recycle_volume, 50.0);
        assert_eq!(bin.recycle_weight, 25.0);
        assert_eq!(store.log_len().await, 50);
    }

    #[tokio::test]
    async fn history_range_filters_and_orders() {
        let (service, _) = make_service().await;
        let Some(base) = Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).single() else {
            panic!("valid timestamp");
        };
        for offset in [5_i64, 1, 3, 9] {
            let _ = service
                .add_waste_at(WasteType::Normal, 1.0, 1.0, base + Duration::hours(offset))
                .await;
        }

        let query = HistoryQuery::range(base + Duration::hours(1), base + Duration::hours(5));
        let Ok(entries) = service.history(&query).await else {
            panic!("history read");
        };
        let hours: Vec<i64> = entries
            .iter()
            .map(|e| (e.timestamp - base).num_hours())
            .collect();
        assert_eq!(hours, vec![1, 3, 5]);
    }

    #[tokio::test]
    async fn inverted_range_is_invalid_input() {
        let (service, _) = make_service().await;
        let now = Utc::now();
        let result = service
            .history(&HistoryQuery::range(now, now - Duration::days(1)))
            .await;
        let Err(err) = result else {
            panic!("expected error");
        };
        assert!(err.is_invalid_input());
    }

    #[tokio::test]
    async fn dashboard_on_empty_ledger_is_zeroed() {
        let (service, _) = make_service().await;
        let Ok(dashboard) = service.dashboard().await else {
            panic!("dashboard builds");
        };
        assert!(dashboard.recent_logs.is_empty());
        assert_eq!(dashboard.stats.len(), 2);
        assert_eq!(dashboard.emissions.net_co2_emissions, 0.0);
        assert!(dashboard.daily_emissions.is_empty());
    }

    #[tokio::test]
    async fn dashboard_windows_follow_now() {
        let (service, _) = make_service().await;
        let Some(now) = Utc.with_ymd_and_hms(2026, 6, 20, 15, 30, 0).single() else {
            panic!("valid timestamp");
        };
        let _ = service
            .add_waste_at(WasteType::Normal, 4.0, 2.0, now - Duration::days(10))
            .await;
        let _ = service
            .add_waste_at(WasteType::Recycle, 2.0, 1.0, now - Duration::hours(2))
            .await;
        let _ = service.empty_bins_at(EmptyTarget::Both, now - Duration::hours(1)).await;

        let Ok(dashboard) = service.dashboard_at(now).await else {
            panic!("dashboard builds");
        };
        assert_eq!(dashboard.recent_logs.len(), 4);
        assert_eq!(dashboard.recent_logs[0].event_type, EventType::Empty);
        // the 10-day-old add is outside the 7-day collected window
        assert_eq!(dashboard.daily_collected.len(), 1);
        assert_eq!(dashboard.daily_collected[0].recycle_weight, 1.0);
        // 13:00 recycle add, then both empties at 14:00
        assert_eq!(dashboard.hourly_activity.len(), 3);
        assert_eq!(dashboard.hourly_activity[0].hour, "13:00");
        assert_eq!(dashboard.hourly_activity[1].hour, "14:00");
    }

    #[tokio::test]
    async fn audit_confirms_consistency() {
        let (service, _) = make_service().await;
        let _ = service.add_waste(WasteType::Normal, 3.0, 1.5).await;
        let _ = service.empty_bins(EmptyTarget::Recycle).await;
        let _ = service.add_waste(WasteType::Recycle, 2.0, 0.25).await;

        let Ok(report) = service.audit().await else {
            panic!("audit runs");
        };
        assert!(report.consistent);
        assert_eq!(report.entries_replayed, 3);
    }

    #[tokio::test]
    async fn overflowing_adds_are_rejected() {
        let (service, store) = make_service().await;
        let Ok(_) = service.add_waste(WasteType::Normal, 1.0, 1e308).await else {
            panic!("first add fits");
        };
        let result = service.add_waste(WasteType::Normal, 1.0, 1e308).await;
        assert!(matches!(result, Err(LedgerError::InvalidInput(_))));
        assert_eq!(service.status().await.normal_weight, 1e308);
        assert_eq!(store.log_len().await, 1);

        let Ok(entries) = service.empty_bins(EmptyTarget::Normal).await else {
            panic!("empty fits");
        };
        assert!(entries.iter().all(|e| e.co2_emissions.is_finite()));
        assert!(service.summary().await.net_co2_emissions.is_finite());
    }

    #[tokio::test]
    async fn reopening_applies_configured_capacities() {
        let store = Arc::new(MemoryStore::new());
        let Ok(first) = LedgerService::open(
            Arc::clone(&store) as Arc<dyn LedgerStore>,
            EmissionsFactors::default(),
            100.0,
            100.0,
            20,
        )
        .await
        else {
            panic!("memory store opens");
        };
        let _ = first.add_waste(WasteType::Recycle, 30.0, 1.0).await;
        drop(first);

        let Ok(second) = LedgerService::open(
            Arc::clone(&store) as Arc<dyn LedgerStore>,
            EmissionsFactors::default(),
            100.0,
            60.0,
            20,
        )
        .await
        else {
            panic!("memory store reopens");
        };
        let bin = second.status().await;
        assert_eq!(bin.recycle_capacity, 60.0);
        assert_eq!(bin.recycle_volume, 30.0);
        assert_eq!(bin.fill_percent(WasteType::Recycle), 50.0);
    }
}
