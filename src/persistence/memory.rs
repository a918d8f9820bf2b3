//! In-memory implementation of the ledger store.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::LedgerStore;
use super::models::{HistoryQuery, LedgerCommit, SortOrder};
use crate::domain::{LedgerState, TrashLogEntry};
use crate::error::LedgerError;

#[derive(Debug, Default)]
struct MemoryData {
    state: Option<LedgerState>,
    log: Vec<TrashLogEntry>,
    next_id: i64,
}

/// Store that keeps the ledger in process memory.
///
/// Everything is lost on restart. A single lock guards state and log, so
/// commits are trivially atomic. Failures can be injected with
/// [`MemoryStore::fail_next_commit`] to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<MemoryData>,
    fail_next_commit: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty, uninitialized store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next [`LedgerStore::commit`] fail without writing anything.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Appends an entry verbatim, bypassing the ledger.
    ///
    /// Intended for seeding history with explicit timestamps. The entry's
    /// ID is replaced with the next free one.
    pub async fn insert_raw(&self, mut entry: TrashLogEntry) -> TrashLogEntry {
        let mut data = self.data.write().await;
        data.next_id += 1;
        entry.id = data.next_id;
        data.log.push(entry.clone());
        entry
    }

    /// Number of log entries held.
    pub async fn log_len(&self) -> usize {
        self.data.read().await.log.len()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn load_state(&self) -> Result<Option<LedgerState>, LedgerError> {
        Ok(self.data.read().await.state.clone())
    }

    async fn initialize(&self, initial: &LedgerState) -> Result<LedgerState, LedgerError> {
        let mut data = self.data.write().await;
        let state = data.state.get_or_insert_with(|| initial.clone());
        state.bin.normal_capacity = initial.bin.normal_capacity;
        state.bin.recycle_capacity = initial.bin.recycle_capacity;
        Ok(state.clone())
    }

    async fn commit(&self, commit: &LedgerCommit) -> Result<Vec<TrashLogEntry>, LedgerError> {
        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(LedgerError::StorageFailure(
                "injected memory store failure".to_string(),
            ));
        }

        let mut data = self.data.write().await;
        let mut appended = Vec::with_capacity(commit.entries.len());
        for entry in &commit.entries {
            data.next_id += 1;
            appended.push(entry.clone().with_id(data.next_id));
        }
        data.log.extend(appended.iter().cloned());
        data.state = Some(commit.state.clone());
        Ok(appended)
    }

    async fn fetch_entries(&self, query: &HistoryQuery) -> Result<Vec<TrashLogEntry>, LedgerError> {
        let data = self.data.read().await;
        let mut entries: Vec<TrashLogEntry> = data
            .log
            .iter()
            .filter(|e| query.matches(e))
            .cloned()
            .collect();

        entries.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        if query.order == SortOrder::Desc {
            entries.reverse();
        }
        if let Some(limit) = query.limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::{EmissionsFactors, EmptyTarget, WasteType};
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn initial() -> LedgerState {
        LedgerState::initial(100.0, 100.0, Utc::now())
    }

    #[tokio::test]
    async fn initialize_is_idempotent() {
        let store = MemoryStore::new();
        assert!(store.load_state().await.unwrap_or_default().is_none());

        let first = tokio_test::assert_ok!(store.initialize(&initial()).await);
        let second = tokio_test::assert_ok!(store.initialize(&initial()).await);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn commit_assigns_increasing_ids() {
        let store = MemoryStore::new();
        let state = initial();
        let factors = EmissionsFactors::default();
        let Ok(t) = state.plan_empty(EmptyTarget::Both, &factors, Utc::now()) else {
            panic!("valid empty");
        };
        let commit = LedgerCommit {
            state: t.next.clone(),
            entries: t.entries,
            summary_changed: t.summary_changed,
        };

        let appended = tokio_test::assert_ok!(store.commit(&commit).await);
        assert_eq!(appended.len(), 2);
        assert!(appended[0].id < appended[1].id);
        assert_eq!(store.load_state().await.ok().flatten(), Some(t.next));
    }

    #[tokio::test]
    async fn injected_failure_writes_nothing() {
        let store = MemoryStore::new();
        let state = tokio_test::assert_ok!(store.initialize(&initial()).await);
        let factors = EmissionsFactors::default();
        let Ok(t) = state.plan_add(WasteType::Normal, 1.0, 1.0, &factors, Utc::now()) else {
            panic!("valid add");
        };
        let commit = LedgerCommit {
            state: t.next,
            entries: t.entries,
            summary_changed: false,
        };

        store.fail_next_commit();
        tokio_test::assert_err!(store.commit(&commit).await);
        assert_eq!(store.log_len().await, 0);
        assert_eq!(store.load_state().await.ok().flatten(), Some(state));

        // the failure is one-shot
        tokio_test::assert_ok!(store.commit(&commit).await);
        assert_eq!(store.log_len().await, 1);
    }

    #[tokio::test]
    async fn fetch_orders_by_timestamp_regardless_of_insertion() {
        let store = MemoryStore::new();
        let base = Utc::now();
        for offset in [3_i32, 1, 2] {
            store
                .insert_raw(TrashLogEntry {
                    id: 0,
                    batch_id: Uuid::new_v4(),
                    waste_type: WasteType::Normal,
                    volume: 1.0,
                    weight: f64::from(offset),
                    event_type: crate::domain::EventType::Add,
                    co2_emissions: 0.0,
                    timestamp: base + Duration::minutes(offset.into()),
                })
                .await;
        }

        let asc = tokio_test::assert_ok!(store.fetch_entries(&HistoryQuery::all()).await);
        let weights: Vec<f64> = asc.iter().map(|e| e.weight).collect();
        assert_eq!(weights, vec![1.0, 2.0, 3.0]);

        let recent = tokio_test::assert_ok!(store.fetch_entries(&HistoryQuery::recent(2)).await);
        let weights: Vec<f64> = recent.iter().map(|e| e.weight).collect();
        assert_eq!(weights, vec![3.0, 2.0]);
    }

    #[tokio::test]
    async fn reinitialize_adopts_new_capacities_and_keeps_contents() {
        let store = MemoryStore::new();
        let state = tokio_test::assert_ok!(store.initialize(&initial()).await);
        let factors = EmissionsFactors::default();
        let Ok(t) = state.plan_add(WasteType::Normal, 25.0, 4.0, &factors, Utc::now()) else {
            panic!("valid add");
        };
        let commit = LedgerCommit {
            state: t.next,
            entries: t.entries,
            summary_changed: false,
        };
        tokio_test::assert_ok!(store.commit(&commit).await);

        let resized = LedgerState::initial(50.0, 200.0, Utc::now());
        let reopened = tokio_test::assert_ok!(store.initialize(&resized).await);
        assert_eq!(reopened.bin.normal_capacity, 50.0);
        assert_eq!(reopened.bin.recycle_capacity, 200.0);
        assert_eq!(reopened.bin.normal_volume, 25.0);
        assert_eq!(reopened.bin.fill_percent(WasteType::Normal), 50.0);
        assert_eq!(store.load_state().await.ok().flatten(), Some(reopened));
    }
}
