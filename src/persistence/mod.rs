//! Persistence layer: durable bin state, trash log, and emissions summary.
//!
//! Provides the [`LedgerStore`] trait for atomic commits of ledger
//! mutations and read-only history queries. [`PostgresStore`] uses
//! `sqlx::PgPool`; [`MemoryStore`] keeps everything in process and backs
//! tests and persistence-disabled deployments.

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;

pub use memory::MemoryStore;
pub use models::{HistoryQuery, LedgerCommit, SortOrder};
pub use postgres::PostgresStore;

use crate::domain::{LedgerState, TrashLogEntry};
use crate::error::LedgerError;

/// Durable storage for the ledger.
///
/// # Atomicity
///
/// [`LedgerStore::commit`] must apply the bin state, every log entry, and
/// the summary as one unit: either all of it becomes visible or none of
/// it does.
#[async_trait]
pub trait LedgerStore: Send + Sync + std::fmt::Debug {
    /// Loads the persisted bin state and summary, if initialized.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::StorageFailure`] if the store is unreachable.
    async fn load_state(&self) -> Result<Option<LedgerState>, LedgerError>;

    /// Writes the initial zero state if none exists and returns whatever
    /// state is persisted afterwards.
    ///
    /// Bin capacities always come from `initial`, so a restart with new
    /// capacities takes effect; contents and totals are kept.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::StorageFailure`] on write failure.
    async fn initialize(&self, initial: &LedgerState) -> Result<LedgerState, LedgerError>;

    /// Atomically persists a ledger mutation, returning the appended log
    /// entries with their assigned IDs.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::StorageFailure`] if nothing could be written.
    async fn commit(&self, commit: &LedgerCommit) -> Result<Vec<TrashLogEntry>, LedgerError>;

    /// Reads log entries matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::StorageFailure`] if the read fails.
    async fn fetch_entries(&self, query: &HistoryQuery) -> Result<Vec<TrashLogEntry>, LedgerError>;

    /// Reports whether the store is reachable.
    async fn health_check(&self) -> bool;
}
