//! PostgreSQL implementation of the persistence layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::LedgerStore;
use super::models::{HistoryQuery, LedgerCommit, SortOrder};
use crate::domain::{BinState, EmissionsSummary, LedgerState, TrashLogEntry};
use crate::error::LedgerError;

/// Primary key of the singleton `bin_status` and `emissions_summary` rows.
const SINGLETON_ID: i16 = 1;

type BinRow = (f64, f64, f64, f64, f64, f64, DateTime<Utc>);
type SummaryRow = (f64, f64, f64, f64, f64, DateTime<Utc>);
type LogRow = (i64, Uuid, String, f64, f64, String, f64, DateTime<Utc>);

const LOG_COLUMNS: &str =
    "SELECT id, batch_id, waste_type, volume, weight, event_type, co2_emissions, logged_at \
     FROM trash_logs WHERE TRUE";

/// PostgreSQL-backed ledger store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `database_url` and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::StorageFailure`] if the connection or a
    /// migration fails.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: std::time::Duration,
    ) -> Result<Self, LedgerError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| LedgerError::StorageFailure(format!("migration failed: {e}")))?;

        tracing::info!("database migrations applied");
        Ok(Self::new(pool))
    }

    async fn load_bin(&self) -> Result<Option<BinState>, LedgerError> {
        let row = sqlx::query_as::<_, BinRow>(
            "SELECT normal_volume, normal_weight, recycle_volume, recycle_weight, \
             normal_capacity, recycle_capacity, last_updated FROM bin_status WHERE id = $1",
        )
        .bind(SINGLETON_ID)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(
            |(
                normal_volume,
                normal_weight,
                recycle_volume,
                recycle_weight,
                normal_capacity,
                recycle_capacity,
                last_updated,
            )| BinState {
                normal_volume,
                normal_weight,
                recycle_volume,
                recycle_weight,
                normal_capacity,
                recycle_capacity,
                last_updated,
            },
        ))
    }

    async fn load_summary(&self) -> Result<Option<EmissionsSummary>, LedgerError> {
        let row = sqlx::query_as::<_, SummaryRow>(
            "SELECT total_co2_landfill, total_co2_recycling, total_co2_avoided, \
             net_co2_emissions, total_waste_diverted, last_updated \
             FROM emissions_summary WHERE id = $1",
        )
        .bind(SINGLETON_ID)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(
            |(
                total_co2_landfill,
                total_co2_recycling,
                total_co2_avoided,
                net_co2_emissions,
                total_waste_diverted,
                last_updated,
            )| EmissionsSummary {
                total_co2_landfill,
                total_co2_recycling,
                total_co2_avoided,
                net_co2_emissions,
                total_waste_diverted,
                last_updated,
            },
        ))
    }
}

/// Converts a raw log row, rejecting unknown enum strings.
fn entry_from_row(row: LogRow) -> Result<TrashLogEntry, LedgerError> {
    let (id, batch_id, waste_type, volume, weight, event_type, co2_emissions, timestamp) = row;
    let corrupt =
        |e: LedgerError| LedgerError::StorageFailure(format!("corrupt log row {id}: {e}"));
    Ok(TrashLogEntry {
        id,
        batch_id,
        waste_type: waste_type.parse().map_err(corrupt)?,
        volume,
        weight,
        event_type: event_type.parse().map_err(corrupt)?,
        co2_emissions,
        timestamp,
    })
}

#[async_trait]
impl LedgerStore for PostgresStore {
    async fn load_state(&self) -> Result<Option<LedgerState>, LedgerError> {
        let bin = self.load_bin().await?;
        let summary = self.load_summary().await?;
        Ok(bin
            .zip(summary)
            .map(|(bin, summary)| LedgerState { bin, summary }))
    }

    async fn initialize(&self, initial: &LedgerState) -> Result<LedgerState, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let bin = &initial.bin;
        sqlx::query(
            "INSERT INTO bin_status (id, normal_volume, normal_weight, recycle_volume, \
             recycle_weight, normal_capacity, recycle_capacity, last_updated) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) ON CONFLICT (id) DO UPDATE SET \
             normal_capacity = EXCLUDED.normal_capacity, \
             recycle_capacity = EXCLUDED.recycle_capacity",
        )
        .bind(SINGLETON_ID)
        .bind(bin.normal_volume)
        .bind(bin.normal_weight)
        .bind(bin.recycle_volume)
        .bind(bin.recycle_weight)
        .bind(bin.normal_capacity)
        .bind(bin.recycle_capacity)
        .bind(bin.last_updated)
        .execute(&mut *tx)
        .await?;

        let summary = &initial.summary;
        sqlx::query(
            "INSERT INTO emissions_summary (id, total_co2_landfill, total_co2_recycling, \
             total_co2_avoided, net_co2_emissions, total_waste_diverted, last_updated) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) ON CONFLICT (id) DO NOTHING",
        )
        .bind(SINGLETON_ID)
        .bind(summary.total_co2_landfill)
        .bind(summary.total_co2_recycling)
        .bind(summary.total_co2_avoided)
        .bind(summary.net_co2_emissions)
        .bind(summary.total_waste_diverted)
        .bind(summary.last_updated)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        self.load_state()
            .await?
            .ok_or_else(|| {
                LedgerError::Internal("ledger rows missing after initialization".to_string())
            })
    }

    async fn commit(&self, commit: &LedgerCommit) -> Result<Vec<TrashLogEntry>, LedgerError> {
        let mut tx = self.pool.begin().await?;

        let bin = &commit.state.bin;
        let updated = sqlx::query(
            "UPDATE bin_status SET normal_volume = $2, normal_weight = $3, recycle_volume = $4, \
             recycle_weight = $5, normal_capacity = $6, recycle_capacity = $7, \
             last_updated = $8 WHERE id = $1",
        )
        .bind(SINGLETON_ID)
        .bind(bin.normal_volume)
        .bind(bin.normal_weight)
        .bind(bin.recycle_volume)
        .bind(bin.recycle_weight)
        .bind(bin.normal_capacity)
        .bind(bin.recycle_capacity)
        .bind(bin.last_updated)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() != 1 {
            // dropping `tx` rolls back
            return Err(LedgerError::StorageFailure(
                "bin_status row missing; ledger not initialized".to_string(),
            ));
        }

        let mut appended = Vec::with_capacity(commit.entries.len());
        for entry in &commit.entries {
            let id = sqlx::query_scalar::<_, i64>(
                "INSERT INTO trash_logs (batch_id, waste_type, volume, weight, event_type, \
                 co2_emissions, logged_at) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
            )
            .bind(entry.batch_id)
            .bind(entry.waste_type.as_str())
            .bind(entry.volume)
            .bind(entry.weight)
            .bind(entry.event_type.as_str())
            .bind(entry.co2_emissions)
            .bind(entry.timestamp)
            .fetch_one(&mut *tx)
            .await?;
            appended.push(entry.clone().with_id(id));
        }

        if commit.summary_changed {
            let summary = &commit.state.summary;
            sqlx::query(
                "UPDATE emissions_summary SET total_co2_landfill = $2, total_co2_recycling = $3, \
                 total_co2_avoided = $4, net_co2_emissions = $5, total_waste_diverted = $6, \
                 last_updated = $7 WHERE id = $1",
            )
            .bind(SINGLETON_ID)
            .bind(summary.total_co2_landfill)
            .bind(summary.total_co2_recycling)
            .bind(summary.total_co2_avoided)
            .bind(summary.net_co2_emissions)
            .bind(summary.total_waste_diverted)
            .bind(summary.last_updated)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(appended)
    }

    async fn fetch_entries(&self, query: &HistoryQuery) -> Result<Vec<TrashLogEntry>, LedgerError> {
        let mut qb = QueryBuilder::<Postgres>::new(LOG_COLUMNS);
        if let Some(start) = query.start {
            qb.push(" AND logged_at >= ").push_bind(start);
        }
        if let Some(end) = query.end {
            qb.push(" AND logged_at <= ").push_bind(end);
        }
        if let Some(waste_type) = query.waste_type {
            qb.push(" AND waste_type = ").push_bind(waste_type.as_str());
        }
        if let Some(event_type) = query.event_type {
            qb.push(" AND event_type = ").push_bind(event_type.as_str());
        }
        qb.push(match query.order {
            SortOrder::Asc => " ORDER BY logged_at ASC, id ASC",
            SortOrder::Desc => " ORDER BY logged_at DESC, id DESC",
        });
        if let Some(limit) = query.limit {
            qb.push(" LIMIT ")
                .push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let rows = qb
            .build_query_as::<LogRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(entry_from_row).collect()
    }

    async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}
