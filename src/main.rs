//! waste-ledger server entry point.
//!
//! Starts the Axum HTTP server with the REST endpoints.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use waste_ledger::api;
use waste_ledger::app_state::AppState;
use waste_ledger::config::{AppConfig, LogFormat};
use waste_ledger::persistence::{LedgerStore, MemoryStore, PostgresStore};
use waste_ledger::service::LedgerService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::from_env().context("loading configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting waste-ledger");

    // Build persistence layer
    let store: Arc<dyn LedgerStore> = if config.persistence_enabled {
        let store = PostgresStore::connect(
            &config.database_url,
            config.database_max_connections,
            config.database_min_connections,
            config.database_connect_timeout(),
        )
        .await
        .context("connecting to PostgreSQL")?;
        Arc::new(store)
    } else {
        tracing::warn!("persistence disabled, ledger is kept in memory only");
        Arc::new(MemoryStore::new())
    };

    // Build service layer
    let ledger_service = LedgerService::open(
        store,
        config.emissions_factors,
        config.normal_bin_capacity,
        config.recycle_bin_capacity,
        config.recent_log_limit,
    )
    .await
    .context("opening ledger")?;

    // Build router
    let app = api::build_app(AppState::new(ledger_service), config.request_timeout());

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
