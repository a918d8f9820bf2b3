//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::LedgerService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Ledger service for all business logic.
    pub ledger_service: Arc<LedgerService>,
}

impl AppState {
    /// Wraps a ready service.
    #[must_use]
    pub fn new(ledger_service: LedgerService) -> Self {
        Self {
            ledger_service: Arc::new(ledger_service),
        }
    }
}
