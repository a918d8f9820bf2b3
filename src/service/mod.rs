//! Service layer: business logic orchestration.
//!
//! [`LedgerService`] owns the live ledger state, validates and applies
//! mutations through the [`crate::persistence::LedgerStore`], and serves
//! read-only reporting queries.

pub mod ledger_service;

pub use ledger_service::{Dashboard, LedgerService};
