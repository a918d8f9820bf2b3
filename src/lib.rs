//! # waste-ledger
//!
//! REST service for a two-bin smart waste station (general waste and
//! recycling) that keeps an append-only log of deposits and emptyings and
//! accounts the CO2-equivalent impact of every emptied load.
//!
//! Emptying a general bin books landfill emissions. Emptying a recycling
//! bin books recycling-process emissions minus the virgin-material
//! emissions the recycled weight avoids, so net emissions can go negative.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── LedgerService (service/)
//!     │       ├── LedgerState planning (domain/)
//!     │       └── Reporting views and audit (reporting/)
//!     │
//!     └── LedgerStore (persistence/)
//!             ├── PostgreSQL
//!             └── In-memory
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod reporting;
pub mod service;
