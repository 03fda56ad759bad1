//! Bulk-material stock ledger (pure domain).
//!
//! This crate holds the ledger rules: the location grid, the engine that
//! applies movements, the append-only history and the reconciliation used to
//! restore from an exported table. No IO, no HTTP, no storage.

pub mod engine;
pub mod entry;
pub mod grid;
pub mod history;
pub mod material;
pub mod reconcile;
pub mod setup;
pub mod summary;
pub mod tier;

pub use engine::{
    round_to_cents, units_to_quantity, LedgerEngine, RecordInbound, RecordOutbound, StockCommand,
};
pub use entry::{LedgerEntry, MovementKind};
pub use grid::{LocationGrid, SiteLayout};
pub use history::HistoryStore;
pub use material::Material;
pub use reconcile::{reconcile, MovementRecord, Reconciliation, RestoreReport};
pub use setup::SetupError;
pub use summary::{LocationSnapshot, SiteSubtotal, StockSummary};
pub use tier::{StatusTier, TierPolicy};
