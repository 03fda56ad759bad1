//! Process-wide ledger service.
//!
//! Owns the single `LedgerEngine` (balances + history) behind one lock, so
//! every mutating operation runs as one critical section: readers never see
//! a half-applied movement and concurrent outbounds against the same location
//! are serialized.

use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use stockyard_core::{Location, StockResult};
use stockyard_inventory::{
    units_to_quantity, LedgerEngine, LedgerEntry, LocationGrid, Material, RecordInbound,
    RecordOutbound, RestoreReport, StatusTier, StockCommand, StockSummary,
};

use crate::codec::{delimited, workbook};
use crate::config::{ConfigError, StockyardConfig};
use crate::export::{ExportError, ExportSnapshot};
use crate::import::{self, ImportFormat};

/// Balance of one location with its display tier.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct LocationBalance {
    pub location: Location,
    pub balance: f64,
    pub tier: StatusTier,
}

#[derive(Debug)]
pub struct StockyardService {
    engine: RwLock<LedgerEngine>,
}

impl StockyardService {
    pub fn new(engine: LedgerEngine) -> Self {
        Self {
            engine: RwLock::new(engine),
        }
    }

    pub fn from_config(config: &StockyardConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.engine()?))
    }

    // The engine validates before mutating, so a poisoned lock still guards
    // a consistent state.
    fn read(&self) -> RwLockReadGuard<'_, LedgerEngine> {
        self.engine.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LedgerEngine> {
        self.engine.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn grid(&self) -> LocationGrid {
        self.read().grid().clone()
    }

    pub fn record_inbound(
        &self,
        location: Location,
        quantity: f64,
        material: Option<Material>,
    ) -> StockResult<LedgerEntry> {
        let entry = self
            .write()
            .execute(&StockCommand::RecordInbound(RecordInbound {
                location,
                quantity,
                material,
                occurred_at: Utc::now(),
            }))?;
        tracing::info!(location = %entry.location, quantity, balance = entry.resulting_balance, "inbound recorded");
        Ok(entry)
    }

    pub fn record_outbound(
        &self,
        location: Location,
        quantity: f64,
        material: Option<Material>,
    ) -> StockResult<LedgerEntry> {
        let entry = self
            .write()
            .execute(&StockCommand::RecordOutbound(RecordOutbound {
                location,
                quantity,
                material,
                occurred_at: Utc::now(),
            }))?;
        tracing::info!(location = %entry.location, quantity, balance = entry.resulting_balance, "outbound recorded");
        Ok(entry)
    }

    /// Outbound of `unit_count` loads of `unit_weight`, rounded to 2 decimals.
    pub fn outbound_from_units(
        &self,
        location: Location,
        unit_weight: f64,
        unit_count: u32,
        material: Option<Material>,
    ) -> StockResult<LedgerEntry> {
        let quantity = units_to_quantity(unit_weight, unit_count)?;
        self.record_outbound(location, quantity, material)
    }

    pub fn current_balance(&self, location: &Location) -> StockResult<LocationBalance> {
        let engine = self.read();
        let balance = engine.current_balance(location)?;
        Ok(LocationBalance {
            location: location.clone(),
            balance,
            tier: engine.status_tier(balance),
        })
    }

    pub fn total_stock(&self) -> f64 {
        self.read().total_stock()
    }

    pub fn summary(&self) -> StockSummary {
        self.read().summary()
    }

    /// Most recent `n` entries, oldest first.
    pub fn tail(&self, n: usize) -> Vec<LedgerEntry> {
        self.read().history().tail(n).to_vec()
    }

    pub fn all(&self) -> Vec<LedgerEntry> {
        self.read().history().all().to_vec()
    }

    pub fn history_len(&self) -> usize {
        self.read().history().len()
    }

    /// Restore from an uploaded payload.
    ///
    /// Parsing happens before the lock is taken; on any error the current
    /// state is left untouched.
    pub fn restore_from_bytes(
        &self,
        bytes: &[u8],
        format: Option<ImportFormat>,
    ) -> StockResult<RestoreReport> {
        let records = import::parse_import(bytes, format)?;
        Ok(self.write().restore_from(&records, Utc::now()))
    }

    pub fn restore_from_path(&self, path: &Path) -> StockResult<RestoreReport> {
        let records = import::read_import_file(path)?;
        Ok(self.write().restore_from(&records, Utc::now()))
    }

    pub fn reset(&self) {
        self.write().reset();
    }

    /// Movement log as delimited text (UTF-8 with BOM), newest first.
    pub fn export_delimited(&self) -> Result<Vec<u8>, ExportError> {
        delimited::write_movements(&self.snapshot())
    }

    /// Current balances as delimited text (UTF-8 with BOM).
    pub fn export_balances_delimited(&self) -> Result<Vec<u8>, ExportError> {
        delimited::write_balances(&self.snapshot())
    }

    /// Workbook with the movement log and the balances table.
    pub fn export_workbook(&self) -> Result<Vec<u8>, ExportError> {
        workbook::write_workbook(&self.snapshot())
    }

    fn snapshot(&self) -> ExportSnapshot {
        ExportSnapshot::capture(&self.read())
    }
}

impl Default for StockyardService {
    fn default() -> Self {
        Self::new(LedgerEngine::default())
    }
}
