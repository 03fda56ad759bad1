//! Export snapshot: the rows both serializations write.

use chrono::SecondsFormat;
use thiserror::Error;

use stockyard_inventory::{LedgerEngine, LedgerEntry};

pub const MOVEMENT_HEADERS: [&str; 6] = [
    "Fecha",
    "Ubicación",
    "Material",
    "Tipo",
    "Cantidad",
    "Stock Final Lote",
];

pub const BALANCE_HEADERS: [&str; 3] = ["Sitio", "Lote", "Cantidad"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("delimited export failed: {0}")]
    Delimited(#[from] csv::Error),

    #[error("workbook export failed: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("export buffer failed: {0}")]
    Buffer(String),
}

/// One movement-log row.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementRow {
    pub recorded_at: String,
    pub location: String,
    pub material: String,
    pub kind: &'static str,
    pub signed_quantity: f64,
    pub resulting_balance: f64,
}

impl From<&LedgerEntry> for MovementRow {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            recorded_at: entry.recorded_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            location: entry.location.composite(),
            material: entry
                .material
                .map(|m| m.label().to_string())
                .unwrap_or_default(),
            kind: entry.kind.label(),
            signed_quantity: entry.signed_quantity,
            resulting_balance: entry.resulting_balance,
        }
    }
}

/// One current-balance row, keyed by explicit site/lot columns.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceRow {
    pub site: String,
    pub lot: String,
    pub quantity: f64,
}

/// Everything an export needs, captured in one read of the engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExportSnapshot {
    /// Newest first.
    pub movements: Vec<MovementRow>,
    /// Grid order.
    pub balances: Vec<BalanceRow>,
}

impl ExportSnapshot {
    pub fn capture(engine: &LedgerEngine) -> Self {
        let movements = engine.history().newest_first().map(MovementRow::from).collect();
        let balances = engine
            .grid()
            .all_locations()
            .map(|location| BalanceRow {
                quantity: engine.current_balance(&location).unwrap_or(0.0),
                site: location.site.to_string(),
                lot: location.lot.to_string(),
            })
            .collect();

        Self {
            movements,
            balances,
        }
    }
}
