use serde::{Deserialize, Serialize};
use serde_json::Value;

use stockyard_core::{Location, StockError, StockResult};
use stockyard_inventory::{LedgerEntry, Material, MovementKind};

// -------------------------
// Request DTOs
// -------------------------

// Numeric fields arrive as raw JSON so non-numeric input is reported as
// `invalid_quantity` rather than a body rejection.

#[derive(Debug, Deserialize)]
pub struct MovementRequest {
    pub site: String,
    pub lot: String,
    pub quantity: Value,
    /// Free text; unknown materials are recorded as `Otro`.
    pub material: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UnitOutboundRequest {
    pub site: String,
    pub lot: String,
    pub unit_weight: Value,
    pub unit_count: Value,
    pub material: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ImportQuery {
    /// `csv` or `xlsx`; sniffed from the payload when absent.
    pub format: Option<String>,
}

pub fn parse_material(raw: Option<&str>) -> Option<Material> {
    raw.and_then(Material::parse_lenient)
}

/// A JSON number, or a numeric string (decimal comma accepted).
pub fn parse_quantity(field: &'static str, raw: &Value) -> StockResult<f64> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| StockError::invalid_quantity(format!("{field} must be numeric, got {raw}")))
}

/// A whole, non-negative count of loads.
pub fn parse_count(field: &'static str, raw: &Value) -> StockResult<u32> {
    let parsed = match raw {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| StockError::invalid_quantity(format!("{field} must be a whole count, got {raw}")))
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub entry_id: String,
    pub sequence: u64,
    pub recorded_at: String,
    pub kind: MovementKind,
    pub location: String,
    pub material: Option<Material>,
    pub quantity: f64,
    pub signed_quantity: f64,
    pub resulting_balance: f64,
}

impl From<&LedgerEntry> for EntryResponse {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            entry_id: entry.entry_id.to_string(),
            sequence: entry.sequence,
            recorded_at: entry.recorded_at.to_rfc3339(),
            kind: entry.kind,
            location: entry.location.composite(),
            material: entry.material,
            quantity: entry.quantity(),
            signed_quantity: entry.signed_quantity,
            resulting_balance: entry.resulting_balance,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub total: usize,
    /// Newest first.
    pub entries: Vec<EntryResponse>,
}

#[derive(Debug, Serialize)]
pub struct RestoreResponse {
    pub records: usize,
    pub restored_locations: usize,
    pub skipped_locations: Vec<String>,
    pub negative_locations: Vec<String>,
}

pub fn composite_labels(locations: &[Location]) -> Vec<String> {
    locations.iter().map(Location::composite).collect()
}
