//! Tabular import records: header resolution and row parsing.
//!
//! Both serializations (delimited text and workbook sheets) are first read
//! into a [`RawTable`] of strings; this module turns that into
//! [`MovementRecord`]s, or fails with `MalformedImport` before any state is
//! touched.

use chrono::{DateTime, NaiveDateTime, Utc};

use stockyard_core::{Location, StockError, StockResult};
use stockyard_inventory::{Material, MovementKind, MovementRecord};

const BOM: char = '\u{feff}';

const COMPOSITE_LOCATION: &[&str] = &["ubicación", "ubicacion", "location", "ubicación lote"];
const SITE: &[&str] = &["sitio", "site", "muelle"];
const LOT: &[&str] = &["lote", "lot"];
const KIND: &[&str] = &["tipo", "movimiento", "kind"];
const SIGNED_QUANTITY: &[&str] = &["cantidad", "quantity", "signed quantity"];
const RESULTING_BALANCE: &[&str] = &[
    "stock final lote",
    "saldo final",
    "stock final",
    "resulting balance",
];
const BALANCE_QUANTITY: &[&str] = &["cantidad", "quantity", "toneladas", "stock"];
const RECORDED_AT: &[&str] = &["fecha", "timestamp", "recorded at"];
const MATERIAL: &[&str] = &["material"];

/// Header row plus data rows, every cell as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// True when no row holds a non-blank cell.
    pub fn has_no_data(&self) -> bool {
        self.rows.iter().all(|row| is_blank_row(row))
    }
}

/// Which of the two supported table shapes was recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableShape {
    /// Movement log: one row per entry with a resulting-balance column.
    MovementLog,
    /// Long balance table: `(site, lot, quantity)` per location.
    BalanceTable,
}

#[derive(Debug, Clone, Copy)]
enum LocationColumns {
    Composite(usize),
    Split { site: usize, lot: usize },
}

#[derive(Debug, Clone, Copy)]
struct Schema {
    shape: TableShape,
    location: LocationColumns,
    balance: usize,
    quantity: Option<usize>,
    kind: Option<usize>,
    recorded_at: Option<usize>,
    material: Option<usize>,
}

/// Detect the table shape from its headers.
pub fn detect_shape(table: &RawTable) -> StockResult<TableShape> {
    Ok(resolve_schema(&table.headers)?.shape)
}

/// Parse every data row, in the order given (newest first for exports).
pub fn parse_records(table: &RawTable) -> StockResult<Vec<MovementRecord>> {
    let schema = resolve_schema(&table.headers)?;

    let mut records = Vec::with_capacity(table.rows.len());
    for (idx, row) in table.rows.iter().enumerate() {
        if is_blank_row(row) {
            continue;
        }
        // +2: 1-based, after the header row.
        records.push(parse_row(&schema, row, idx + 2)?);
    }
    Ok(records)
}

fn resolve_schema(headers: &[String]) -> StockResult<Schema> {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
    let find = |aliases: &[&str]| {
        normalized
            .iter()
            .position(|h| aliases.iter().any(|alias| *alias == h.as_str()))
    };

    let site = find(SITE);
    let lot = find(LOT);
    let location = match (site, lot) {
        (Some(site), Some(lot)) => Some(LocationColumns::Split { site, lot }),
        // A lone lot column is read as the composite form.
        _ => find(COMPOSITE_LOCATION).or(lot).map(LocationColumns::Composite),
    };

    let (shape, balance, quantity) = match find(RESULTING_BALANCE) {
        Some(balance) => (TableShape::MovementLog, Some(balance), find(SIGNED_QUANTITY)),
        None => (TableShape::BalanceTable, find(BALANCE_QUANTITY), None),
    };

    let mut missing = Vec::new();
    if location.is_none() {
        missing.push("location (Ubicación, or Sitio + Lote)");
    }
    if balance.is_none() {
        missing.push("balance (Stock Final Lote / Saldo Final, or Cantidad)");
    }

    match (location, balance) {
        (Some(location), Some(balance)) => Ok(Schema {
            shape,
            location,
            balance,
            quantity,
            kind: find(KIND),
            recorded_at: find(RECORDED_AT),
            material: find(MATERIAL),
        }),
        _ => Err(StockError::malformed(format!(
            "missing required columns: {}",
            missing.join(", ")
        ))),
    }
}

fn parse_row(schema: &Schema, row: &[String], line: usize) -> StockResult<MovementRecord> {
    let cell = |idx: usize| row.get(idx).map(|c| c.trim()).unwrap_or("");

    let location = match schema.location {
        LocationColumns::Composite(idx) => {
            let raw = cell(idx);
            // Unparsable keys stay as-is; they are skipped for balances later.
            raw.parse::<Location>()
                .unwrap_or_else(|_| Location::new(raw, ""))
        }
        LocationColumns::Split { site, lot } => Location::new(cell(site), cell(lot)),
    };

    let balance_raw = cell(schema.balance);
    let resulting_balance = parse_number(balance_raw).ok_or_else(|| {
        StockError::malformed(format!("row {line}: invalid balance '{balance_raw}'"))
    })?;

    if schema.shape == TableShape::BalanceTable {
        return Ok(MovementRecord::balance(location, resulting_balance));
    }

    let signed_quantity = match schema.quantity.map(cell) {
        None | Some("") => None,
        Some(raw) => Some(parse_number(raw).ok_or_else(|| {
            StockError::malformed(format!("row {line}: invalid quantity '{raw}'"))
        })?),
    };

    Ok(MovementRecord {
        location,
        kind: schema.kind.map(cell).and_then(MovementKind::parse),
        signed_quantity,
        resulting_balance,
        recorded_at: schema.recorded_at.map(cell).and_then(parse_timestamp),
        material: schema.material.map(cell).and_then(Material::parse_lenient),
    })
}

fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches(BOM)
        .trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}

/// Finite decimal number; a single `,` is accepted as decimal separator.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let value = match raw.parse::<f64>() {
        Ok(v) => v,
        Err(_) if raw.matches(',').count() == 1 && !raw.contains('.') => {
            raw.replace(',', ".").parse::<f64>().ok()?
        }
        Err(_) => return None,
    };
    value.is_finite().then_some(value)
}

/// RFC 3339, or a naive `YYYY-MM-DD HH:MM[:SS]` read as UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M", "%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
