//! Delimited text (CSV), UTF-8 with BOM for spreadsheet compatibility.

use stockyard_core::{StockError, StockResult};

use crate::export::{ExportError, ExportSnapshot, BALANCE_HEADERS, MOVEMENT_HEADERS};
use crate::table::RawTable;

pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Movement log, newest first.
pub fn write_movements(snapshot: &ExportSnapshot) -> Result<Vec<u8>, ExportError> {
    let mut writer = bom_writer();
    writer.write_record(MOVEMENT_HEADERS)?;
    for row in &snapshot.movements {
        let signed_quantity = row.signed_quantity.to_string();
        let resulting_balance = row.resulting_balance.to_string();
        writer.write_record([
            row.recorded_at.as_str(),
            row.location.as_str(),
            row.material.as_str(),
            row.kind,
            signed_quantity.as_str(),
            resulting_balance.as_str(),
        ])?;
    }
    finish(writer)
}

/// Flat current-balances table (`Sitio, Lote, Cantidad`).
pub fn write_balances(snapshot: &ExportSnapshot) -> Result<Vec<u8>, ExportError> {
    let mut writer = bom_writer();
    writer.write_record(BALANCE_HEADERS)?;
    for row in &snapshot.balances {
        let quantity = row.quantity.to_string();
        writer.write_record([row.site.as_str(), row.lot.as_str(), quantity.as_str()])?;
    }
    finish(writer)
}

/// Read a delimited payload into a raw table.
///
/// A leading BOM is dropped; the delimiter (`,` or `;`) is sniffed from the
/// header line. Reader failures (invalid UTF-8, broken quoting) are IO
/// failures, not schema problems.
pub fn read_table(bytes: &[u8]) -> StockResult<RawTable> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(bytes))
        .flexible(true)
        .has_headers(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| StockError::import_io(format!("unreadable header row: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| StockError::import_io(format!("unreadable row: {e}")))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { headers, rows })
}

fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let header = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
    let count = |needle: u8| header.iter().filter(|b| **b == needle).count();
    if count(b';') > count(b',') { b';' } else { b',' }
}

fn bom_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new().from_writer(UTF8_BOM.to_vec())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, ExportError> {
    writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))
}
