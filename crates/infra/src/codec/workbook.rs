//! Spreadsheet workbook (xlsx) with a movement-log sheet and a balances sheet.

use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

use stockyard_core::{StockError, StockResult};

use crate::export::{ExportError, ExportSnapshot, BALANCE_HEADERS, MOVEMENT_HEADERS};
use crate::table::RawTable;

pub const MOVEMENTS_SHEET: &str = "Movimientos";
pub const BALANCES_SHEET: &str = "Stock";

const MOVEMENTS_ALIASES: &[&str] = &["movimientos", "movements", "historial"];
const BALANCES_ALIASES: &[&str] = &["stock", "saldos", "balances"];

/// Leading bytes of every xlsx payload (a ZIP container).
pub const ZIP_SIGNATURE: &[u8] = b"PK\x03\x04";

/// Sheets found in an uploaded workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkbookTables {
    pub movements: Option<RawTable>,
    pub balances: Option<RawTable>,
    /// First sheet, when neither named sheet is present.
    pub fallback: Option<RawTable>,
}

impl WorkbookTables {
    /// The table a restore should read: the movement log when it has rows,
    /// otherwise the balances sheet, otherwise whatever the workbook holds.
    pub fn restore_source(self) -> Option<RawTable> {
        match (self.movements, self.balances) {
            (Some(movements), _) if !movements.has_no_data() => Some(movements),
            (_, Some(balances)) => Some(balances),
            (Some(movements), None) => Some(movements),
            (None, None) => self.fallback,
        }
    }
}

pub fn write_workbook(snapshot: &ExportSnapshot) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name(MOVEMENTS_SHEET)?;
    write_headers(sheet, &MOVEMENT_HEADERS)?;
    for (idx, row) in snapshot.movements.iter().enumerate() {
        let r = idx as u32 + 1;
        sheet.write_string(r, 0, row.recorded_at.as_str())?;
        sheet.write_string(r, 1, row.location.as_str())?;
        if !row.material.is_empty() {
            sheet.write_string(r, 2, row.material.as_str())?;
        }
        sheet.write_string(r, 3, row.kind)?;
        sheet.write_number(r, 4, row.signed_quantity)?;
        sheet.write_number(r, 5, row.resulting_balance)?;
    }

    let sheet = workbook.add_worksheet();
    sheet.set_name(BALANCES_SHEET)?;
    write_headers(sheet, &BALANCE_HEADERS)?;
    for (idx, row) in snapshot.balances.iter().enumerate() {
        let r = idx as u32 + 1;
        sheet.write_string(r, 0, row.site.as_str())?;
        sheet.write_string(r, 1, row.lot.as_str())?;
        sheet.write_number(r, 2, row.quantity)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Read the known sheets of an xlsx payload.
pub fn read_workbook(bytes: &[u8]) -> StockResult<WorkbookTables> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))
        .map_err(|e| StockError::import_io(format!("unreadable workbook: {e}")))?;

    let names = workbook.sheet_names();
    if names.is_empty() {
        return Err(StockError::malformed("workbook has no sheets"));
    }

    let find = |aliases: &[&str]| {
        names
            .iter()
            .find(|name| aliases.iter().any(|a| name.trim().eq_ignore_ascii_case(a)))
            .cloned()
    };
    let movements_name = find(MOVEMENTS_ALIASES);
    let balances_name = find(BALANCES_ALIASES);

    let mut read = |name: &str| -> StockResult<RawTable> {
        let range = workbook
            .worksheet_range(name)
            .map_err(|e| StockError::import_io(format!("unreadable sheet '{name}': {e}")))?;
        Ok(range_to_table(&range))
    };

    let movements = movements_name.as_deref().map(&mut read).transpose()?;
    let balances = balances_name.as_deref().map(&mut read).transpose()?;
    let fallback = if movements.is_none() && balances.is_none() {
        Some(read(names[0].as_str())?)
    } else {
        None
    };

    Ok(WorkbookTables {
        movements,
        balances,
        fallback,
    })
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str]) -> Result<(), XlsxError> {
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }
    Ok(())
}

fn range_to_table(range: &Range<Data>) -> RawTable {
    let mut rows = range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<String>>());
    let headers = rows.next().unwrap_or_default();
    RawTable {
        headers,
        rows: rows.collect(),
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}
