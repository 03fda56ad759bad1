//! Import surface: bytes or files in either serialization → records.

use std::path::Path;
use std::str::FromStr;

use stockyard_core::{StockError, StockResult};
use stockyard_inventory::MovementRecord;

use crate::codec::{delimited, workbook};
use crate::table::{self, RawTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    /// Delimited text (CSV).
    Delimited,
    /// Spreadsheet workbook (xlsx).
    Workbook,
}

impl ImportFormat {
    /// Workbooks are ZIP containers; anything else is read as delimited text.
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(workbook::ZIP_SIGNATURE) {
            ImportFormat::Workbook
        } else {
            ImportFormat::Delimited
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        ext.parse().ok()
    }
}

impl FromStr for ImportFormat {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" | "txt" | "delimited" => Ok(ImportFormat::Delimited),
            "xlsx" | "xlsm" | "workbook" => Ok(ImportFormat::Workbook),
            other => Err(StockError::malformed(format!("unsupported import format '{other}'"))),
        }
    }
}

/// Parse an uploaded payload. `None` sniffs the format from the bytes.
pub fn parse_import(bytes: &[u8], format: Option<ImportFormat>) -> StockResult<Vec<MovementRecord>> {
    let format = format.unwrap_or_else(|| ImportFormat::sniff(bytes));
    let table = read_table(bytes, format)?;
    let shape = table::detect_shape(&table)?;
    let records = table::parse_records(&table)?;
    tracing::debug!(?format, ?shape, records = records.len(), "import parsed");
    Ok(records)
}

/// Read and parse an import file; the extension picks the format when known.
pub fn read_import_file(path: &Path) -> StockResult<Vec<MovementRecord>> {
    let bytes = std::fs::read(path)
        .map_err(|e| StockError::import_io(format!("{}: {e}", path.display())))?;
    parse_import(&bytes, ImportFormat::from_path(path))
}

fn read_table(bytes: &[u8], format: ImportFormat) -> StockResult<RawTable> {
    match format {
        ImportFormat::Delimited => delimited::read_table(bytes),
        ImportFormat::Workbook => workbook::read_workbook(bytes)?
            .restore_source()
            .ok_or_else(|| StockError::malformed("workbook holds no readable sheet")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_is_sniffed_and_parsed_from_names() {
        assert_eq!(ImportFormat::sniff(b"PK\x03\x04rest"), ImportFormat::Workbook);
        assert_eq!(ImportFormat::sniff(b"\xEF\xBB\xBFFecha"), ImportFormat::Delimited);
        assert_eq!("XLSX".parse::<ImportFormat>().unwrap(), ImportFormat::Workbook);
        assert_eq!(
            ImportFormat::from_path(Path::new("/tmp/export.csv")),
            Some(ImportFormat::Delimited)
        );
        assert_eq!(ImportFormat::from_path(Path::new("/tmp/export")), None);
        assert!("pdf".parse::<ImportFormat>().is_err());
    }

    #[test]
    fn missing_file_is_an_io_failure() {
        let err = read_import_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, StockError::ImportIo(_)));
    }

    #[test]
    fn delimited_payload_parses_into_records() {
        let bytes = "\u{feff}Ubicación;Stock Final Lote\nS1 - L1;12\nS1 - L1;30\n";
        let records = parse_import(bytes.as_bytes(), None).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].resulting_balance, 12.0);
    }
}
