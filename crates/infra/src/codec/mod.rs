//! Serializations of the export format (and their import readers).

pub mod delimited;
pub mod workbook;
