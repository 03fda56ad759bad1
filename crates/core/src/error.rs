//! Ledger error model.

use thiserror::Error;

use crate::id::Location;

/// Result type used across the ledger.
pub type StockResult<T> = Result<T, StockError>;

/// Ledger-level error.
///
/// Every variant is recoverable by the caller: the operation that produced it
/// left balances and history untouched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StockError {
    /// The referenced site/lot is outside the configured grid.
    #[error("invalid location: {site} - {lot}")]
    InvalidLocation { site: String, lot: String },

    /// A quantity was negative or not a finite number.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// An outbound movement asked for more than the location holds.
    #[error("insufficient stock at {location}: available {available}, requested {requested}")]
    InsufficientStock {
        location: Location,
        available: f64,
        requested: f64,
    },

    /// The import payload lacks required columns/fields or holds unparsable values.
    #[error("malformed import: {0}")]
    MalformedImport(String),

    /// The import source could not be read (unreadable or corrupt file).
    #[error("import io failure: {0}")]
    ImportIo(String),
}

impl StockError {
    pub fn invalid_location(site: impl Into<String>, lot: impl Into<String>) -> Self {
        Self::InvalidLocation {
            site: site.into(),
            lot: lot.into(),
        }
    }

    pub fn invalid_quantity(msg: impl Into<String>) -> Self {
        Self::InvalidQuantity(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedImport(msg.into())
    }

    pub fn import_io(msg: impl Into<String>) -> Self {
        Self::ImportIo(msg.into())
    }

    /// Stable machine-readable code, used by the HTTP layer and logs.
    pub fn code(&self) -> &'static str {
        match self {
            StockError::InvalidLocation { .. } => "invalid_location",
            StockError::InvalidQuantity(_) => "invalid_quantity",
            StockError::InsufficientStock { .. } => "insufficient_stock",
            StockError::MalformedImport(_) => "malformed_import",
            StockError::ImportIo(_) => "import_io_failure",
        }
    }
}
