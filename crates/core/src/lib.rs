//! `stockyard-core`: shared building blocks for the stock ledger.
//!
//! This crate contains **pure domain** primitives (no IO): location
//! identifiers, entry identifiers, the error taxonomy and the aggregate traits.

pub mod aggregate;
pub mod error;
pub mod id;
pub mod value_object;

pub use aggregate::Aggregate;
pub use error::{StockError, StockResult};
pub use id::{EntryId, Location, LotId, SiteId, LOCATION_SEPARATOR};
pub use value_object::ValueObject;
