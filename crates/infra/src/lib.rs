//! Infrastructure layer: import/export formats, configuration and the
//! process-wide ledger service.

pub mod codec;
pub mod config;
pub mod export;
pub mod import;
pub mod service;
pub mod table;

pub use config::{ConfigError, StockyardConfig};
pub use export::{ExportError, ExportSnapshot};
pub use import::{parse_import, read_import_file, ImportFormat};
pub use service::{LocationBalance, StockyardService};
