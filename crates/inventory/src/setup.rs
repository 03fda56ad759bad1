//! Errors raised while assembling the grid and tier policy at startup.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SetupError {
    #[error("grid must contain at least one site")]
    EmptyGrid,

    #[error("site and lot labels cannot be blank")]
    BlankLabel,

    #[error("label '{0}' contains the location separator \" - \"")]
    SeparatorInLabel(String),

    #[error("site '{0}' has no lots")]
    SiteWithoutLots(String),

    #[error("duplicate site '{0}'")]
    DuplicateSite(String),

    #[error("duplicate lot '{lot}' in site '{site}'")]
    DuplicateLot { site: String, lot: String },

    #[error("invalid tier thresholds (high={high}, low={low}); need finite low <= high")]
    InvalidThresholds { high: f64, low: f64 },
}
