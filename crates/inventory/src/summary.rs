//! Read-only grouped views over current balances.

use serde::Serialize;

use stockyard_core::{Location, SiteId};

use crate::tier::StatusTier;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSnapshot {
    pub location: Location,
    pub balance: f64,
    pub tier: StatusTier,
    /// Set when a restored balance is below zero.
    pub negative: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteSubtotal {
    pub site: SiteId,
    pub total: f64,
    pub locations: Vec<LocationSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockSummary {
    pub total: f64,
    pub sites: Vec<SiteSubtotal>,
    pub negative: Vec<Location>,
}
