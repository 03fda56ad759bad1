//! Configuration loading and representation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockyard_inventory::{LedgerEngine, LocationGrid, SetupError, TierPolicy};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be a number, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },

    #[error(transparent)]
    Setup(#[from] SetupError),
}

/// Yard layout, tier thresholds and the HTTP bind address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockyardConfig {
    pub sites: Vec<String>,
    /// Lots applied to every site.
    pub lots: Vec<String>,
    pub high_threshold: f64,
    pub low_threshold: f64,
    pub bind_addr: String,
}

impl Default for StockyardConfig {
    fn default() -> Self {
        Self {
            sites: (1..=7).map(|n| format!("S{n}")).collect(),
            lots: (1..=6).map(|n| format!("L{n}")).collect(),
            high_threshold: TierPolicy::DEFAULT_HIGH,
            low_threshold: TierPolicy::DEFAULT_LOW,
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

impl StockyardConfig {
    /// Load from `STOCKYARD_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (environment, test maps).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let sites = lookup("STOCKYARD_SITES")
            .map(|v| split_list(&v))
            .unwrap_or(defaults.sites);
        let lots = lookup("STOCKYARD_LOTS")
            .map(|v| split_list(&v))
            .unwrap_or(defaults.lots);
        let high_threshold = number(&lookup, "STOCKYARD_HIGH_THRESHOLD", defaults.high_threshold)?;
        let low_threshold = number(&lookup, "STOCKYARD_LOW_THRESHOLD", defaults.low_threshold)?;
        let bind_addr = lookup("STOCKYARD_BIND_ADDR").unwrap_or_else(|| {
            tracing::debug!("STOCKYARD_BIND_ADDR not set; using {}", defaults.bind_addr);
            defaults.bind_addr
        });

        let config = Self {
            sites,
            lots,
            high_threshold,
            low_threshold,
            bind_addr,
        };

        // Fail early on a layout the engine would reject.
        config.grid()?;
        config.tiers()?;
        Ok(config)
    }

    pub fn grid(&self) -> Result<LocationGrid, ConfigError> {
        Ok(LocationGrid::uniform(&self.sites, &self.lots)?)
    }

    pub fn tiers(&self) -> Result<TierPolicy, ConfigError> {
        Ok(TierPolicy::new(self.high_threshold, self.low_threshold)?)
    }

    /// A fresh engine for this layout, all balances at 0.0.
    pub fn engine(&self) -> Result<LedgerEngine, ConfigError> {
        Ok(LedgerEngine::new(self.grid()?, self.tiers()?))
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn number(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: f64,
) -> Result<f64, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<f64>().map_err(|_| ConfigError::InvalidNumber {
            key,
            value: raw,
        }),
    }
}
