//! Display classification of balances.

use serde::{Deserialize, Serialize};

use crate::setup::SetupError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusTier {
    Full,
    Medium,
    Low,
}

/// Two-threshold tier policy.
///
/// `FULL` strictly above `high`, `LOW` strictly below `low`, `MEDIUM` otherwise
/// (both thresholds themselves classify as `MEDIUM`). Has no effect on ledger
/// correctness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierPolicy {
    high: f64,
    low: f64,
}

impl TierPolicy {
    pub const DEFAULT_HIGH: f64 = 700.0;
    pub const DEFAULT_LOW: f64 = 20.0;

    pub fn new(high: f64, low: f64) -> Result<Self, SetupError> {
        if !high.is_finite() || !low.is_finite() || low > high {
            return Err(SetupError::InvalidThresholds { high, low });
        }
        Ok(Self { high, low })
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn classify(&self, balance: f64) -> StatusTier {
        if balance > self.high {
            StatusTier::Full
        } else if balance >= self.low {
            StatusTier::Medium
        } else {
            StatusTier::Low
        }
    }
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self {
            high: Self::DEFAULT_HIGH,
            low: Self::DEFAULT_LOW,
        }
    }
}
