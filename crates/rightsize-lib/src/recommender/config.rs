//! Recommender configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Lower bound of the target utilization band, in percent
pub const DEFAULT_TARGET_LOW: f64 = 40.0;

/// Upper bound of the target utilization band, in percent
pub const DEFAULT_TARGET_HIGH: f64 = 70.0;

/// Billing hours per month used for monthly figures
pub const HOURS_PER_MONTH: f64 = 730.0;

/// Target band and billing parameters for the recommender
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Utilization at or above which an instance is left alone
    pub target_low: f64,
    /// Highest predicted utilization a smaller type may reach
    pub target_high: f64,
    pub hours_per_month: f64,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            target_low: DEFAULT_TARGET_LOW,
            target_high: DEFAULT_TARGET_HIGH,
            hours_per_month: HOURS_PER_MONTH,
        }
    }
}

impl RecommenderConfig {
    pub fn with_band(mut self, low: f64, high: f64) -> Self {
        self.target_low = low;
        self.target_high = high;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_low.is_nan() || self.target_low <= 0.0 {
            return Err(ConfigError::NonPositiveLow(self.target_low));
        }
        if self.target_high.is_nan() || self.target_high > 100.0 {
            return Err(ConfigError::HighAboveHundred(self.target_high));
        }
        if self.target_low >= self.target_high {
            return Err(ConfigError::EmptyBand {
                low: self.target_low,
                high: self.target_high,
            });
        }
        if self.hours_per_month.is_nan() || self.hours_per_month <= 0.0 {
            return Err(ConfigError::NonPositiveHours(self.hours_per_month));
        }
        Ok(())
    }
}
