// src/services/cost.rs
// DOCUMENTATION: Trip cost estimation
// PURPOSE: Per-stop pricing plus an optional pickup surcharge

use crate::config::Config;
use rust_decimal::Decimal;

/// Pure cost formula; both constants come from configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEstimator {
    pub base_cost_per_stop: Decimal,
    pub pickup_surcharge: Decimal,
}

impl CostEstimator {
    pub fn new(base_cost_per_stop: Decimal, pickup_surcharge: Decimal) -> Self {
        Self {
            base_cost_per_stop,
            pickup_surcharge,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.base_cost_per_stop, config.pickup_surcharge)
    }

    /// base_cost_per_stop * total_stops, plus the surcharge when pickup is requested
    pub fn estimate(&self, total_stops: usize, pickup_requested: bool) -> Decimal {
        let mut total = self.base_cost_per_stop * Decimal::from(total_stops);
        if pickup_requested {
            total += self.pickup_surcharge;
        }
        total
    }
}
