// src/reward.rs
//
// Two-component reward for the reservoir environment:
//   (deficit in water supply, deficit in hydro-electric power supply).
// Both components are always <= 0; zero means the demand was met.

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Ordered reward pair. Component order is fixed: water first, power
/// second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    /// Shortfall of post-transition storage w.r.t. the water demand,
    /// plus any action-violation penalty.
    pub water_deficit: f64,
    /// Shortfall of the bounded release w.r.t. the power demand, plus
    /// any action-violation penalty.
    pub power_deficit: f64,
}

impl Reward {
    /// Score one transition.
    ///
    /// `next_storage` is the post-transition storage level,
    /// `bounded_release` the clamped release that produced it, and
    /// `penalty` the (non-positive) action-violation term, which is
    /// added into both components.
    pub fn compute(cfg: &Config, next_storage: i64, bounded_release: i64, penalty: f64) -> Self {
        // Deficit in water supply w.r.t. demand.
        let supply_error = (next_storage as f64 - cfg.water_demand).min(0.0);

        // Deficit in hydro-electric power supply.
        let power_shortfall = (cfg.power_demand - bounded_release as f64).max(0.0);

        Reward {
            water_deficit: supply_error + penalty,
            power_deficit: -power_shortfall + penalty,
        }
    }

    /// The (water, power) pair as a fixed-order array.
    pub fn to_array(self) -> [f64; 2] {
        [self.water_deficit, self.power_deficit]
    }

    /// Unweighted sum of both components, for scalarising harnesses.
    pub fn total(self) -> f64 {
        self.water_deficit + self.power_deficit
    }
}
