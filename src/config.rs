// src/config.rs
//
// Central configuration for the reservoir environment.
// Defaults follow the Castelletti et al. single-dam benchmark
// parameterisation (capacity 10, demands 4 / 3, inflow N(2, 1)).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Immutable per-instance configuration of the reservoir engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Reservoir capacity in storage units.
    ///
    /// Doubles as the maximum volume that can be released in a single
    /// step (which is more than IRL, but keeps the action space tied to
    /// a single parameter).
    pub capacity: i64,
    /// Downstream water demand per step.
    pub water_demand: f64,
    /// Release volume needed to meet the hydro-electric power demand
    /// per step.
    pub power_demand: f64,
    /// Mean of the per-step stochastic inflow.
    pub inflow_mean: f64,
    /// Standard deviation of the per-step stochastic inflow.
    /// Zero degenerates to a deterministic inflow equal to the mean.
    pub inflow_std: f64,
    /// Feed the magnitude of infeasible release requests back into the
    /// reward as a penalty.
    pub penalize: bool,
    /// Fixed storage level applied on every reset.
    ///
    /// When `None`, each reset draws uniformly from `[0, capacity]`
    /// inclusive using the engine-owned RNG.
    pub initial_level: Option<i64>,
    /// Seed for the engine-owned RNG. When `None`, the RNG is seeded
    /// from OS entropy at construction.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 10,
            water_demand: 4.0,
            power_demand: 3.0,
            inflow_mean: 2.0,
            inflow_std: 1.0,
            penalize: true,
            initial_level: None,
            seed: None,
        }
    }
}

impl Config {
    /// Check the configuration invariants.
    ///
    /// Called by `DamEnv::new`, so a bad configuration is rejected at
    /// construction rather than surfacing as nonsense mid-episode.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity <= 0 {
            return Err(ConfigError::NonPositiveCapacity {
                capacity: self.capacity,
            });
        }

        for (field, value) in [
            ("water_demand", self.water_demand),
            ("power_demand", self.power_demand),
            ("inflow_mean", self.inflow_mean),
            ("inflow_std", self.inflow_std),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteParameter { field, value });
            }
        }

        for (field, value) in [
            ("water_demand", self.water_demand),
            ("power_demand", self.power_demand),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeDemand { field, value });
            }
        }

        if self.inflow_std < 0.0 {
            return Err(ConfigError::NegativeInflowStd {
                value: self.inflow_std,
            });
        }

        if let Some(level) = self.initial_level {
            if level < 0 {
                return Err(ConfigError::NegativeInitialLevel { value: level });
            }
        }

        Ok(())
    }
}

/// Errors raised by [`Config::validate`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NonPositiveCapacity { capacity: i64 },
    NegativeDemand { field: &'static str, value: f64 },
    NonFiniteParameter { field: &'static str, value: f64 },
    NegativeInflowStd { value: f64 },
    NegativeInitialLevel { value: i64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveCapacity { capacity } => {
                write!(f, "capacity must be positive, got {}", capacity)
            }
            ConfigError::NegativeDemand { field, value } => {
                write!(f, "'{}' must be non-negative, got {}", field, value)
            }
            ConfigError::NonFiniteParameter { field, value } => {
                write!(f, "'{}' must be finite, got {}", field, value)
            }
            ConfigError::NegativeInflowStd { value } => {
                write!(f, "inflow_std must be non-negative, got {}", value)
            }
            ConfigError::NegativeInitialLevel { value } => {
                write!(f, "initial_level must be non-negative, got {}", value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
