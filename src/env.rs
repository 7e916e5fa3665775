// src/env.rs
//
// Gym-style single-reservoir environment (the core of this crate).
//
// Per episode the engine:
// - clamps the requested release to the feasible window,
// - draws a random inflow and updates the storage level,
// - scores the step against the water and power demands.
//
// All transitions are deterministic given the seed. Each instance owns
// its RNG, so independent instances can run side by side without
// interference.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::reward::Reward;

/// Fixed episode horizon. `done` is reported exactly when the step
/// counter reaches this value; the engine does not reject further
/// steps, callers are expected to `reset` on `done`.
pub const EPISODE_STEPS: u64 = 30;

/// Result of a single environment step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    /// Storage level after the transition.
    pub state: i64,
    /// The (water, power) reward pair for this step.
    pub reward: Reward,
    /// Whether the episode just reached its horizon.
    pub done: bool,
    /// Always false; there is no external truncation source.
    pub truncated: bool,
    /// Per-step diagnostics.
    pub info: StepInfo,
}

/// Per-call diagnostic record. Deliberately empty for now, reserved
/// for future fields so the `step`/`reset` signatures stay stable.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StepInfo {}

/// Single-reservoir dynamics engine.
///
/// Holds the immutable configuration, the engine-owned RNG and the
/// mutable episode state (storage level + step counter).
pub struct DamEnv {
    config: Config,
    rng: ChaCha8Rng,
    /// Current storage level. `None` until the first `reset`.
    storage: Option<i64>,
    /// Steps elapsed in the current episode.
    t: u64,
}

impl DamEnv {
    /// Build an engine from a validated configuration.
    ///
    /// Fails fast on an invalid configuration instead of producing
    /// nonsense transitions later.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Self {
            config,
            rng,
            storage: None,
            t: 0,
        })
    }

    /// Start a fresh episode.
    ///
    /// Reseeds the owned RNG iff `seed` is provided. The initial
    /// storage is the configured `initial_level` when set, otherwise a
    /// fresh uniform draw from `[0, capacity]` inclusive.
    ///
    /// Returns the initial storage level and an empty diagnostic
    /// record. Always succeeds.
    pub fn reset(&mut self, seed: Option<u64>) -> (i64, StepInfo) {
        if let Some(seed) = seed {
            self.rng = ChaCha8Rng::seed_from_u64(seed);
        }

        let level = match self.config.initial_level {
            Some(level) => level,
            None => self.rng.gen_range(0..=self.config.capacity),
        };

        self.storage = Some(level);
        self.t = 0;

        (level, StepInfo::default())
    }

    /// Advance the environment by one step.
    ///
    /// `action` is the requested release volume. It does not have to be
    /// feasible: it is clamped to the feasible window and, when
    /// `penalize` is set, the violation magnitude is fed back into both
    /// reward components. The clamped release drives the physics, never
    /// the raw request.
    ///
    /// # Panics
    ///
    /// Panics if called before the first `reset`.
    pub fn step(&mut self, action: i64) -> StepResult {
        let storage = match self.storage {
            Some(s) => s,
            None => panic!("DamEnv::step called before reset"),
        };

        self.t += 1;

        // Feasible release window. The lower bound is non-zero only
        // when storage already exceeds capacity: then enough must be
        // released to pull the level back down. min-after-max keeps
        // NumPy clip semantics when the bounds cross (upper wins).
        let lower = (storage - self.config.capacity).max(0);
        let upper = self.config.capacity;
        let bounded = action.max(lower).min(upper);

        // Penalty proportional to the violation.
        let penalty = if self.config.penalize {
            -((bounded - action).abs() as f64)
        } else {
            0.0
        };

        // Storage update: release the bounded volume, add the inflow,
        // clamp below at zero. No upper clamp; overflow shows up only
        // through the bounding penalty on later steps.
        let inflow = self.sample_inflow();
        let next = (storage - bounded + inflow).max(0);
        self.storage = Some(next);

        let reward = Reward::compute(&self.config, next, bounded, penalty);

        StepResult {
            state: next,
            reward,
            done: self.t == EPISODE_STEPS,
            truncated: false,
            info: StepInfo::default(),
        }
    }

    /// Current storage level, `None` before the first `reset`.
    pub fn storage(&self) -> Option<i64> {
        self.storage
    }

    /// Steps elapsed in the current episode.
    pub fn step_count(&self) -> u64 {
        self.t
    }

    /// The engine's configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Draw one inflow volume, rounded to the nearest integer.
    ///
    /// Rounding is `f64::round`, i.e. half away from zero. Independent
    /// draw each step, no autocorrelation.
    fn sample_inflow(&mut self) -> i64 {
        sample_normal(&mut self.rng, self.config.inflow_mean, self.config.inflow_std).round() as i64
    }
}

/// One sample from N(mean, std) via the Box-Muller transform.
///
/// `std = 0` degenerates to a point mass at `mean`. Exactly two uniform
/// draws are consumed per sample, so the RNG stream advances by the
/// same amount on every call.
fn sample_normal(rng: &mut ChaCha8Rng, mean: f64, std: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-12); // avoid ln(0)
    let u2: f64 = rng.gen();

    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();

    mean + std * z
}
