//! Damsim core library.
//!
//! This crate exposes a discrete-time stochastic single-reservoir
//! water-management environment with a two-component reward, after
//! Castelletti, Pianosi and Restelli (IJCNN 2012). The binary
//! (`src/main.rs`) is just a thin research harness around it.
//!
//! The environment follows the usual Gym-style contract:
//!
//! - `reset(seed)` starts a fresh 30-step episode and returns the
//!   initial storage level,
//! - `step(action)` advances one step and returns the next storage
//!   level, the (water, power) reward pair, and the done flag.
//!
//! A controller requests a release volume each step; the engine clamps
//! it to the feasible window, draws a random inflow, updates storage,
//! and scores the step against the water and power demands. All state
//! transitions are deterministic given the seed; each engine instance
//! owns its RNG, so independent instances never interfere.

pub mod config;
pub mod env;
pub mod logging;
pub mod metrics;
pub mod reward;

// --- Re-exports for ergonomic external use ---------------------------------

pub use config::{Config, ConfigError};

pub use env::{DamEnv, StepInfo, StepResult, EPISODE_STEPS};

pub use logging::{EventSink, FileSink, NoopSink};

pub use metrics::OnlineStats;

pub use reward::Reward;
