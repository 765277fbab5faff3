//! Parameter sweep over the external level generator
//!
//! Expands the configured parameter lists into the full Cartesian product of
//! generator configurations and launches the generator once per execution of
//! each, with a reproducible seed stream.

pub mod config;
pub mod runner;

pub use config::{SweepConfig, SWEEP_SETTINGS_FILE, SWEEP_SETTINGS_TEMPLATE};
pub use runner::{run_sweep, Configuration, RunRecord, SweepSummary};
