//! Putting the pieces together: options and the per-tick loop.

pub mod config;
pub mod generator;

pub use config::{ConfigError, SimulatorConfig};
pub use generator::{GeneratorError, RunSummary, Sample, SignalGenerator};
