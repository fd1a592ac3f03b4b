//! Waveform primitives used by the signal generator.
//!
//! Everything here is a pure function of its inputs except the noise process,
//! which carries a two-state machine advanced once per tick. The generator in
//! `synth` owns all of these and decides the order they are evaluated in.

/// Piecewise-linear and cubic-spline interpolation over a sample series.
pub mod interpolate;
/// Random noise bursts with a single-pulse overlap policy.
pub mod noise;
/// Infinite repetition of one interpolated pulse.
pub mod periodic;
/// Zero-based, strictly increasing (time, value) samples.
pub mod series;

pub use noise::NoiseState;
