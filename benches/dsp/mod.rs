//! Benchmarks for interpolation and periodic wrapping.

mod interpolate;
mod periodic;

pub use interpolate::bench_interpolate;
pub use periodic::bench_periodic;
