//! Real-world scenario benchmarks.
//!
//! These run the generator the way the command-line tool does, pushing
//! samples into a sink until it closes.

mod generator;

pub use generator::bench_generator;
