//! Benchmarks for building and evaluating interpolants.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use pulsesim::{Interpolant, InterpolationKind, SampleSeries};

use crate::{bump, PULSE_SIZES};

pub fn bench_interpolate(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/interpolate");

    for &size in PULSE_SIZES {
        let series = SampleSeries::from_raw(bump(size)).unwrap();

        // Building the cubic solves one tridiagonal system over every knot
        group.bench_with_input(BenchmarkId::new("build_cubic", size), &size, |b, _| {
            b.iter(|| Interpolant::build(black_box(&series), InterpolationKind::Cubic).unwrap())
        });

        for kind in [InterpolationKind::Linear, InterpolationKind::Cubic] {
            let interpolant = Interpolant::build(&series, kind).unwrap();
            let length = interpolant.domain_length();
            // 1000 evenly spread lookups per iteration
            let queries: Vec<f64> = (0..1000).map(|i| length * i as f64 / 1000.0).collect();

            group.bench_with_input(
                BenchmarkId::new(format!("evaluate_{}", kind), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        let mut acc = 0.0;
                        for &t in &queries {
                            acc += interpolant.evaluate(black_box(t)).unwrap();
                        }
                        acc
                    })
                },
            );
        }
    }

    group.finish();
}
