//! Benchmarks for the periodic wrap around a cubic pulse.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use pulsesim::{Interpolant, InterpolationKind, PeriodicWaveform, SampleSeries};

use crate::{bump, PULSE_SIZES};

pub fn bench_periodic(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/periodic");

    for &size in PULSE_SIZES {
        let series = SampleSeries::from_raw(bump(size)).unwrap();
        let pulse = Interpolant::build(&series, InterpolationKind::Cubic).unwrap();
        let wave = PeriodicWaveform::new(pulse, 25.0, 300.0, 0.0).unwrap();

        // Mostly gap, like the default configuration: most lookups hit the floor
        group.bench_with_input(BenchmarkId::new("evaluate", size), &size, |b, _| {
            b.iter(|| {
                let mut acc = 0.0;
                for i in 0..1000 {
                    acc += wave.evaluate(black_box(i as f64 * 0.5)).unwrap();
                }
                acc
            })
        });
    }

    group.finish();
}
