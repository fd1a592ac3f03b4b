//! Benchmarks for complete generator runs.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput};
use pulsesim::io::{LimitSink, WriteSink};
use pulsesim::{InterpolationKind, SampleSeries, SignalGenerator, SimulatorConfig};

use crate::bump;

const RUN_LENGTH: u64 = 10_000;

pub fn bench_generator(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/generator");
    group.throughput(Throughput::Elements(RUN_LENGTH));

    let reference = SampleSeries::from_raw(bump(512)).unwrap();
    let noise = SampleSeries::from_raw([(0.0, 0.0), (0.5, 8.0), (1.0, -1.0), (2.0, 0.0)]).unwrap();

    // === QUIET ===
    // Defaults apart from a shorter gap so the pulse actually shows up
    let quiet = SimulatorConfig::new().gap(100.0).seed(Some(1));

    // === NOISY ===
    // A burst roughly every 10 time units, so the noise lookup runs often
    let noisy = SimulatorConfig::new()
        .gap(100.0)
        .noise_probability(0.1)
        .noise_kind(InterpolationKind::Cubic)
        .seed(Some(1));

    for (name, config) in [("quiet", &quiet), ("noisy", &noisy)] {
        group.bench_with_input(BenchmarkId::new("vec_sink", name), config, |b, config| {
            b.iter(|| {
                let mut generator = SignalGenerator::from_config(
                    config,
                    &reference,
                    &noise,
                    config.onset_source(),
                )
                .unwrap();
                let mut sink = LimitSink::new(Vec::with_capacity(RUN_LENGTH as usize), RUN_LENGTH);
                black_box(generator.run(&mut sink).unwrap())
            })
        });
    }

    // Includes the text formatting the command-line tool pays for
    group.bench_function("text_sink", |b| {
        b.iter(|| {
            let mut generator =
                SignalGenerator::from_config(&noisy, &reference, &noise, noisy.onset_source())
                    .unwrap();
            let mut sink = LimitSink::new(WriteSink::new(Vec::new()), RUN_LENGTH);
            black_box(generator.run(&mut sink).unwrap())
        })
    });

    group.finish();
}
