#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::interpolate::{Interpolant, InterpolationError};
use crate::dsp::noise::{NoiseProcess, OnsetSource};
use crate::dsp::periodic::{PeriodicWaveform, WaveformError};
use crate::dsp::series::SampleSeries;
use crate::io::sink::Sink;
use crate::synth::config::{ConfigError, SimulatorConfig};

/*
The Tick Loop
=============

Every tick produces exactly one output sample:

    t = tick * tick_spacing

    y  = reference(t)             periodic calibration pulse
    y += noise.advance(t)         0 unless a burst is playing
    y  = min(y, max_voltage)      hardware ceiling
    emit (t, y)

Only the top is clipped. The circuit being emulated saturates at its supply
rail but happily swings below the floor, so negative excursions pass through
untouched.

Time is computed from the tick count rather than accumulated, so the
millionth sample lands exactly where it should instead of carrying a million
rounding errors.

The loop has no end of its own. `run` keeps going until the sink reports
SinkClosed; the generator is also an Iterator for callers that would rather
pull samples themselves.
*/

/// One emitted `(time, value)` pair.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub value: f64,
}

impl std::fmt::Display for Sample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3},{:.3}", self.time, self.value)
    }
}

/// Counters for one call to [`SignalGenerator::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Samples the sink accepted
    pub samples: u64,
    /// Noise bursts started
    pub noise_pulses: u64,
    /// Samples cut down to `max_voltage`
    pub clipped: u64,
}

/// Reference pulse plus noise bursts, sampled on a fixed time grid.
///
/// ```
/// use pulsesim::io::LimitSink;
/// use pulsesim::{InterpolationKind, SampleSeries, SignalGenerator, SimulatorConfig};
///
/// let triangle = SampleSeries::from_raw([(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]).unwrap();
/// let config = SimulatorConfig::new()
///     .tick_spacing(1.0)
///     .gap(1.0)
///     .noise_probability(0.0)
///     .reference_kind(InterpolationKind::Linear)
///     .noise_kind(InterpolationKind::Linear);
///
/// let mut generator =
///     SignalGenerator::from_config(&config, &triangle, &triangle, config.onset_source()).unwrap();
/// let mut sink = LimitSink::new(Vec::new(), 6);
/// generator.run(&mut sink).unwrap();
///
/// let values: Vec<f64> = sink.into_inner().iter().map(|s| s.value).collect();
/// assert_eq!(values, [0.0, 1.0, 0.0, 0.0, 1.0, 0.0]);
/// ```
pub struct SignalGenerator<S> {
    reference: PeriodicWaveform,
    noise: NoiseProcess,
    source: S,
    tick_spacing: f64,
    max_voltage: f64,

    // Runtime state
    tick: u64,
    clipped: u64,
}

impl<S: OnsetSource> SignalGenerator<S> {
    pub fn new(
        reference: PeriodicWaveform,
        noise: NoiseProcess,
        source: S,
        tick_spacing: f64,
        max_voltage: f64,
    ) -> Self {
        Self {
            reference,
            noise,
            source,
            tick_spacing,
            max_voltage,
            tick: 0,
            clipped: 0,
        }
    }

    /// Build the reference wave and noise process described by `config`.
    pub fn from_config(
        config: &SimulatorConfig,
        reference: &SampleSeries,
        noise: &SampleSeries,
        source: S,
    ) -> Result<Self, GeneratorError> {
        config.validate()?;

        warn_if_off_floor(reference, config.floor);

        let pulse = Interpolant::build(reference, config.reference_kind)?;
        let reference =
            PeriodicWaveform::new(pulse, config.offset, config.gap, config.floor)?;

        let burst = Interpolant::build(noise, config.noise_kind)?;
        let noise = NoiseProcess::new(burst, config.noise_probability, config.tick_spacing);

        Ok(Self::new(
            reference,
            noise,
            source,
            config.tick_spacing,
            config.max_voltage,
        ))
    }

    /// Time of the next sample.
    pub fn current_time(&self) -> f64 {
        self.tick as f64 * self.tick_spacing
    }

    /// Produce the sample for the current time and move to the next tick.
    pub fn tick(&mut self) -> Result<Sample, InterpolationError> {
        let time = self.current_time();

        let mut value = self.reference.evaluate(time)?;
        value += self.noise.advance(time, &mut self.source)?;

        if value > self.max_voltage {
            value = self.max_voltage;
            self.clipped += 1;
        }

        self.tick += 1;
        Ok(Sample { time, value })
    }

    /// Feed samples into `sink` until it closes.
    ///
    /// A closed sink is the normal way out and yields `Ok`. An interpolation
    /// error means the wrap or noise window arithmetic is broken and aborts
    /// the run.
    pub fn run<K: Sink + ?Sized>(&mut self, sink: &mut K) -> Result<RunSummary, GeneratorError> {
        let onsets_before = self.noise.onsets();
        let clipped_before = self.clipped;
        let mut samples = 0u64;

        log::info!(
            "generating from t={} every {} (cycle {}, ceiling {})",
            self.current_time(),
            self.tick_spacing,
            self.reference.cycle_length(),
            self.max_voltage
        );

        loop {
            let sample = self.tick()?;
            if sink.accept(sample).is_err() {
                break;
            }
            samples += 1;
        }

        // Whatever was buffered is lost if the sink already went away
        if sink.flush().is_err() {
            log::debug!("final flush refused by closed sink");
        }

        let summary = RunSummary {
            samples,
            noise_pulses: self.noise.onsets() - onsets_before,
            clipped: self.clipped - clipped_before,
        };
        log::info!(
            "sink closed after {} samples ({} noise bursts, {} clipped)",
            summary.samples,
            summary.noise_pulses,
            summary.clipped
        );
        Ok(summary)
    }

    /// Rewind to t = 0 with no burst in flight, drawing onsets from `source`
    /// from now on.
    ///
    /// Passing a source seeded like the original one replays the same stream.
    pub fn reset(&mut self, source: S) {
        self.tick = 0;
        self.clipped = 0;
        self.source = source;
        self.noise.reset();
    }

    pub fn reference(&self) -> &PeriodicWaveform {
        &self.reference
    }

    pub fn noise(&self) -> &NoiseProcess {
        &self.noise
    }

    pub fn tick_spacing(&self) -> f64 {
        self.tick_spacing
    }

    pub fn max_voltage(&self) -> f64 {
        self.max_voltage
    }
}

impl<S: OnsetSource> Iterator for SignalGenerator<S> {
    type Item = Result<Sample, InterpolationError>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.tick())
    }
}

fn warn_if_off_floor(reference: &SampleSeries, floor: f64) {
    const TOLERANCE: f64 = 1e-9;

    let (first, last) = (reference.first_value(), reference.last_value());
    if (first - floor).abs() > TOLERANCE || (last - floor).abs() > TOLERANCE {
        log::warn!(
            "reference pulse runs {} -> {} but the floor is {}; expect steps at every pulse boundary",
            first,
            last,
            floor
        );
    }
}

/// Errors that can occur when building or running a generator
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorError {
    Config(ConfigError),
    Waveform(WaveformError),
    /// Too little calibration data, or an out-of-domain evaluation mid-run
    Interpolation(InterpolationError),
}

impl std::fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeneratorError::Config(err) => write!(f, "Invalid configuration: {}", err),
            GeneratorError::Waveform(err) => write!(f, "Invalid reference waveform: {}", err),
            GeneratorError::Interpolation(err) => write!(f, "Interpolation failed: {}", err),
        }
    }
}

impl std::error::Error for GeneratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeneratorError::Config(err) => Some(err),
            GeneratorError::Waveform(err) => Some(err),
            GeneratorError::Interpolation(err) => Some(err),
        }
    }
}

impl From<ConfigError> for GeneratorError {
    fn from(err: ConfigError) -> Self {
        GeneratorError::Config(err)
    }
}

impl From<WaveformError> for GeneratorError {
    fn from(err: WaveformError) -> Self {
        GeneratorError::Waveform(err)
    }
}

impl From<InterpolationError> for GeneratorError {
    fn from(err: InterpolationError) -> Self {
        GeneratorError::Interpolation(err)
    }
}
