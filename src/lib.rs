pub mod dsp; // Interpolation, periodic wrap, noise bursts
pub mod io; // Calibration loader and output sinks
pub mod synth; // Configuration and the tick loop

pub use dsp::interpolate::{Interpolant, InterpolationError, InterpolationKind};
pub use dsp::noise::{NoiseProcess, NoiseState, OnsetSource, RngOnset};
pub use dsp::periodic::PeriodicWaveform;
pub use dsp::series::SampleSeries;
pub use io::sink::{Sink, SinkClosed};
pub use synth::config::SimulatorConfig;
pub use synth::generator::{Sample, SignalGenerator};
