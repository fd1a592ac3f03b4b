//! Command-line options

use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use pulsesim::{InterpolationKind, SimulatorConfig};

/// Emulate a pulse sensor: a repeating calibration pulse with random noise
/// bursts, printed as `time,value` lines on stdout.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Reference pulse CSV; one pulse starting and ending at the floor
    #[arg(short, long, value_name = "FILE", default_value = "valid-pulse.csv")]
    pub reference: PathBuf,

    /// Noise pulse CSV; overlaid at random onsets
    #[arg(short, long, value_name = "FILE", default_value = "noise-pulse.csv")]
    pub noise: PathBuf,

    /// Time between output rows
    #[arg(short, long, default_value_t = 0.5)]
    pub spacing: f64,

    /// Chance per unit time that a noise burst starts
    #[arg(short = 'p', long, default_value_t = 0.001)]
    pub noise_probability: f64,

    /// Highest value the emulated circuit can output
    #[arg(short, long, default_value_t = 5.0, allow_hyphen_values = true)]
    pub max_voltage: f64,

    /// Silence after each reference pulse
    #[arg(short, long, default_value_t = 3000.0)]
    pub gap: f64,

    /// Silence before each reference pulse
    #[arg(long, default_value_t = 0.0)]
    pub offset: f64,

    /// Value held between reference pulses
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub floor: f64,

    /// Interpolation for the reference pulse (linear or cubic)
    #[arg(long, default_value_t = InterpolationKind::Cubic)]
    pub reference_kind: InterpolationKind,

    /// Interpolation for the noise pulse (linear or cubic)
    #[arg(long, default_value_t = InterpolationKind::Linear)]
    pub noise_kind: InterpolationKind,

    /// Seed for reproducible noise onsets
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop after this many rows instead of running until stdout closes
    #[arg(short = 'c', long, value_name = "N")]
    pub samples: Option<u64>,

    /// More logging on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn config(&self) -> SimulatorConfig {
        SimulatorConfig::new()
            .tick_spacing(self.spacing)
            .noise_probability(self.noise_probability)
            .max_voltage(self.max_voltage)
            .gap(self.gap)
            .offset(self.offset)
            .floor(self.floor)
            .reference_kind(self.reference_kind)
            .noise_kind(self.noise_kind)
            .seed(self.seed)
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
