#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rand::rngs::StdRng;

use crate::dsp::interpolate::InterpolationKind;
use crate::dsp::noise::RngOnset;

/// Everything needed to turn two calibration pulses into an output stream.
///
/// Times are in whatever unit the calibration files use (milliseconds for the
/// bench rig this was written for), and `noise_probability` is per that unit.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Time between emitted samples
    pub tick_spacing: f64,
    /// Chance of a noise onset per unit time
    pub noise_probability: f64,
    /// Output ceiling; nothing above this is ever emitted
    pub max_voltage: f64,
    /// Silence appended after each reference pulse
    pub gap: f64,
    /// Silence before each reference pulse
    pub offset: f64,
    /// Value held during offset and gap
    pub floor: f64,
    pub reference_kind: InterpolationKind,
    pub noise_kind: InterpolationKind,
    /// Fixed seed for reproducible noise onsets
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_spacing: 0.5,
            noise_probability: 0.001,
            max_voltage: 5.0,
            gap: 3000.0,
            offset: 0.0,
            floor: 0.0,
            reference_kind: InterpolationKind::Cubic,
            noise_kind: InterpolationKind::Linear,
            seed: None,
        }
    }
}

impl SimulatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick_spacing(mut self, spacing: f64) -> Self {
        self.tick_spacing = spacing;
        self
    }

    pub fn noise_probability(mut self, probability: f64) -> Self {
        self.noise_probability = probability;
        self
    }

    pub fn max_voltage(mut self, max: f64) -> Self {
        self.max_voltage = max;
        self
    }

    pub fn gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn floor(mut self, floor: f64) -> Self {
        self.floor = floor;
        self
    }

    pub fn reference_kind(mut self, kind: InterpolationKind) -> Self {
        self.reference_kind = kind;
        self
    }

    pub fn noise_kind(mut self, kind: InterpolationKind) -> Self {
        self.noise_kind = kind;
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Check every option is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tick_spacing.is_finite() || self.tick_spacing <= 0.0 {
            return Err(ConfigError::TickSpacing(self.tick_spacing));
        }
        if !(0.0..=1.0).contains(&self.noise_probability) {
            return Err(ConfigError::NoiseProbability(self.noise_probability));
        }
        if !self.max_voltage.is_finite() {
            return Err(ConfigError::MaxVoltage(self.max_voltage));
        }
        if !self.gap.is_finite() || self.gap < 0.0 {
            return Err(ConfigError::Gap(self.gap));
        }
        if !self.offset.is_finite() || self.offset < 0.0 {
            return Err(ConfigError::Offset(self.offset));
        }
        if !self.floor.is_finite() {
            return Err(ConfigError::Floor(self.floor));
        }
        Ok(())
    }

    /// Onset source for this run: seeded if a seed was given, OS entropy otherwise.
    pub fn onset_source(&self) -> RngOnset<StdRng> {
        match self.seed {
            Some(seed) => RngOnset::seeded(seed),
            None => RngOnset::from_entropy(),
        }
    }
}

/// An option outside its allowed range
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    TickSpacing(f64),
    NoiseProbability(f64),
    MaxVoltage(f64),
    Gap(f64),
    Offset(f64),
    Floor(f64),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::TickSpacing(v) => write!(f, "tick spacing must be > 0, got {}", v),
            ConfigError::NoiseProbability(v) => {
                write!(f, "noise probability must be within [0, 1], got {}", v)
            }
            ConfigError::MaxVoltage(v) => write!(f, "max voltage must be finite, got {}", v),
            ConfigError::Gap(v) => write!(f, "gap must be >= 0, got {}", v),
            ConfigError::Offset(v) => write!(f, "offset must be >= 0, got {}", v),
            ConfigError::Floor(v) => write!(f, "floor must be finite, got {}", v),
        }
    }
}

impl std::error::Error for ConfigError {}
