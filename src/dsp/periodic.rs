use crate::dsp::interpolate::{Interpolant, InterpolationError};

/*
Periodic Wrap
=============

A calibration file holds exactly one pulse. A real sensor emits that pulse
over and over, separated by silence. PeriodicWaveform turns the single pulse
into an infinite signal by folding time back into one cycle:

    value
      │        ╱╲                    ╱╲
      │       ╱  ╲                  ╱  ╲
floor └──────╱────╲────────────────╱────╲──────────→ t
       offset pulse     gap   offset pulse    gap
      |<-------- cycle -------->|

    cycle = offset + pulse length + gap
    phase = t mod cycle                     (always in [0, cycle))

    phase <  offset                  → floor
    phase <  offset + pulse length   → pulse(phase - offset)
    otherwise                        → floor

Because the pulse is only ever asked for `phase - offset`, which is inside
[0, pulse length) by construction, the interpolant never sees an
out-of-domain time.

The pulse should start and end at the floor. If it doesn't, the output jumps
at the pulse boundaries: the wrap makes no attempt to smooth that over.
*/

/// An interpolated pulse repeated forever with a leading offset and trailing gap.
#[derive(Debug, Clone)]
pub struct PeriodicWaveform {
    pulse: Interpolant,
    offset: f64,
    gap: f64,
    floor: f64,
    cycle_length: f64,
}

impl PeriodicWaveform {
    pub fn new(pulse: Interpolant, offset: f64, gap: f64, floor: f64) -> Result<Self, WaveformError> {
        if !offset.is_finite() || offset < 0.0 {
            return Err(WaveformError::InvalidOffset(offset));
        }
        if !gap.is_finite() || gap < 0.0 {
            return Err(WaveformError::InvalidGap(gap));
        }
        if !floor.is_finite() {
            return Err(WaveformError::InvalidFloor(floor));
        }

        let cycle_length = offset + pulse.domain_length() + gap;
        if cycle_length <= 0.0 {
            return Err(WaveformError::EmptyCycle);
        }

        log::debug!(
            "periodic waveform: offset {}, pulse {}, gap {}, cycle {}",
            offset,
            pulse.domain_length(),
            gap,
            cycle_length
        );

        Ok(Self {
            pulse,
            offset,
            gap,
            floor,
            cycle_length,
        })
    }

    /// Repeat `pulse` back to back with no offset, no gap and a zero floor.
    pub fn back_to_back(pulse: Interpolant) -> Result<Self, WaveformError> {
        Self::new(pulse, 0.0, 0.0, 0.0)
    }

    /// Value of the repeating signal at time `t`. Negative times wrap too.
    pub fn evaluate(&self, t: f64) -> Result<f64, InterpolationError> {
        let phase = t.rem_euclid(self.cycle_length);
        let pulse_end = self.offset + self.pulse.domain_length();

        if phase < self.offset {
            Ok(self.floor)
        } else if phase < pulse_end {
            self.pulse.evaluate(phase - self.offset)
        } else {
            Ok(self.floor)
        }
    }

    pub fn cycle_length(&self) -> f64 {
        self.cycle_length
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn gap(&self) -> f64 {
        self.gap
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// The single pulse being repeated.
    pub fn pulse(&self) -> &Interpolant {
        &self.pulse
    }
}

/// Errors that can occur when building a periodic waveform
#[derive(Debug, Clone, PartialEq)]
pub enum WaveformError {
    /// Offset must be finite and non-negative
    InvalidOffset(f64),
    /// Gap must be finite and non-negative
    InvalidGap(f64),
    /// Floor must be finite
    InvalidFloor(f64),
    /// Offset, pulse and gap add up to zero
    EmptyCycle,
}

impl std::fmt::Display for WaveformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaveformError::InvalidOffset(v) => {
                write!(f, "Offset must be finite and >= 0, got {}", v)
            }
            WaveformError::InvalidGap(v) => write!(f, "Gap must be finite and >= 0, got {}", v),
            WaveformError::InvalidFloor(v) => write!(f, "Floor must be finite, got {}", v),
            WaveformError::EmptyCycle => write!(
                f,
                "Cycle length is zero: pulse has no duration and offset and gap are both 0"
            ),
        }
    }
}

impl std::error::Error for WaveformError {}
