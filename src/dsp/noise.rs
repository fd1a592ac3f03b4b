#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dsp::interpolate::{Interpolant, InterpolationError};

/*
Noise Bursts
============

Real sensor output is occasionally hit by a spurious pulse: a glitch with its
own shape that lands at a random moment on top of the real signal. The noise
process models that as a recorded glitch (an Interpolant) replayed at random
onset times.

Vocabulary
----------

  onset       The tick at which a burst starts. Its time is remembered as
              `start_time`.

  local time  now - start_time. How far into the burst we are.

  threshold   noise_probability * tick_spacing. Compared against one uniform
              draw per idle tick.


Why Scale by Tick Spacing?
--------------------------

`noise_probability` is a rate: chance of an onset per unit of time. With one
draw per tick, the per-draw chance has to shrink as ticks get closer together
or a finer sampling grid would produce more bursts per second. Multiplying by
the spacing keeps the expected onset rate per unit time the same at any
resolution.


The State Machine
-----------------

    ┌──────┐  draw < threshold   ┌────────────────────────┐
    │ Idle │ ──────────────────→ │ Active { start_time }  │
    └──────┘                     └────────────────────────┘
        ↑                                   │
        │   local time > burst length       │
        └───────────────────────────────────┘

Per tick, in this order:

  1. Idle:   draw once. Below the threshold → Active, start_time = now.
  2. Active: local = now - start_time.
               local <= burst length → contribute burst(local), stay Active
               otherwise             → go Idle, contribute 0

The onset tick itself already contributes burst(0). The tick that ends a
burst contributes 0 and takes no draw, so a new burst can start on the tick
after at the earliest.

Only one burst is ever in flight: no draw is taken while Active, so bursts
can't overlap or restart each other.
*/

/// Where the noise process gets its uniform draws from.
///
/// Implemented for any `FnMut() -> f64` so tests can script onsets.
pub trait OnsetSource {
    /// A uniform value in `[0, 1)`.
    fn draw(&mut self) -> f64;
}

impl<F: FnMut() -> f64> OnsetSource for F {
    fn draw(&mut self) -> f64 {
        self()
    }
}

/// Onset draws backed by a `rand` generator.
pub struct RngOnset<R> {
    rng: R,
}

impl<R: Rng> RngOnset<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngOnset<StdRng> {
    /// Reproducible draws from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Draws seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> OnsetSource for RngOnset<R> {
    fn draw(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Current state of the noise process.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseState {
    Idle,                      // Waiting for an onset, contributes 0
    Active { start_time: f64 }, // Playing the burst from start_time
}

pub struct NoiseProcess {
    burst: Interpolant,
    threshold: f64, // per-tick onset chance
    state: NoiseState,
    onsets: u64, // bursts started so far
}

impl NoiseProcess {
    /// `probability` is the onset chance per unit time; `tick_spacing` is the
    /// time between calls to [`advance`](Self::advance).
    pub fn new(burst: Interpolant, probability: f64, tick_spacing: f64) -> Self {
        Self {
            burst,
            threshold: probability * tick_spacing,
            state: NoiseState::Idle,
            onsets: 0,
        }
    }

    /// Advance one tick to time `now` and return this tick's noise contribution.
    pub fn advance<S>(&mut self, now: f64, source: &mut S) -> Result<f64, InterpolationError>
    where
        S: OnsetSource + ?Sized,
    {
        if matches!(self.state, NoiseState::Idle) && source.draw() < self.threshold {
            self.state = NoiseState::Active { start_time: now };
            self.onsets += 1;
            log::trace!("noise onset at {}", now);
        }

        match self.state {
            NoiseState::Idle => Ok(0.0),
            NoiseState::Active { start_time } => {
                let local = now - start_time;
                if local <= self.burst.domain_length() {
                    self.burst.evaluate(local)
                } else {
                    self.state = NoiseState::Idle;
                    Ok(0.0)
                }
            }
        }
    }

    pub fn state(&self) -> NoiseState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, NoiseState::Active { .. })
    }

    /// Per-tick onset chance (`probability * tick_spacing`).
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Number of bursts started since construction or the last reset.
    pub fn onsets(&self) -> u64 {
        self.onsets
    }

    pub fn burst(&self) -> &Interpolant {
        &self.burst
    }

    /// Drop any burst in flight and return to idle.
    pub fn reset(&mut self) {
        self.state = NoiseState::Idle;
        self.onsets = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::interpolate::InterpolationKind;
    use crate::dsp::series::SampleSeries;

    fn spike() -> Interpolant {
        let series = SampleSeries::from_raw([(0.0, 0.0), (1.0, 10.0), (2.0, 0.0)]).unwrap();
        Interpolant::build(&series, InterpolationKind::Linear).unwrap()
    }

    fn run_ticks(noise: &mut NoiseProcess, source: &mut impl OnsetSource, ticks: usize) -> Vec<f64> {
        (0..ticks)
            .map(|i| noise.advance(i as f64, &mut *source).unwrap())
            .collect()
    }

    #[test]
    fn never_fires_with_zero_probability() {
        let mut noise = NoiseProcess::new(spike(), 0.0, 1.0);
        let mut source = RngOnset::seeded(7);

        let out = run_ticks(&mut noise, &mut source, 1_000);
        assert!(out.iter().all(|&v| v == 0.0));
        assert_eq!(noise.onsets(), 0);
        assert!(!noise.is_active());
    }

    #[test]
    fn certain_onset_plays_burst_then_rearms() {
        let mut noise = NoiseProcess::new(spike(), 1.0, 1.0);
        let mut source = || 0.5;

        // onset, peak, end, expire, onset, peak...
        let out = run_ticks(&mut noise, &mut source, 7);
        assert_eq!(out, vec![0.0, 10.0, 0.0, 0.0, 0.0, 10.0, 0.0]);
        assert_eq!(noise.onsets(), 2);
    }

    #[test]
    fn no_draw_while_active() {
        let mut noise = NoiseProcess::new(spike(), 1.0, 1.0);
        let mut draws = 0;
        let mut source = || {
            draws += 1;
            0.0
        };

        // Ticks 0..=3 cover one burst (0, 1, 2 active; 3 expires)
        for i in 0..4 {
            noise.advance(i as f64, &mut source).unwrap();
        }
        drop(source);
        assert_eq!(draws, 1);
    }

    #[test]
    fn active_no_longer_than_burst() {
        let mut noise = NoiseProcess::new(spike(), 0.3, 0.25);
        let mut source = RngOnset::seeded(42);
        let burst_length = noise.burst().domain_length();

        for i in 0..20_000 {
            let now = i as f64 * 0.25;
            noise.advance(now, &mut source).unwrap();
            if let NoiseState::Active { start_time } = noise.state() {
                let local = now - start_time;
                assert!(local >= 0.0 && local <= burst_length, "local={local}");
            }
        }
        assert!(noise.onsets() > 0);
    }

    #[test]
    fn threshold_scales_with_spacing() {
        let noise = NoiseProcess::new(spike(), 0.001, 0.5);
        assert!((noise.threshold() - 0.0005).abs() < 1e-15);
    }

    #[test]
    fn onset_rate_matches_probability() {
        // 0.05 per unit time at spacing 0.1; each burst blocks about 2.2 time
        // units, so expect roughly 1 / (20 + 2.2) ≈ 0.045 onsets per unit.
        let mut noise = NoiseProcess::new(spike(), 0.05, 0.1);
        let mut source = RngOnset::seeded(1234);
        let ticks = 200_000;
        for i in 0..ticks {
            noise.advance(i as f64 * 0.1, &mut source).unwrap();
        }

        let elapsed = ticks as f64 * 0.1;
        let rate = noise.onsets() as f64 / elapsed;
        assert!((0.035..0.055).contains(&rate), "rate={rate}");
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut noise = NoiseProcess::new(spike(), 1.0, 1.0);
        let mut source = || 0.0;
        noise.advance(0.0, &mut source).unwrap();
        assert!(noise.is_active());

        noise.reset();
        assert_eq!(noise.state(), NoiseState::Idle);
        assert_eq!(noise.onsets(), 0);
    }
}
