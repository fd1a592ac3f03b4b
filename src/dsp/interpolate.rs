#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::series::SampleSeries;

/*
Interpolation
=============

Calibration pulses arrive as a handful of irregularly spaced measurements.
The generator needs a value at *any* time inside the recording, so we fit a
continuous function through the points and evaluate that instead.

Vocabulary
----------

  knot          One (time, value) sample the curve must pass through.

  interval      The span between two neighbouring knots. Interval j covers
                [t_j, t_{j+1}] and has width h_j = t_{j+1} - t_j.

  domain        [0, t_last]. The fitted function is only meaningful here;
                asking for anything outside it is a caller bug, so we return
                an error rather than extrapolating.


Linear
------

Straight segments between neighbouring knots:

    y(t) = y_j + (y_{j+1} - y_j) * (t - t_j) / h_j

Cheap, never overshoots, but has corners at every knot. Good enough for the
noise burst, which is jagged anyway.


Cubic Spline
------------

One cubic polynomial per interval, glued together so that value, slope and
curvature are continuous at every interior knot (C²). Written in terms of the
second derivatives M_j at each knot:

    y(t) = M_j     (t_{j+1} - t)³ / 6h  +  M_{j+1} (t - t_j)³ / 6h
         + (y_j/h     - M_j h/6)     (t_{j+1} - t)
         + (y_{j+1}/h - M_{j+1} h/6) (t - t_j)

Continuity of the slope at interior knot i gives one equation per knot:

    h_{i-1} M_{i-1} + 2(h_{i-1} + h_i) M_i + h_i M_{i+1}
        = 6 * (slope_i - slope_{i-1})

That is n - 2 equations for n unknowns. The two missing ones are the end
conditions. We use "not-a-knot": the third derivative is also continuous at
the second and second-to-last knots, so the first two intervals share one
cubic (and likewise the last two):

    M_0     = M_1     + h_0/h_1         (M_1     - M_2)
    M_{n-1} = M_{n-2} + h_{n-2}/h_{n-3} (M_{n-2} - M_{n-3})

Substituting those into the first and last interior rows keeps the system
tridiagonal, so it's solved with a single Thomas sweep.

Not-a-knot needs two interior knots to work with, hence the 4-point minimum.
It reproduces any cubic polynomial exactly, which makes it easy to test.
*/

/// How to fill the gaps between calibration samples.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationKind {
    /// Straight segments between samples
    Linear,
    /// C² cubic spline with not-a-knot ends
    Cubic,
}

impl InterpolationKind {
    /// Fewest samples this kind can be built from.
    pub fn min_points(self) -> usize {
        match self {
            InterpolationKind::Linear => 2,
            InterpolationKind::Cubic => 4,
        }
    }
}

impl std::fmt::Display for InterpolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterpolationKind::Linear => write!(f, "linear"),
            InterpolationKind::Cubic => write!(f, "cubic"),
        }
    }
}

impl std::str::FromStr for InterpolationKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(InterpolationKind::Linear),
            "cubic" => Ok(InterpolationKind::Cubic),
            _ => Err(ParseKindError(s.to_string())),
        }
    }
}

/// Unknown interpolation kind name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKindError(String);

impl std::fmt::Display for ParseKindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown interpolation kind '{}' (expected 'linear' or 'cubic')",
            self.0
        )
    }
}

impl std::error::Error for ParseKindError {}

/// A continuous function through every sample of a [`SampleSeries`].
#[derive(Debug, Clone)]
pub struct Interpolant {
    kind: InterpolationKind,
    times: Vec<f64>,
    values: Vec<f64>,
    second_derivatives: Vec<f64>, // empty for linear
    domain_length: f64,
}

impl Interpolant {
    pub fn build(series: &SampleSeries, kind: InterpolationKind) -> Result<Self, InterpolationError> {
        let required = kind.min_points();
        if series.len() < required {
            return Err(InterpolationError::InsufficientData {
                kind,
                required,
                actual: series.len(),
            });
        }

        let times = series.times().to_vec();
        let values = series.values().to_vec();
        let second_derivatives = match kind {
            InterpolationKind::Linear => Vec::new(),
            InterpolationKind::Cubic => not_a_knot_curvatures(&times, &values),
        };

        log::debug!(
            "built {} interpolant over {} samples, domain [0, {}]",
            kind,
            times.len(),
            series.duration()
        );

        Ok(Self {
            kind,
            domain_length: series.duration(),
            times,
            values,
            second_derivatives,
        })
    }

    pub fn kind(&self) -> InterpolationKind {
        self.kind
    }

    /// Length of the valid input range `[0, domain_length]`.
    pub fn domain_length(&self) -> f64 {
        self.domain_length
    }

    /// Largest sample value.
    pub fn peak(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// True if `t` lies inside the domain.
    ///
    /// The upper edge allows a few ulps of slack so that wrapped phases that
    /// land a rounding error past the end are still accepted.
    pub fn contains(&self, t: f64) -> bool {
        let slack = self.domain_length * 4.0 * f64::EPSILON;
        t >= 0.0 && t <= self.domain_length + slack
    }

    /// Value of the interpolant at `t`.
    pub fn evaluate(&self, t: f64) -> Result<f64, InterpolationError> {
        if !self.contains(t) {
            return Err(InterpolationError::Domain {
                t,
                domain_length: self.domain_length,
            });
        }
        let t = t.min(self.domain_length);

        // Interval j covers [t_j, t_{j+1}]; the last knot belongs to the last interval
        let last_interval = self.times.len() - 2;
        let j = self
            .times
            .partition_point(|&knot| knot <= t)
            .saturating_sub(1)
            .min(last_interval);

        let (t0, t1) = (self.times[j], self.times[j + 1]);
        let (y0, y1) = (self.values[j], self.values[j + 1]);
        let h = t1 - t0;

        let value = match self.kind {
            InterpolationKind::Linear => y0 + (y1 - y0) * (t - t0) / h,
            InterpolationKind::Cubic => {
                let (m0, m1) = (self.second_derivatives[j], self.second_derivatives[j + 1]);
                let a = t1 - t;
                let b = t - t0;
                m0 * a * a * a / (6.0 * h)
                    + m1 * b * b * b / (6.0 * h)
                    + (y0 / h - m0 * h / 6.0) * a
                    + (y1 / h - m1 * h / 6.0) * b
            }
        };

        Ok(value)
    }
}

/// Second derivative at every knot for a not-a-knot cubic spline.
///
/// Expects at least four strictly increasing knots.
fn not_a_knot_curvatures(times: &[f64], values: &[f64]) -> Vec<f64> {
    let n = times.len();
    debug_assert!(n >= 4);

    let h: Vec<f64> = times.windows(2).map(|w| w[1] - w[0]).collect();
    let slope: Vec<f64> = values
        .windows(2)
        .zip(&h)
        .map(|(w, &width)| (w[1] - w[0]) / width)
        .collect();

    // Unknowns are M_1 ..= M_{n-2}; row r solves for knot r + 1
    let rows = n - 2;
    let mut sub = vec![0.0; rows];
    let mut diag = vec![0.0; rows];
    let mut sup = vec![0.0; rows];
    let mut rhs = vec![0.0; rows];

    for r in 0..rows {
        let i = r + 1;
        sub[r] = h[i - 1];
        diag[r] = 2.0 * (h[i - 1] + h[i]);
        sup[r] = h[i];
        rhs[r] = 6.0 * (slope[i] - slope[i - 1]);
    }

    // Fold the end conditions into the first and last rows
    let (h0, h1) = (h[0], h[1]);
    diag[0] = (h0 + h1) * (h0 + 2.0 * h1) / h1;
    sup[0] = (h1 * h1 - h0 * h0) / h1;

    let (a, b) = (h[n - 3], h[n - 2]);
    sub[rows - 1] = (a * a - b * b) / a;
    diag[rows - 1] = (a + b) * (2.0 * a + b) / a;

    // Thomas algorithm: forward sweep...
    let mut c_prime = vec![0.0; rows];
    let mut d_prime = vec![0.0; rows];
    c_prime[0] = sup[0] / diag[0];
    d_prime[0] = rhs[0] / diag[0];
    for r in 1..rows {
        let denom = diag[r] - sub[r] * c_prime[r - 1];
        c_prime[r] = sup[r] / denom;
        d_prime[r] = (rhs[r] - sub[r] * d_prime[r - 1]) / denom;
    }

    // ...and back substitution
    let mut m = vec![0.0; n];
    m[rows] = d_prime[rows - 1];
    for r in (0..rows - 1).rev() {
        m[r + 1] = d_prime[r] - c_prime[r] * m[r + 2];
    }

    m[0] = m[1] + h0 / h1 * (m[1] - m[2]);
    m[n - 1] = m[n - 2] + b / a * (m[n - 2] - m[n - 3]);

    m
}

/// Errors that can occur when building or evaluating an interpolant
#[derive(Debug, Clone, PartialEq)]
pub enum InterpolationError {
    /// Too few samples for the requested kind
    InsufficientData {
        kind: InterpolationKind,
        required: usize,
        actual: usize,
    },
    /// Evaluated outside `[0, domain_length]`
    Domain { t: f64, domain_length: f64 },
}

impl std::fmt::Display for InterpolationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterpolationError::InsufficientData {
                kind,
                required,
                actual,
            } => write!(
                f,
                "{} interpolation needs at least {} samples, got {}",
                kind, required, actual
            ),
            InterpolationError::Domain { t, domain_length } => write!(
                f,
                "interpolant evaluated at {} outside its domain [0, {}]",
                t, domain_length
            ),
        }
    }
}

impl std::error::Error for InterpolationError {}
