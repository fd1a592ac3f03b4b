#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered calibration samples with time shifted so the first point sits at zero.
///
/// Raw recordings start at whatever the acquisition clock said. Construction
/// subtracts the first timestamp once, so everything downstream can treat the
/// series as living on `[0, duration]`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawSeries"))]
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSeries {
    times: Vec<f64>,
    values: Vec<f64>,
}

/// Unchecked wire form; deserialized series go through [`SampleSeries::from_raw`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawSeries {
    times: Vec<f64>,
    values: Vec<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawSeries> for SampleSeries {
    type Error = SeriesError;

    fn try_from(raw: RawSeries) -> Result<Self, Self::Error> {
        if raw.times.len() != raw.values.len() {
            return Err(SeriesError::LengthMismatch {
                times: raw.times.len(),
                values: raw.values.len(),
            });
        }
        Self::from_raw(raw.times.into_iter().zip(raw.values))
    }
}

impl SampleSeries {
    /// Build a series from raw `(time, value)` pairs in recording order.
    pub fn from_raw<I>(points: I) -> Result<Self, SeriesError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut times = Vec::new();
        let mut values = Vec::new();
        let mut origin = 0.0;

        for (index, (t, v)) in points.into_iter().enumerate() {
            if !t.is_finite() || !v.is_finite() {
                return Err(SeriesError::NonFinite { index });
            }

            // First row sets the offset
            if index == 0 {
                origin = t;
            }
            let t = t - origin;

            if let Some(&previous) = times.last() {
                if t <= previous {
                    return Err(SeriesError::NotIncreasing {
                        index,
                        previous,
                        time: t,
                    });
                }
            }

            times.push(t);
            values.push(v);
        }

        if times.is_empty() {
            return Err(SeriesError::Empty);
        }

        Ok(Self { times, values })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Sample times, starting at zero.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Time of the last sample (the first one is always zero).
    pub fn duration(&self) -> f64 {
        self.times.last().copied().unwrap_or(0.0)
    }

    pub fn first_value(&self) -> f64 {
        self.values.first().copied().unwrap_or(0.0)
    }

    pub fn last_value(&self) -> f64 {
        self.values.last().copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }
}

/// Errors that can occur when building a sample series
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesError {
    /// No samples at all
    Empty,
    /// A time or value was NaN or infinite
    NonFinite { index: usize },
    /// Timestamps must strictly increase
    NotIncreasing {
        index: usize,
        previous: f64,
        time: f64,
    },
    /// Times and values of different lengths
    LengthMismatch { times: usize, values: usize },
}

impl std::fmt::Display for SeriesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesError::Empty => write!(f, "Sample series is empty"),
            SeriesError::NonFinite { index } => {
                write!(f, "Sample {} has a non-finite time or value", index)
            }
            SeriesError::NotIncreasing {
                index,
                previous,
                time,
            } => write!(
                f,
                "Sample {} goes back in time: {} after {} (times must strictly increase)",
                index, time, previous
            ),
            SeriesError::LengthMismatch { times, values } => {
                write!(f, "Sample series has {} times but {} values", times, values)
            }
        }
    }
}

impl std::error::Error for SeriesError {}
