//! Core types for the SimView telemetry library
//!
//! This module defines the values that flow through the comparison pipeline:
//! decoded samples, resampled series, lap-time curves, and the error type every
//! stage reports through. All of them are immutable once produced.

use std::fmt;

/// Result type for telemetry operations
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Errors that can occur while resolving, fetching, or processing lap telemetry
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Invalid URL of lap comparison analysis page: {0}")]
    InvalidUrl(String),

    #[error("Unsupported telemetry version {0} (expected 1)")]
    UnsupportedVersion(u32),

    #[error("Invalid telemetry data: {0}")]
    InvalidData(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Cannot align laps: {0}")]
    Alignment(String),

    #[error("Zero average velocity after grid index {index} (position {position:.3})")]
    ZeroVelocity { index: usize, position: f64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// A single decoded telemetry sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetrySample {
    /// Absolute track position (normalized position times track length)
    pub position: f64,
    /// Vehicle speed in km/h
    pub speed: f64,
}

impl TelemetrySample {
    pub fn new(position: f64, speed: f64) -> Self {
        Self { position, speed }
    }
}

/// Decoded samples of one lap, strictly increasing in position
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LapSeries {
    samples: Vec<TelemetrySample>,
}

impl LapSeries {
    /// Build a lap series from samples that are already ordered by position.
    ///
    /// Only the decoder produces lap series from raw telemetry, so this is
    /// mostly useful for tests and for callers holding pre-filtered data.
    pub fn from_samples(samples: Vec<TelemetrySample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[TelemetrySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first_position(&self) -> Option<f64> {
        self.samples.first().map(|s| s.position)
    }

    pub fn last_position(&self) -> Option<f64> {
        self.samples.last().map(|s| s.position)
    }
}

/// Speeds sampled on a uniform position grid
///
/// `positions` and `speeds` always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledSeries {
    positions: Vec<f64>,
    speeds: Vec<f64>,
    step: f64,
}

impl ResampledSeries {
    /// Create a resampled series from parallel position and speed vectors.
    ///
    /// The grid step is derived from the first and last positions, so the
    /// positions are expected to be uniformly spaced.
    pub fn new(positions: Vec<f64>, speeds: Vec<f64>) -> Result<Self> {
        if positions.len() != speeds.len() {
            return Err(TelemetryError::InvalidData(format!(
                "{} positions but {} speeds",
                positions.len(),
                speeds.len()
            )));
        }

        let step = match (positions.first(), positions.last()) {
            (Some(first), Some(last)) if positions.len() > 1 => {
                (last - first) / (positions.len() - 1) as f64
            }
            _ => 0.0,
        };

        Ok(Self {
            positions,
            speeds,
            step,
        })
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    pub fn speeds(&self) -> &[f64] {
        &self.speeds
    }

    /// Distance between consecutive grid points
    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn first_position(&self) -> Option<f64> {
        self.positions.first().copied()
    }

    /// Drop the first `count` grid points, keeping the step unchanged
    pub(crate) fn skip(&self, count: usize) -> Self {
        let count = count.min(self.positions.len());
        Self {
            positions: self.positions[count..].to_vec(),
            speeds: self.speeds[count..].to_vec(),
            step: self.step,
        }
    }

    /// The first `len` grid points
    pub fn truncated(&self, len: usize) -> Self {
        let len = len.min(self.positions.len());
        Self {
            positions: self.positions[..len].to_vec(),
            speeds: self.speeds[..len].to_vec(),
            step: self.step,
        }
    }

    /// Iterate over (position, speed) pairs
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.positions.iter().copied().zip(self.speeds.iter().copied())
    }
}

/// Two resampled laps whose first positions lie within epsilon of each other
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPair {
    pub first: ResampledSeries,
    pub second: ResampledSeries,
}

/// Cumulative elapsed time along a lap
#[derive(Debug, Clone, PartialEq)]
pub struct LapTimeSeries {
    pub positions: Vec<f64>,
    /// Seconds since the first grid point; non-decreasing, starts at 0
    pub times: Vec<f64>,
}

impl LapTimeSeries {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Elapsed time at the last grid point
    pub fn total(&self) -> f64 {
        self.times.last().copied().unwrap_or(0.0)
    }
}

/// Time difference between lap 1 and lap 2 along the common grid
#[derive(Debug, Clone, PartialEq)]
pub struct TimeDelta {
    pub positions: Vec<f64>,
    /// Lap 1 time minus lap 2 time, in seconds
    pub deltas: Vec<f64>,
}

impl TimeDelta {
    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Difference at the end of the common grid (positive: lap 1 is slower)
    pub fn final_delta(&self) -> Option<f64> {
        self.deltas.last().copied()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.positions.iter().copied().zip(self.deltas.iter().copied())
    }
}

/// Headline numbers for one lap of a comparison
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LapSummary {
    /// Elapsed time over the aligned grid, in seconds
    pub lap_time: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    /// First and last position of the resampled grid
    pub span: (f64, f64),
}

impl fmt::Display for LapSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.3}s over {:.1}..{:.1} (speed {:.1}-{:.1} km/h)",
            self.lap_time, self.span.0, self.span.1, self.min_speed, self.max_speed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resampled_series_rejects_mismatched_lengths() {
        let result = ResampledSeries::new(vec![0.0, 1.0], vec![10.0]);
        assert!(matches!(result, Err(TelemetryError::InvalidData(_))));
    }

    #[test]
    fn test_resampled_series_step() {
        let series = ResampledSeries::new(vec![0.0, 0.5, 1.0, 1.5], vec![1.0; 4]).unwrap();
        assert!((series.step() - 0.5).abs() < 1e-12);

        let single = ResampledSeries::new(vec![3.0], vec![1.0]).unwrap();
        assert_eq!(single.step(), 0.0);
    }

    #[test]
    fn test_skip_and_truncate_keep_step() {
        let series =
            ResampledSeries::new(vec![0.0, 1.0, 2.0, 3.0], vec![5.0, 6.0, 7.0, 8.0]).unwrap();

        let tail = series.skip(2);
        assert_eq!(tail.positions(), &[2.0, 3.0]);
        assert_eq!(tail.speeds(), &[7.0, 8.0]);
        assert_eq!(tail.step(), 1.0);

        let head = series.truncated(3);
        assert_eq!(head.positions(), &[0.0, 1.0, 2.0]);
        assert_eq!(head.step(), 1.0);

        assert!(series.skip(10).is_empty());
    }

    #[test]
    fn test_error_display() {
        let err = TelemetryError::ZeroVelocity {
            index: 4,
            position: 12.5,
        };
        assert_eq!(
            err.to_string(),
            "Zero average velocity after grid index 4 (position 12.500)"
        );
        assert_eq!(
            TelemetryError::UnsupportedVersion(2).to_string(),
            "Unsupported telemetry version 2 (expected 1)"
        );
    }
}
