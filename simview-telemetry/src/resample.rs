//! Resampling onto a uniform position grid
//!
//! Decoded laps are sampled wherever the simulator happened to record a frame.
//! To compare two laps point by point, both are re-evaluated on a grid with a
//! spacing of roughly epsilon using piecewise-linear interpolation.

use crate::config::validate_epsilon;
use crate::types::{LapSeries, ResampledSeries, Result, TelemetryError};

/// Upper bound on grid points per lap
pub const MAX_GRID_POINTS: usize = 10_000_000;

/// Piecewise-linear position → speed mapping over a lap's samples
#[derive(Debug, Clone)]
pub struct LinearInterpolant {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LinearInterpolant {
    /// Build an interpolant from a lap; needs at least two samples.
    pub fn new(lap: &LapSeries) -> Result<Self> {
        if lap.len() < 2 {
            return Err(TelemetryError::InsufficientData(format!(
                "interpolation needs at least 2 samples, lap has {}",
                lap.len()
            )));
        }

        let (xs, ys) = lap.samples().iter().map(|s| (s.position, s.speed)).unzip();
        Ok(Self { xs, ys })
    }

    /// First and last sample position
    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    /// Speed at `x`, or `None` outside the sampled range
    pub fn evaluate(&self, x: f64) -> Option<f64> {
        let (lo, hi) = self.domain();
        if !(lo..=hi).contains(&x) {
            return None;
        }

        // index of the first sample strictly right of x, clamped to the last segment
        let upper = self.xs.partition_point(|&p| p <= x).clamp(1, self.xs.len() - 1);
        let (x0, x1) = (self.xs[upper - 1], self.xs[upper]);
        let (y0, y1) = (self.ys[upper - 1], self.ys[upper]);

        Some(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
    }
}

/// Positions of a uniform grid of `count` points over [start, end], inclusive
fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    if count == 1 {
        return vec![start];
    }
    let step = (end - start) / (count - 1) as f64;
    (0..count)
        .map(|i| if i + 1 == count { end } else { start + step * i as f64 })
        .collect()
}

/// Resample a lap onto a uniform grid of `floor(span / epsilon)` points.
///
/// Fails with [`TelemetryError::InsufficientData`] when the lap has fewer than
/// two samples or when its span is too short to hold a two-point grid.
pub fn resample(lap: &LapSeries, epsilon: f64) -> Result<ResampledSeries> {
    validate_epsilon(epsilon)?;
    let interpolant = LinearInterpolant::new(lap)?;
    let (first, last) = interpolant.domain();

    let exact_count = ((last - first) / epsilon).floor();
    if !exact_count.is_finite() || exact_count > MAX_GRID_POINTS as f64 {
        return Err(TelemetryError::InvalidConfig(format!(
            "epsilon {} over {:.3}..{:.3} needs more than {} grid points",
            epsilon, first, last, MAX_GRID_POINTS
        )));
    }

    let count = exact_count as usize;
    if count < 2 {
        return Err(TelemetryError::InsufficientData(format!(
            "lap spans {:.3}..{:.3}, too short for a grid with step {}",
            first, last, epsilon
        )));
    }

    let positions = linspace(first, last, count);
    let speeds = positions
        .iter()
        .map(|&x| {
            interpolant.evaluate(x).ok_or_else(|| {
                TelemetryError::InsufficientData(format!("grid point {} outside lap data", x))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    log::debug!(
        "Resampled {} samples onto {} grid points over {:.3}..{:.3}",
        lap.len(),
        count,
        first,
        last
    );
    ResampledSeries::new(positions, speeds)
}
