//! Cumulative lap time along the position grid
//!
//! Time between two grid points is distance over the mean of the two endpoint
//! speeds (trapezoidal rule on 1/v). Speeds are in km/h, positions in meters.

use crate::types::{LapTimeSeries, ResampledSeries, Result, TelemetryError};

const KMH_TO_MPS: f64 = 1000.0 / 3600.0;

/// Integrate elapsed time over a resampled lap.
///
/// Fails with [`TelemetryError::ZeroVelocity`] when the average speed between
/// two consecutive grid points is not positive (or is NaN).
pub fn lap_time(series: &ResampledSeries) -> Result<LapTimeSeries> {
    let positions = series.positions();
    let speeds = series.speeds();

    let mut times = Vec::with_capacity(positions.len());
    if !positions.is_empty() {
        times.push(0.0);
    }

    let mut elapsed = 0.0;
    for i in 1..positions.len() {
        let velocity = (speeds[i - 1] + speeds[i]) * 0.5 * KMH_TO_MPS;
        // also catches NaN speeds
        if !(velocity > 0.0) {
            return Err(TelemetryError::ZeroVelocity {
                index: i - 1,
                position: positions[i - 1],
            });
        }
        elapsed += (positions[i] - positions[i - 1]) / velocity;
        times.push(elapsed);
    }

    Ok(LapTimeSeries {
        positions: positions.to_vec(),
        times,
    })
}
