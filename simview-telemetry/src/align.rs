//! Lap start alignment
//!
//! Laps rarely start recording at the same track position. The lap that starts
//! earlier is trimmed until its first grid point reaches the other lap's start,
//! so that index `i` of both series refers to (roughly) the same position.
//!
//! Trimming by index is only meaningful when both grids share the same step.
//! That is checked up front and reported as [`TelemetryError::Alignment`].

use crate::config::validate_epsilon;
use crate::types::{AlignedPair, ResampledSeries, Result, TelemetryError};

/// Align two resampled laps so they start within `epsilon` of each other.
///
/// A pair that is already aligned is returned unchanged. Otherwise only the
/// series that starts earlier is trimmed; the other one is left as is.
pub fn align(
    first: &ResampledSeries,
    second: &ResampledSeries,
    epsilon: f64,
) -> Result<AlignedPair> {
    validate_epsilon(epsilon)?;

    let (start1, start2) = match (first.first_position(), second.first_position()) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            return Err(TelemetryError::Alignment(
                "cannot align an empty series".to_string(),
            ))
        }
    };

    let step_gap = (first.step() - second.step()).abs();
    if step_gap >= epsilon {
        return Err(TelemetryError::Alignment(format!(
            "grid steps differ by {:.6} ({} vs {}), more than epsilon {}",
            step_gap,
            first.step(),
            second.step(),
            epsilon
        )));
    }

    if (start1 - start2).abs() < epsilon {
        log::debug!("Laps already aligned ({:.3} vs {:.3})", start1, start2);
        return Ok(AlignedPair {
            first: first.clone(),
            second: second.clone(),
        });
    }

    if start1 < start2 {
        let skip = start_index(first, start2)?;
        log::debug!("Trimming {} leading points from lap 1", skip);
        Ok(AlignedPair {
            first: first.skip(skip),
            second: second.clone(),
        })
    } else {
        let skip = start_index(second, start1)?;
        log::debug!("Trimming {} leading points from lap 2", skip);
        Ok(AlignedPair {
            first: first.clone(),
            second: second.skip(skip),
        })
    }
}

/// Index of the first grid point (from index 1) that is not below `target`
fn start_index(series: &ResampledSeries, target: f64) -> Result<usize> {
    series
        .positions()
        .iter()
        .skip(1)
        .position(|&p| p >= target)
        .map(|offset| offset + 1)
        .ok_or_else(|| {
            TelemetryError::Alignment(format!(
                "lap ends at {:.3} before the other lap starts at {:.3}",
                series.positions()[series.len() - 1],
                target
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(start: f64, step: f64, count: usize) -> ResampledSeries {
        let positions: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
        let speeds = positions.iter().map(|p| 100.0 + p).collect();
        ResampledSeries::new(positions, speeds).unwrap()
    }

    #[test]
    fn test_truncates_earlier_first_lap() {
        let a = grid(0.0, 0.1, 200);
        let b = grid(5.0, 0.1, 200);

        let aligned = align(&a, &b, 0.1).unwrap();
        assert_eq!(aligned.second, b);

        let start = aligned.first.positions()[0];
        assert!(start >= 5.0);
        assert!(start - 5.0 < 0.1);
        assert_eq!(aligned.first.len(), aligned.first.speeds().len());
        assert!((aligned.first.speeds()[0] - (100.0 + start)).abs() < 1e-9);
        assert!(aligned.first.len() < a.len());
    }

    #[test]
    fn test_truncates_earlier_second_lap() {
        let a = grid(3.0, 0.5, 40);
        let b = grid(1.0, 0.5, 40);

        let aligned = align(&a, &b, 0.1).unwrap();
        assert_eq!(aligned.first, a);
        assert_eq!(aligned.second.positions()[0], 3.0);
        assert_eq!(aligned.second.len(), 36);
    }

    #[test]
    fn test_already_aligned_is_unchanged() {
        let a = grid(0.0, 0.1, 100);
        let b = grid(0.05, 0.1, 80);

        let aligned = align(&a, &b, 0.1).unwrap();
        assert_eq!(aligned.first, a);
        assert_eq!(aligned.second, b);

        // aligning again is a no-op
        let again = align(&aligned.first, &aligned.second, 0.1).unwrap();
        assert_eq!(again, aligned);
    }

    #[test]
    fn test_disjoint_laps_fail() {
        let a = grid(0.0, 0.1, 10);
        let b = grid(50.0, 0.1, 10);

        assert!(matches!(align(&a, &b, 0.1), Err(TelemetryError::Alignment(_))));
        assert!(matches!(align(&b, &a, 0.1), Err(TelemetryError::Alignment(_))));
    }

    #[test]
    fn test_step_mismatch_fails() {
        let a = grid(0.0, 0.1, 100);
        let b = grid(2.0, 0.5, 100);

        assert!(matches!(align(&a, &b, 0.1), Err(TelemetryError::Alignment(_))));
    }

    #[test]
    fn test_empty_series_fails() {
        let empty = ResampledSeries::new(Vec::new(), Vec::new()).unwrap();
        let a = grid(0.0, 0.1, 10);

        assert!(matches!(align(&empty, &a, 0.1), Err(TelemetryError::Alignment(_))));
    }
}
