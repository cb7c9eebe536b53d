//! Main comparison API
//!
//! [`LapAnalyzer`] is the entry point of the library. It runs the whole
//! pipeline for two laps: decode, resample, align, integrate, and finally the
//! time difference between them.

use crate::align::align;
use crate::config::AnalysisConfig;
use crate::decoder::decode_lap;
use crate::fetch::{fetch_laps, TelemetrySource};
use crate::lap_time::lap_time;
use crate::resample::resample;
use crate::types::{LapSummary, LapTimeSeries, ResampledSeries, Result, TimeDelta};
use crate::url::resolve_comparison_url;

/// Result of comparing two laps
#[derive(Debug, Clone, PartialEq)]
pub struct LapComparison {
    /// Both laps on their own uniform grid, before alignment
    resampled: [ResampledSeries; 2],
    /// Elapsed time along each aligned grid
    lap_times: [LapTimeSeries; 2],
    time_delta: TimeDelta,
    common_len: usize,
}

impl LapComparison {
    pub fn resampled(&self) -> &[ResampledSeries; 2] {
        &self.resampled
    }

    pub fn lap_times(&self) -> &[LapTimeSeries; 2] {
        &self.lap_times
    }

    pub fn time_delta(&self) -> &TimeDelta {
        &self.time_delta
    }

    /// Number of grid points both aligned laps have in common
    pub fn common_len(&self) -> usize {
        self.common_len
    }

    /// Speed traces for plotting, each cut to the common length
    pub fn velocity_traces(&self) -> [ResampledSeries; 2] {
        [
            self.resampled[0].truncated(self.common_len),
            self.resampled[1].truncated(self.common_len),
        ]
    }

    /// Lap time and speed range of each lap
    pub fn summaries(&self) -> [LapSummary; 2] {
        [self.summary(0), self.summary(1)]
    }

    /// Figures are taken over the aligned grid the lap time was integrated on
    fn summary(&self, lap: usize) -> LapSummary {
        let times = &self.lap_times[lap];
        let series = &self.resampled[lap];
        // alignment only trims from the front
        let trimmed = series.len().saturating_sub(times.len());
        let speeds = &series.speeds()[trimmed..];
        let positions = &times.positions;

        LapSummary {
            lap_time: times.total(),
            min_speed: speeds.iter().copied().fold(f64::INFINITY, f64::min),
            max_speed: speeds.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            span: (
                positions.first().copied().unwrap_or(0.0),
                positions.last().copied().unwrap_or(0.0),
            ),
        }
    }
}

/// Runs lap comparisons with a fixed configuration
#[derive(Debug, Clone)]
pub struct LapAnalyzer {
    config: AnalysisConfig,
}

impl LapAnalyzer {
    /// Create an analyzer; fails if the configuration is unusable.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Compare two raw telemetry payloads (lap 1, lap 2).
    ///
    /// # Example
    /// ```no_run
    /// use simview_telemetry::{AnalysisConfig, LapAnalyzer};
    ///
    /// let lap1 = std::fs::read("lap1.bin").unwrap();
    /// let lap2 = std::fs::read("lap2.bin").unwrap();
    ///
    /// let analyzer = LapAnalyzer::new(AnalysisConfig::new()).unwrap();
    /// let comparison = analyzer.compare(&lap1, &lap2).unwrap();
    /// println!("final delta: {:?}", comparison.time_delta().final_delta());
    /// ```
    pub fn compare(&self, lap1: &[u8], lap2: &[u8]) -> Result<LapComparison> {
        let epsilon = self.config.epsilon;

        let decoded = [decode_lap(lap1)?, decode_lap(lap2)?];
        log::debug!(
            "Decoded laps: {} and {} samples",
            decoded[0].len(),
            decoded[1].len()
        );

        let resampled = [resample(&decoded[0], epsilon)?, resample(&decoded[1], epsilon)?];

        let aligned = align(&resampled[0], &resampled[1], epsilon)?;
        log::debug!(
            "Aligned laps: {} and {} grid points",
            aligned.first.len(),
            aligned.second.len()
        );

        let lap_times = [lap_time(&aligned.first)?, lap_time(&aligned.second)?];
        let common_len = lap_times[0].len().min(lap_times[1].len());

        let time_delta = TimeDelta {
            positions: lap_times[0].positions[..common_len].to_vec(),
            deltas: lap_times[0].times[..common_len]
                .iter()
                .zip(&lap_times[1].times[..common_len])
                .map(|(t1, t2)| t1 - t2)
                .collect(),
        };

        log::info!(
            "Compared laps over {} grid points (lap times {:.3}s / {:.3}s)",
            common_len,
            lap_times[0].total(),
            lap_times[1].total()
        );

        Ok(LapComparison {
            resampled,
            lap_times,
            time_delta,
            common_len,
        })
    }

    /// Resolve a comparison-page URL, fetch both laps, and compare them.
    pub fn compare_url(&self, source: &dyn TelemetrySource, url: &str) -> Result<LapComparison> {
        let comparison = resolve_comparison_url(url)?;
        let [lap1, lap2] = fetch_laps(source, &comparison)?;
        self.compare(&lap1, &lap2)
    }
}

/// Compare two raw telemetry payloads with the given configuration.
pub fn compare_laps(raw: [&[u8]; 2], config: &AnalysisConfig) -> Result<LapComparison> {
    LapAnalyzer::new(*config)?.compare(raw[0], raw[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TelemetryError;

    fn payload(track_length: u32, records: &[(f32, f32)]) -> Vec<u8> {
        let mut raw = Vec::new();
        raw.extend_from_slice(&1u32.to_le_bytes());
        raw.extend_from_slice(&track_length.to_le_bytes());
        for (position, speed) in records {
            raw.extend_from_slice(&position.to_le_bytes());
            raw.push(0);
            raw.extend_from_slice(&speed.to_le_bytes());
            raw.extend_from_slice(&[0u8; 8]);
        }
        raw
    }

    #[test]
    fn test_analyzer_rejects_bad_config() {
        let result = LapAnalyzer::new(AnalysisConfig::new().with_epsilon(-1.0));
        assert!(matches!(result, Err(TelemetryError::InvalidConfig(_))));
    }

    #[test]
    fn test_identical_laps_have_zero_delta() {
        let raw = payload(1000, &[(0.1, 100.0), (0.5, 120.0), (0.9, 150.0)]);
        let comparison = compare_laps([&raw, &raw], &AnalysisConfig::new().with_epsilon(1.0)).unwrap();

        assert_eq!(comparison.common_len(), comparison.resampled()[0].len());
        assert!(comparison
            .time_delta()
            .deltas
            .iter()
            .all(|d| d.abs() < 1e-12));

        let [s1, s2] = comparison.summaries();
        assert_eq!(s1, s2);
        assert_eq!(s1.max_speed, 150.0);
        assert_eq!(s1.min_speed, 100.0);
    }

    #[test]
    fn test_slower_lap_has_positive_delta() {
        let slow = payload(1000, &[(0.1, 90.0), (0.9, 90.0)]);
        let fast = payload(1000, &[(0.1, 180.0), (0.9, 180.0)]);
        let comparison = compare_laps([&slow, &fast], &AnalysisConfig::new().with_epsilon(1.0)).unwrap();

        let delta = comparison.time_delta().final_delta().unwrap();
        // 800 m at 25 m/s vs 50 m/s
        assert!((delta - 16.0).abs() < 0.1, "delta {}", delta);
    }

    #[test]
    fn test_summary_covers_aligned_grid() {
        let early = payload(1000, &[(0.1, 60.0), (0.3, 100.0), (0.9, 140.0)]);
        let late = payload(1000, &[(0.3, 100.0), (0.9, 100.0)]);
        let comparison = compare_laps([&early, &late], &AnalysisConfig::new().with_epsilon(1.0)).unwrap();

        let [times1, _] = comparison.lap_times();
        assert!(times1.len() < comparison.resampled()[0].len());

        let [s1, _] = comparison.summaries();
        assert_eq!(s1.span.0, times1.positions[0]);
        assert_eq!(s1.span.1, *times1.positions.last().unwrap());
        assert!(s1.span.0 >= 299.0, "span {:?}", s1.span);
        // the 60 km/h start was trimmed away
        assert!(s1.min_speed > 95.0, "min speed {}", s1.min_speed);
        assert_eq!(s1.max_speed, 140.0);
    }

    #[test]
    fn test_non_finite_payload_is_an_error() {
        let good = payload(1000, &[(0.1, 100.0), (0.9, 100.0)]);
        let infinite = payload(1000, &[(0.1, 100.0), (f32::INFINITY, 100.0)]);
        let nan_speed = payload(1000, &[(0.1, f32::NAN), (0.9, 100.0)]);

        for bad in [&infinite, &nan_speed] {
            let result = compare_laps([&good, bad], &AnalysisConfig::new());
            assert!(matches!(result, Err(TelemetryError::InvalidData(_))));
        }
    }

    #[test]
    fn test_stage_errors_propagate() {
        let good = payload(1000, &[(0.1, 100.0), (0.9, 100.0)]);
        let single = payload(1000, &[(0.1, 100.0)]);

        let result = compare_laps([&good, &single], &AnalysisConfig::new());
        assert!(matches!(result, Err(TelemetryError::InsufficientData(_))));

        let stopped = payload(1000, &[(0.1, 0.0), (0.9, 0.0)]);
        let result = compare_laps([&good, &stopped], &AnalysisConfig::new().with_epsilon(1.0));
        assert!(matches!(result, Err(TelemetryError::ZeroVelocity { .. })));
    }
}
