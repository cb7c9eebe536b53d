//! SimView Telemetry Library
//!
//! A stateless library for comparing two laps recorded by the SimView racing
//! analysis site.
//!
//! # Architecture
//!
//! The comparison is a short linear pipeline:
//! - Resolve the comparison-page URL into a base URL and two lap ids
//! - Fetch both binary telemetry payloads
//! - Decode each payload into position/speed samples
//! - Resample both laps onto a uniform position grid
//! - Align the lap starts
//! - Integrate elapsed time along each lap and take the difference
//!
//! The library does NOT:
//! - Parse command-line arguments
//! - Render charts
//!
//! Both are in the application layer (simview-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use simview_telemetry::{AnalysisConfig, HttpTelemetrySource, LapAnalyzer};
//!
//! let source = HttpTelemetrySource::new().unwrap();
//! let analyzer = LapAnalyzer::new(AnalysisConfig::new().with_epsilon(0.1)).unwrap();
//!
//! let comparison = analyzer
//!     .compare_url(&source, "https://simview.example/analysis/compare/lap1/12/lap2/34")
//!     .unwrap();
//!
//! for (position, delta) in comparison.time_delta().points() {
//!     println!("{:.1} m: {:+.3} s", position, delta);
//! }
//! ```

// Public modules
pub mod align;
pub mod analysis;
pub mod config;
pub mod decoder;
pub mod fetch;
pub mod formats;
pub mod lap_time;
pub mod resample;
pub mod types;
pub mod url;

// Re-export main types for convenience
pub use align::align;
pub use analysis::{compare_laps, LapAnalyzer, LapComparison};
pub use config::{AnalysisConfig, DEFAULT_EPSILON};
pub use decoder::decode_lap;
pub use fetch::{fetch_laps, HttpTelemetrySource, TelemetrySource};
pub use lap_time::lap_time;
pub use resample::{resample, LinearInterpolant};
pub use types::{
    AlignedPair, LapSeries, LapSummary, LapTimeSeries, ResampledSeries, Result,
    TelemetryError, TelemetrySample, TimeDelta,
};
pub use url::{resolve_comparison_url, ComparisonUrl};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: default analyzer is usable
        let analyzer = LapAnalyzer::new(AnalysisConfig::default()).unwrap();
        assert_eq!(analyzer.config().epsilon, DEFAULT_EPSILON);
    }
}
