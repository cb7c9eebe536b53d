//! Comparison-page URL resolution
//!
//! A SimView lap comparison page has the form
//! `<scheme>://<host>/analysis/compare/lap1/<id1>/lap2/<id2>`. The site base URL
//! and both lap ids are all that is needed to locate the telemetry blobs.

use crate::types::{Result, TelemetryError};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Path of the telemetry endpoint, relative to the site base URL
const TELEMETRY_PATH: &str = "/api/ac/lap/telemetry/";

/// Base URL and lap ids extracted from a comparison-page URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonUrl {
    /// Everything before `/analysis/compare`, scheme included
    pub base_url: String,
    pub lap1: u64,
    pub lap2: u64,
}

impl ComparisonUrl {
    /// Telemetry download URL for one lap id
    pub fn telemetry_url(&self, lap_id: u64) -> String {
        format!("{}{}{}", self.base_url, TELEMETRY_PATH, lap_id)
    }

    /// Telemetry URLs for lap 1 and lap 2, in that order
    pub fn telemetry_urls(&self) -> [String; 2] {
        [self.telemetry_url(self.lap1), self.telemetry_url(self.lap2)]
    }
}

impl fmt::Display for ComparisonUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (lap {} vs lap {})", self.base_url, self.lap1, self.lap2)
    }
}

fn comparison_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // ((?i:https?)://\S+) - base URL, scheme matched case-insensitively
        // ([0-9]+)            - lap ids; anything after lap2's id is ignored
        Regex::new(r"^\s*((?i:https?)://\S+)/analysis/compare/lap1/([0-9]+)/lap2/([0-9]+)")
            .expect("comparison URL pattern is valid")
    })
}

/// Parse a comparison-page URL into its base URL and lap ids.
///
/// # Example
/// ```
/// use simview_telemetry::resolve_comparison_url;
///
/// let url = resolve_comparison_url("https://simview.example/analysis/compare/lap1/12/lap2/34").unwrap();
/// assert_eq!(url.base_url, "https://simview.example");
/// assert_eq!((url.lap1, url.lap2), (12, 34));
/// ```
pub fn resolve_comparison_url(url: &str) -> Result<ComparisonUrl> {
    let captures = comparison_pattern()
        .captures(url)
        .ok_or_else(|| TelemetryError::InvalidUrl(url.trim().to_string()))?;

    let parse_id = |index: usize| -> Result<u64> {
        captures[index].parse::<u64>().map_err(|e| {
            TelemetryError::InvalidUrl(format!("lap id {:?}: {}", &captures[index], e))
        })
    };

    let resolved = ComparisonUrl {
        base_url: captures[1].to_string(),
        lap1: parse_id(2)?,
        lap2: parse_id(3)?,
    };
    log::debug!("Resolved comparison URL: {}", resolved);
    Ok(resolved)
}
