//! Telemetry retrieval
//!
//! Downloads go through the [`TelemetrySource`] trait so that the pipeline can
//! be driven from memory in tests.

use crate::types::{Result, TelemetryError};
use crate::url::ComparisonUrl;
use std::time::Duration;

/// Default request timeout for telemetry downloads
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Anything that can return the raw telemetry payload behind a URL.
pub trait TelemetrySource: Send + Sync {
    /// Fetch the response body for `url`.
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Telemetry source backed by a blocking reqwest client
pub struct HttpTelemetrySource {
    client: reqwest::blocking::Client,
}

impl HttpTelemetrySource {
    /// Creates a new source with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a new source with a custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| {
                TelemetryError::Network(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

impl TelemetrySource for HttpTelemetrySource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| TelemetryError::Network(format!("Request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(TelemetryError::Network(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let body = response
            .bytes()
            .map_err(|e| TelemetryError::Network(format!("Failed to read response: {}", e)))?;
        log::debug!("Received {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}

/// Fetch the telemetry of both laps of a comparison, lap 1 first.
///
/// The two downloads are independent and run concurrently; both must succeed.
pub fn fetch_laps(source: &dyn TelemetrySource, comparison: &ComparisonUrl) -> Result<[Vec<u8>; 2]> {
    let [url1, url2] = comparison.telemetry_urls();
    log::info!("Fetching telemetry for laps {} and {}", comparison.lap1, comparison.lap2);

    let (lap1, lap2) = rayon::join(|| source.fetch(&url1), || source.fetch(&url2));
    Ok([lap1?, lap2?])
}
