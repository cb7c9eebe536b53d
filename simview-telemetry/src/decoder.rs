//! Lap telemetry decoding
//!
//! Turns a raw v1 payload into a [`LapSeries`]. A record is kept only when its
//! absolute position is strictly greater than the last kept record, which drops
//! encoder noise and backtracking and leaves a series that can be interpolated.

use crate::formats::read_payload;
use crate::types::{LapSeries, Result, TelemetryError, TelemetrySample};

/// Decode one lap from a raw telemetry payload.
///
/// The previous-position sentinel starts at 0, so a first record sitting
/// exactly at position 0 is dropped along with any non-increasing record.
///
/// # Example
/// ```
/// use simview_telemetry::decode_lap;
///
/// let mut raw = Vec::new();
/// raw.extend_from_slice(&1u32.to_le_bytes());
/// raw.extend_from_slice(&1000u32.to_le_bytes());
/// for (position, speed) in [(0.25f32, 120.0f32), (0.5, 130.0)] {
///     raw.extend_from_slice(&position.to_le_bytes());
///     raw.push(0);
///     raw.extend_from_slice(&speed.to_le_bytes());
///     raw.extend_from_slice(&[0u8; 8]);
/// }
///
/// let lap = decode_lap(&raw).unwrap();
/// assert_eq!(lap.len(), 2);
/// assert_eq!(lap.first_position(), Some(250.0));
/// ```
pub fn decode_lap(raw: &[u8]) -> Result<LapSeries> {
    let (header, records) = read_payload(raw)?;
    log::debug!(
        "Decoding telemetry v{} (track length {}, {} records)",
        header.version,
        header.track_length,
        records.size_hint().0
    );

    let mut samples = Vec::with_capacity(records.size_hint().0);
    let mut prev_position = 0.0;
    let mut dropped = 0usize;

    for record in records {
        let record = record?;
        let position = record.position(header.track_length);
        let speed = record.speed as f64;
        if !position.is_finite() || !speed.is_finite() {
            return Err(TelemetryError::InvalidData(format!(
                "non-finite record (position {}, speed {}) after {} samples",
                position,
                speed,
                samples.len()
            )));
        }

        if position > prev_position {
            samples.push(TelemetrySample::new(position, speed));
            prev_position = position;
        } else {
            log::trace!(
                "Dropping non-increasing record at {:.3} (last kept {:.3})",
                position,
                prev_position
            );
            dropped += 1;
        }
    }

    log::debug!("Decoded {} samples, dropped {}", samples.len(), dropped);
    Ok(LapSeries::from_samples(samples))
}
