//! SimView telemetry format, version 1
//!
//! Layout (all little-endian):
//!
//! | offset | size | field                         |
//! |--------|------|-------------------------------|
//! | 0      | 4    | version (u32, always 1)       |
//! | 4      | 4    | track length (u32)            |
//! | 8      | 17*N | records                       |
//!
//! Each 17-byte record is `f32 normalized position, u8, f32 speed, f32, f32`.
//! Only the position and speed are used; the rest is kept so the offsets stay
//! readable. A trailing partial record is ignored.

use crate::types::{Result, TelemetryError};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};
use std::slice::ChunksExact;

/// Size of the payload header in bytes
pub const HEADER_SIZE: usize = 8;

/// Size of one body record in bytes
pub const RECORD_SIZE: usize = 17;

/// The only format version this reader understands
pub const SUPPORTED_VERSION: u32 = 1;

/// Payload header (8 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryHeader {
    pub version: u32,
    /// Track length; multiplies the normalized position of every record
    pub track_length: u32,
}

impl TelemetryHeader {
    /// Parse header from reader
    pub fn parse<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let version = reader.read_u32::<LittleEndian>()?;
        let track_length = reader.read_u32::<LittleEndian>()?;

        Ok(TelemetryHeader {
            version,
            track_length,
        })
    }
}

/// One body record (17 bytes)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryRecord {
    /// Fraction of the track length, expected in [0, 1)
    pub normalized_position: f32,
    pub reserved: u8,
    /// Speed in km/h
    pub speed: f32,
    pub unused_a: f32,
    pub unused_b: f32,
}

impl TelemetryRecord {
    /// Parse record from reader
    pub fn parse<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let normalized_position = reader.read_f32::<LittleEndian>()?;
        let reserved = reader.read_u8()?;
        let speed = reader.read_f32::<LittleEndian>()?;
        let unused_a = reader.read_f32::<LittleEndian>()?;
        let unused_b = reader.read_f32::<LittleEndian>()?;

        Ok(TelemetryRecord {
            normalized_position,
            reserved,
            speed,
            unused_a,
            unused_b,
        })
    }

    /// Absolute track position for a given track length
    pub fn position(&self, track_length: u32) -> f64 {
        self.normalized_position as f64 * track_length as f64
    }
}

/// Reads the header of a v1 payload and returns it with a record iterator.
///
/// Fails if the payload is shorter than the header or if the version is not 1.
pub fn read_payload(raw: &[u8]) -> Result<(TelemetryHeader, RecordIterator<'_>)> {
    if raw.len() < HEADER_SIZE {
        return Err(TelemetryError::InvalidData(format!(
            "payload is {} bytes, shorter than the {}-byte header",
            raw.len(),
            HEADER_SIZE
        )));
    }

    let header = TelemetryHeader::parse(&mut Cursor::new(&raw[..HEADER_SIZE]))
        .map_err(|e| TelemetryError::InvalidData(format!("Failed to read header: {}", e)))?;

    if header.version != SUPPORTED_VERSION {
        return Err(TelemetryError::UnsupportedVersion(header.version));
    }

    let body = &raw[HEADER_SIZE..];
    let remainder = body.len() % RECORD_SIZE;
    if remainder != 0 {
        log::debug!("Ignoring {} trailing bytes of a partial record", remainder);
    }

    Ok((header, RecordIterator::new(body)))
}

/// Iterator over the complete records of a payload body
pub struct RecordIterator<'a> {
    chunks: ChunksExact<'a, u8>,
}

impl<'a> RecordIterator<'a> {
    /// Iterate over `body`, which must start right after the header
    pub fn new(body: &'a [u8]) -> Self {
        Self {
            chunks: body.chunks_exact(RECORD_SIZE),
        }
    }
}

impl Iterator for RecordIterator<'_> {
    type Item = Result<TelemetryRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk = self.chunks.next()?;
        Some(TelemetryRecord::parse(&mut Cursor::new(chunk)).map_err(|e| {
            TelemetryError::InvalidData(format!("Failed to read record: {}", e))
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}
