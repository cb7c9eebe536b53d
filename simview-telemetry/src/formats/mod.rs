//! Telemetry payload formats
//!
//! SimView serves lap telemetry as a small binary blob. Only version 1 of the
//! format exists; its reader lives in [`v1`].

pub mod v1;

pub use v1::{
    read_payload, RecordIterator, TelemetryHeader, TelemetryRecord, HEADER_SIZE, RECORD_SIZE,
};
