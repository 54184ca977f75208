//! telemetry/counters.rs
//! Mutable counters collected while a save stream runs.
//!
//! Summary: frame and byte counts per engine; converted into an immutable
//! `TelemetrySnapshot` on demand.
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

use crate::buffer::ChunkList;

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub frames_compressed: u64,
    pub frames_failed: u64,
    pub bytes_raw: u64,
    pub bytes_compressed: u64,
    pub bytes_capacity: u64,
    pub chunks_delivered: u64,
}

impl TelemetryCounters {
    /// Record one frame delivered to the sink.
    ///
    /// - `raw_len`: pixel bytes handed to the engine
    /// - `chunks`: the delivered output
    pub fn add_frame(&mut self, raw_len: usize, chunks: &ChunkList) {
        self.frames_compressed += 1;
        self.bytes_raw += raw_len as u64;
        self.bytes_compressed += chunks.total_used_bytes() as u64;
        self.bytes_capacity += chunks.total_capacity() as u64;
        self.chunks_delivered += chunks.len() as u64;
    }

    /// Record one frame whose output was rolled back.
    pub fn add_failure(&mut self) {
        self.frames_failed += 1;
    }

    pub fn frames_total(&self) -> u64 {
        self.frames_compressed + self.frames_failed
    }

    // Per-engine counters are merged once at the end, so workers never share them.
    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.frames_compressed += other.frames_compressed;
        self.frames_failed += other.frames_failed;
        self.bytes_raw += other.bytes_raw;
        self.bytes_compressed += other.bytes_compressed;
        self.bytes_capacity += other.bytes_capacity;
        self.chunks_delivered += other.chunks_delivered;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
