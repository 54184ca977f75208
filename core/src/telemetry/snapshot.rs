//! telemetry/snapshot.rs
//! Immutable view of a save stream's counters and timings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};
use crate::utils::ratio;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub frames_compressed: u64,
    pub frames_failed: u64,
    pub bytes_raw: u64,
    pub bytes_compressed: u64,
    pub bytes_capacity: u64,
    pub chunks_delivered: u64,
    /// compressed / raw; may exceed 1.0 for incompressible frames plus framing.
    pub compression_ratio: f64,
    /// compressed / allocated chunk capacity.
    pub chunk_utilisation: f64,
    pub throughput_raw_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer) -> Self {
        let elapsed = timer.elapsed();
        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_raw as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            frames_compressed: counters.frames_compressed,
            frames_failed: counters.frames_failed,
            bytes_raw: counters.bytes_raw,
            bytes_compressed: counters.bytes_compressed,
            bytes_capacity: counters.bytes_capacity,
            chunks_delivered: counters.chunks_delivered,
            compression_ratio: ratio(counters.bytes_compressed, counters.bytes_raw),
            chunk_utilisation: ratio(counters.bytes_compressed, counters.bytes_capacity),
            throughput_raw_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    pub fn has_all_stages(&self, expected: &[Stage]) -> bool {
        self.stage_times.has_all(expected)
    }

    pub fn sanity_check(&self) -> bool {
        self.bytes_capacity >= self.bytes_compressed
            && self.chunk_utilisation <= 1.0
            && self.total_stage_time() <= self.elapsed
    }
}
