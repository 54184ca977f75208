//! save_stream.rs
//! Drives one engine over a sequence of frames and feeds a sink.
//!
//! Design notes:
//! - Delivery happens only after `process` returned a non-empty list; on any
//!   error the frame's chunks are already gone and the sink is untouched.
//! - Counters and stage times are kept per stream; merge snapshots across
//!   streams running on different threads.

use tracing::debug;

use crate::buffer::ChunkAllocator;
use crate::compression::registry::{create_engine, create_engine_with_header};
use crate::compression::types::{CompressionError, EngineKind};
use crate::compression::CompressionEngine;
use crate::config::EngineConfig;
use crate::frame::Frame;
use crate::header::HeaderWriter;
use crate::sink::Sink;
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::EngineError;

pub struct SaveStream<S: Sink> {
    engine: CompressionEngine,
    sink: S,
    counters: TelemetryCounters,
    timer: TelemetryTimer,
}

impl<S: Sink> SaveStream<S> {
    pub fn new(engine: CompressionEngine, sink: S) -> Self {
        Self { engine, sink, counters: TelemetryCounters::default(), timer: TelemetryTimer::new() }
    }

    pub fn from_config(config: &EngineConfig, sink: S) -> Result<Self, EngineError> {
        Ok(Self::new(create_engine(config)?, sink))
    }

    pub fn from_config_with_header(
        config: &EngineConfig,
        header: Box<dyn HeaderWriter>,
        sink: S,
    ) -> Result<Self, EngineError> {
        Ok(Self::new(create_engine_with_header(config, header)?, sink))
    }

    pub fn kind(&self) -> EngineKind {
        self.engine.kind()
    }

    pub fn allocator(&self) -> &ChunkAllocator {
        self.engine.allocator()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Compress `frame` and deliver it. Returns the compressed length.
    pub fn submit(&mut self, frame: &Frame<'_>) -> Result<usize, EngineError> {
        let engine = &mut self.engine;
        let result = self.timer.time(Stage::Compress, || engine.process(frame));

        let chunks = match result {
            Ok(chunks) if chunks.is_empty() => {
                self.counters.add_failure();
                let codec = self.engine.kind();
                return Err(CompressionError::EmptyOutput { codec, frame_number: frame.frame_number() }.into());
            }
            Ok(chunks) => chunks,
            Err(e) => {
                self.counters.add_failure();
                debug!(frame_number = frame.frame_number(), "frame dropped, nothing delivered");
                return Err(e);
            }
        };

        let compressed = chunks.total_used_bytes();
        self.counters.add_frame(frame.byte_size(), &chunks);

        let sink = &mut self.sink;
        let frame_number = frame.frame_number();
        self.timer.time(Stage::Deliver, || sink.deliver(frame_number, chunks));

        debug!(frame_number, compressed, "frame delivered");
        Ok(compressed)
    }

    pub fn counters(&self) -> &TelemetryCounters {
        &self.counters
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::from(&self.counters, &self.timer)
    }

    /// Stop the clock and hand back the sink with the final snapshot.
    pub fn finish(mut self) -> (S, TelemetrySnapshot) {
        self.timer.finish();
        let snapshot = self.snapshot();
        (self.sink, snapshot)
    }

    pub fn into_parts(self) -> (CompressionEngine, S) {
        (self.engine, self.sink)
    }
}
