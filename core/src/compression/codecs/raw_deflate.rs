//! codecs/raw_deflate.rs
//! One-shot deflate at a fixed level (Image-scope).
//!
//! Stateless: a fresh backend context per call, sized output from
//! `deflate_bound`, a single `Finish` call. The output is the zlib-wrapped
//! stream a `compress2`-style one-shot call emits.

use flate2::{Compress, Compression, FlushCompress, Status};

use crate::buffer::{ChunkAllocator, ChunkList, PendingChunks};
use crate::compression::bounds::deflate_bound;
use crate::compression::constants::MAX_DEFLATE_LEVEL;
use crate::compression::types::{CodecStep, CompressionError, EngineKind, FrameCompressor};
use crate::config::ConfigurationError;
use crate::frame::Frame;
use crate::types::EngineError;

const KIND: EngineKind = EngineKind::RawDeflate;

pub struct RawDeflate {
    allocator: ChunkAllocator,
    level: u32,
    output_cap: Option<usize>,
}

impl RawDeflate {
    pub fn new(allocator: ChunkAllocator, level: u32) -> Result<Self, ConfigurationError> {
        if level > MAX_DEFLATE_LEVEL {
            return Err(ConfigurationError::LevelOutOfRange { kind: KIND, level });
        }
        Ok(Self { allocator, level, output_cap: None })
    }

    /// Shrink the output chunk below `deflate_bound`.
    #[cfg(test)]
    pub(crate) fn with_output_cap(mut self, cap: usize) -> Self {
        self.output_cap = Some(cap);
        self
    }

    pub fn level(&self) -> u32 {
        self.level
    }
}

impl FrameCompressor for RawDeflate {
    fn kind(&self) -> EngineKind {
        KIND
    }

    fn allocator(&self) -> &ChunkAllocator {
        &self.allocator
    }

    fn process(&mut self, frame: &Frame<'_>) -> Result<ChunkList, EngineError> {
        frame.validate(KIND)?;
        let bound = deflate_bound(frame.byte_size());
        let bound = self.output_cap.map_or(bound, |cap| cap.min(bound));

        let mut pending = PendingChunks::new(frame.frame_number());
        let tail = pending.append(self.allocator.allocate(bound)?);
        let chunk = &mut pending[tail];

        let mut deflate = Compress::new(Compression::new(self.level), true);
        let status = deflate
            .compress(frame.data(), chunk.spare_mut(), FlushCompress::Finish)
            .map_err(|e| CompressionError::process_failed(KIND, CodecStep::Finish, e))?;
        if status != Status::StreamEnd {
            return Err(CompressionError::BoundExceeded { codec: KIND, bound }.into());
        }
        chunk.commit(deflate.total_out() as usize);

        Ok(pending.commit())
    }
}
