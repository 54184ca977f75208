//! compression/engine.rs
//! Closed set of compression engines behind one `process` call.

use tracing::{debug, warn};

use crate::buffer::{ChunkAllocator, ChunkList};
use crate::compression::codecs::{BitshuffleLz4, FrameLz4, RawDeflate, StreamDeflate};
use crate::compression::types::{EngineKind, EngineScope, FrameCompressor};
use crate::frame::Frame;
use crate::types::EngineError;

pub enum CompressionEngine {
    StreamDeflate(StreamDeflate),
    FrameLz4(FrameLz4),
    BitshuffleLz4(BitshuffleLz4),
    RawDeflate(RawDeflate),
}

impl CompressionEngine {
    fn inner(&self) -> &dyn FrameCompressor {
        match self {
            CompressionEngine::StreamDeflate(e) => e,
            CompressionEngine::FrameLz4(e) => e,
            CompressionEngine::BitshuffleLz4(e) => e,
            CompressionEngine::RawDeflate(e) => e,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn FrameCompressor {
        match self {
            CompressionEngine::StreamDeflate(e) => e,
            CompressionEngine::FrameLz4(e) => e,
            CompressionEngine::BitshuffleLz4(e) => e,
            CompressionEngine::RawDeflate(e) => e,
        }
    }

    pub fn kind(&self) -> EngineKind {
        self.inner().kind()
    }

    pub fn scope(&self) -> EngineScope {
        self.kind().scope()
    }

    pub fn allocator(&self) -> &ChunkAllocator {
        self.inner().allocator()
    }

    /// Compress one frame into a non-empty chunk list.
    ///
    /// On error no chunk allocated for `frame` is still alive.
    pub fn process(&mut self, frame: &Frame<'_>) -> Result<ChunkList, EngineError> {
        let kind = self.kind();
        match self.inner_mut().process(frame) {
            Ok(chunks) => {
                debug!(
                    engine = %kind,
                    frame_number = frame.frame_number(),
                    input_bytes = frame.byte_size(),
                    output_bytes = chunks.total_used_bytes(),
                    chunks = chunks.len(),
                    "frame compressed"
                );
                Ok(chunks)
            }
            Err(e) => {
                warn!(engine = %kind, frame_number = frame.frame_number(), error = %e, "frame compression failed");
                Err(e)
            }
        }
    }
}

impl FrameCompressor for CompressionEngine {
    fn kind(&self) -> EngineKind {
        CompressionEngine::kind(self)
    }

    fn allocator(&self) -> &ChunkAllocator {
        CompressionEngine::allocator(self)
    }

    fn process(&mut self, frame: &Frame<'_>) -> Result<ChunkList, EngineError> {
        CompressionEngine::process(self, frame)
    }
}

impl std::fmt::Debug for CompressionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompressionEngine")
            .field("kind", &self.kind())
            .field("live_chunks", &self.allocator().live_chunks())
            .finish()
    }
}

impl From<StreamDeflate> for CompressionEngine {
    fn from(e: StreamDeflate) -> Self {
        CompressionEngine::StreamDeflate(e)
    }
}

impl From<FrameLz4> for CompressionEngine {
    fn from(e: FrameLz4) -> Self {
        CompressionEngine::FrameLz4(e)
    }
}

impl From<BitshuffleLz4> for CompressionEngine {
    fn from(e: BitshuffleLz4) -> Self {
        CompressionEngine::BitshuffleLz4(e)
    }
}

impl From<RawDeflate> for CompressionEngine {
    fn from(e: RawDeflate) -> Self {
        CompressionEngine::RawDeflate(e)
    }
}
