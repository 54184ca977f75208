//! codecs/frame_lz4.rs
//! LZ4 frame format (File-scope).
//!
//! Design notes:
//! - Header bytes and pixel bytes form one LZ4 frame whose content-size field
//!   is their combined length.
//! - The output is sized once from `lz4_frame_bound`, so exactly one chunk is
//!   allocated and the encoder writes straight into it.
//! - Only frame preferences and header scratch persist across frames; the
//!   encoder is created per call. Each `process` call emits a complete frame, so
//!   frames appended to one file stay a valid concatenated LZ4 stream.

use std::io::Write;

use lz4_flex::frame::{BlockMode, FrameEncoder, FrameInfo};

use crate::buffer::{ChunkAllocator, ChunkList, ChunkWriter, PendingChunks};
use crate::compression::bounds::lz4_frame_bound;
use crate::compression::types::{CodecStep, CompressionError, EngineKind, FrameCompressor};
use crate::config::Lz4BlockSize;
use crate::frame::Frame;
use crate::header::FileScope;
use crate::types::EngineError;

const KIND: EngineKind = EngineKind::FrameLz4;

/// Session state kept between frames: frame preferences, the header scratch
/// buffer and a frame counter. The encoder itself is rebuilt per frame.
#[derive(Debug)]
struct Lz4FrameContext {
    block_size: Lz4BlockSize,
    content_checksum: bool,
    header_buf: Vec<u8>,
    frames_encoded: u64,
}

impl Lz4FrameContext {
    fn frame_info(&self, content_len: usize) -> FrameInfo {
        FrameInfo::new()
            .block_size(self.block_size.into())
            .block_mode(BlockMode::Independent)
            .block_checksums(false)
            .content_checksum(self.content_checksum)
            .content_size(Some(content_len as u64))
    }

    fn bound(&self, content_len: usize) -> usize {
        lz4_frame_bound(content_len, self.block_size.bytes(), false, self.content_checksum)
    }
}

pub struct FrameLz4 {
    allocator: ChunkAllocator,
    file: FileScope,
    context: Lz4FrameContext,
    output_cap: Option<usize>,
}

impl FrameLz4 {
    pub fn new(allocator: ChunkAllocator, block_size: Lz4BlockSize, content_checksum: bool, file: FileScope) -> Self {
        Self {
            allocator,
            file,
            context: Lz4FrameContext { block_size, content_checksum, header_buf: Vec::new(), frames_encoded: 0 },
            output_cap: None,
        }
    }

    /// Shrink the output chunk below the bound so the encoder runs out of room.
    #[cfg(test)]
    pub(crate) fn with_output_cap(mut self, cap: usize) -> Self {
        self.output_cap = Some(cap);
        self
    }

    pub fn frames_encoded(&self) -> u64 {
        self.context.frames_encoded
    }
}

impl FrameCompressor for FrameLz4 {
    fn kind(&self) -> EngineKind {
        KIND
    }

    fn allocator(&self) -> &ChunkAllocator {
        &self.allocator
    }

    fn process(&mut self, frame: &Frame<'_>) -> Result<ChunkList, EngineError> {
        frame.validate(KIND)?;
        let ctx = &mut self.context;
        self.file.render(frame, &mut ctx.header_buf);

        let content_len = ctx.header_buf.len() + frame.byte_size();
        let bound = ctx.bound(content_len);
        let bound = self.output_cap.map_or(bound, |cap| cap.min(bound));

        let mut pending = PendingChunks::new(frame.frame_number());
        let tail = pending.append(self.allocator.allocate(bound)?);

        let mut encoder = FrameEncoder::with_frame_info(ctx.frame_info(content_len), ChunkWriter::new(&mut pending[tail]));
        for input in [ctx.header_buf.as_slice(), frame.data()] {
            encoder
                .write_all(input)
                .map_err(|e| CompressionError::process_failed(KIND, CodecStep::Update, e))?;
        }
        encoder
            .finish()
            .map_err(|e| CompressionError::process_failed(KIND, CodecStep::Finish, e))?;

        ctx.frames_encoded += 1;
        Ok(pending.commit())
    }
}
