//! codecs/stream_deflate.rs
//! gzip-compatible deflate stream (File-scope).
//!
//! Design notes:
//! - One raw deflate context (window 15, default strategy) lives for the whole
//!   session; the engine writes the RFC 1952 member header and CRC-32/ISIZE
//!   trailer around it.
//! - Output size is unknown up front, so output grows chunk by chunk through a
//!   `ChunkArena`: only a completely full tail triggers a new allocation.
//! - Each frame is one complete gzip member. The context is reset at the start
//!   of every frame, so frames appended to one file form a valid multi-member
//!   gzip stream.

use flate2::{Compress, Compression, FlushCompress, Status};
use tracing::trace;

use crate::buffer::{ChunkAllocator, ChunkArena, ChunkList};
use crate::compression::constants::{gzip, MAX_DEFLATE_LEVEL};
use crate::compression::types::{CodecStep, CompressionError, EngineKind, FrameCompressor};
use crate::config::ConfigurationError;
use crate::frame::Frame;
use crate::header::FileScope;
use crate::types::EngineError;

const KIND: EngineKind = EngineKind::StreamDeflate;

/// Persistent backend state: deflate context plus the running member checksum.
struct GzipContext {
    deflate: Compress,
    crc: crc32fast::Hasher,
    level: u32,
}

impl GzipContext {
    fn new(level: u32) -> Self {
        Self {
            deflate: Compress::new(Compression::new(level), false),
            crc: crc32fast::Hasher::new(),
            level,
        }
    }

    fn reset(&mut self) {
        self.deflate.reset();
        self.crc = crc32fast::Hasher::new();
    }

    fn member_header(&self) -> [u8; gzip::HEADER_LEN] {
        let xfl = match self.level {
            9 => gzip::XFL_MAX_COMPRESSION,
            0 | 1 => gzip::XFL_FASTEST,
            _ => 0,
        };
        [
            gzip::MAGIC[0],
            gzip::MAGIC[1],
            gzip::METHOD_DEFLATE,
            0, // FLG: no name, comment or extra field
            0, 0, 0, 0, // MTIME unset
            xfl,
            gzip::OS_UNKNOWN,
        ]
    }

    fn member_trailer(&mut self) -> [u8; gzip::TRAILER_LEN] {
        let crc = std::mem::take(&mut self.crc).finalize();
        // ISIZE is the input length modulo 2^32.
        let isize = self.deflate.total_in() as u32;
        let mut trailer = [0u8; gzip::TRAILER_LEN];
        trailer[..4].copy_from_slice(&crc.to_le_bytes());
        trailer[4..].copy_from_slice(&isize.to_le_bytes());
        trailer
    }

    /// Feed `input` with no flush, growing the arena whenever the tail fills.
    fn update(&mut self, mut input: &[u8], out: &mut ChunkArena<'_>) -> Result<(), EngineError> {
        self.crc.update(input);
        while !input.is_empty() {
            let (before_in, before_out) = (self.deflate.total_in(), self.deflate.total_out());
            let spare = out.tail_spare()?;
            let status = self
                .deflate
                .compress(input, spare, FlushCompress::None)
                .map_err(|e| CompressionError::process_failed(KIND, CodecStep::Update, e))?;
            let consumed = (self.deflate.total_in() - before_in) as usize;
            let produced = (self.deflate.total_out() - before_out) as usize;
            out.commit(produced);
            input = &input[consumed..];

            match status {
                Status::Ok | Status::BufError if consumed > 0 || produced > 0 => {}
                Status::Ok | Status::BufError => {
                    return Err(CompressionError::NoProgress { codec: KIND, step: CodecStep::Update }.into())
                }
                Status::StreamEnd => {
                    return Err(CompressionError::process_failed(KIND, CodecStep::Update, "premature stream end").into())
                }
            }
        }
        Ok(())
    }

    /// Drive the finish step until the backend reports stream end.
    fn finish(&mut self, out: &mut ChunkArena<'_>) -> Result<(), EngineError> {
        loop {
            let before_out = self.deflate.total_out();
            let spare = out.tail_spare()?;
            let status = self
                .deflate
                .compress(&[], spare, FlushCompress::Finish)
                .map_err(|e| CompressionError::process_failed(KIND, CodecStep::Finish, e))?;
            let produced = (self.deflate.total_out() - before_out) as usize;
            out.commit(produced);

            match status {
                Status::StreamEnd => return Ok(()),
                Status::Ok | Status::BufError if produced > 0 => {}
                Status::Ok | Status::BufError => {
                    return Err(CompressionError::NoProgress { codec: KIND, step: CodecStep::Finish }.into())
                }
            }
        }
    }
}

pub struct StreamDeflate {
    allocator: ChunkAllocator,
    chunk_size: usize,
    file: FileScope,
    context: GzipContext,
    header_buf: Vec<u8>,
}

impl StreamDeflate {
    pub fn new(
        allocator: ChunkAllocator,
        level: u32,
        chunk_size: usize,
        file: FileScope,
    ) -> Result<Self, ConfigurationError> {
        if level > MAX_DEFLATE_LEVEL {
            return Err(ConfigurationError::LevelOutOfRange { kind: KIND, level });
        }
        if chunk_size == 0 {
            return Err(ConfigurationError::InvalidChunkSize { size: chunk_size });
        }
        Ok(Self { allocator, chunk_size, file, context: GzipContext::new(level), header_buf: Vec::new() })
    }

    pub fn level(&self) -> u32 {
        self.context.level
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl FrameCompressor for StreamDeflate {
    fn kind(&self) -> EngineKind {
        KIND
    }

    fn allocator(&self) -> &ChunkAllocator {
        &self.allocator
    }

    fn process(&mut self, frame: &Frame<'_>) -> Result<ChunkList, EngineError> {
        frame.validate(KIND)?;
        self.file.render(frame, &mut self.header_buf);
        self.context.reset();

        let mut out = ChunkArena::new(&self.allocator, self.chunk_size, frame.frame_number());
        out.write_all(&self.context.member_header())?;
        self.context.update(&self.header_buf, &mut out)?;
        self.context.update(frame.data(), &mut out)?;
        self.context.finish(&mut out)?;
        out.write_all(&self.context.member_trailer())?;

        trace!(
            frame_number = frame.frame_number(),
            header_bytes = self.header_buf.len(),
            chunks = out.chunk_count(),
            "gzip member complete"
        );
        Ok(out.finish())
    }
}
