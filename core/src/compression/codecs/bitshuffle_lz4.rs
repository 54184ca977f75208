//! codecs/bitshuffle_lz4.rs
//! Byte-shuffled LZ4 blocks behind a 12-byte prefix (Image-scope, no header).
//!
//! Layout:
//!
//! ```text
//! [ original size   u64 BE ]
//! [ block size      u32 BE ]  elements per block, 0 = single block
//! [ payload              ]
//! ```
//!
//! With block size 0 the payload is one LZ4 block of the whole shuffled
//! buffer. Otherwise each block of `block size` elements is shuffled on its
//! own and stored as `[ compressed len u32 BE ][ LZ4 block ]`.

use byteorder::{BigEndian, ByteOrder};
use tracing::trace;

use crate::buffer::{ChunkAllocator, ChunkList, PendingChunks};
use crate::compression::bounds::bitshuffle_chunk_capacity;
use crate::compression::constants::{BITSHUFFLE_BLOCK_MULTIPLE, BITSHUFFLE_BLOCK_PREFIX_LEN, BITSHUFFLE_PREFIX_LEN};
use crate::compression::shuffle::shuffle_into;
use crate::compression::types::{CodecStep, CompressionError, EngineKind, FrameCompressor};
use crate::config::ConfigurationError;
use crate::frame::Frame;
use crate::types::EngineError;

const KIND: EngineKind = EngineKind::BitshuffleLz4;

pub struct BitshuffleLz4 {
    allocator: ChunkAllocator,
    block_elements: u32,
    scratch: Vec<u8>,
    output_cap: Option<usize>,
}

impl BitshuffleLz4 {
    pub fn new(allocator: ChunkAllocator, block_elements: u32) -> Result<Self, ConfigurationError> {
        if block_elements % BITSHUFFLE_BLOCK_MULTIPLE != 0 {
            return Err(ConfigurationError::InvalidBlockSize { elements: block_elements });
        }
        Ok(Self { allocator, block_elements, scratch: Vec::new(), output_cap: None })
    }

    /// Shrink the output chunk below its worst-case capacity.
    #[cfg(test)]
    pub(crate) fn with_output_cap(mut self, cap: usize) -> Self {
        self.output_cap = Some(cap);
        self
    }

    pub fn block_elements(&self) -> u32 {
        self.block_elements
    }
}

/// Shuffle `src` and LZ4-compress it into `out`; returns the compressed length.
fn compress_block(src: &[u8], depth: usize, scratch: &mut Vec<u8>, out: &mut [u8]) -> Result<usize, CompressionError> {
    shuffle_into(src, depth, scratch);
    lz4_flex::block::compress_into(scratch, out)
        .map_err(|e| CompressionError::process_failed(KIND, CodecStep::Update, e))
}

impl FrameCompressor for BitshuffleLz4 {
    fn kind(&self) -> EngineKind {
        KIND
    }

    fn allocator(&self) -> &ChunkAllocator {
        &self.allocator
    }

    fn process(&mut self, frame: &Frame<'_>) -> Result<ChunkList, EngineError> {
        frame.validate(KIND)?;
        let data = frame.data();
        let depth = frame.sample_depth();
        let block_bytes = match self.block_elements {
            0 => None,
            elements => Some(elements as usize * depth),
        };
        let capacity = bitshuffle_chunk_capacity(data.len(), block_bytes);
        let capacity = self.output_cap.map_or(capacity, |cap| cap.min(capacity));

        let mut pending = PendingChunks::new(frame.frame_number());
        let tail = pending.append(self.allocator.allocate(capacity)?);
        let chunk = &mut pending[tail];
        let out = chunk.spare_mut();
        if out.len() < BITSHUFFLE_PREFIX_LEN {
            return Err(CompressionError::BoundExceeded { codec: KIND, bound: capacity }.into());
        }

        BigEndian::write_u64(&mut out[0..8], data.len() as u64);
        BigEndian::write_u32(&mut out[8..BITSHUFFLE_PREFIX_LEN], self.block_elements);

        let mut offset = BITSHUFFLE_PREFIX_LEN;
        match block_bytes {
            None => {
                offset += compress_block(data, depth, &mut self.scratch, &mut out[offset..])?;
            }
            Some(block) => {
                for src in data.chunks(block) {
                    let (prefix, body) = out[offset..]
                        .split_at_mut_checked(BITSHUFFLE_BLOCK_PREFIX_LEN)
                        .ok_or(CompressionError::BoundExceeded { codec: KIND, bound: capacity })?;
                    let n = compress_block(src, depth, &mut self.scratch, body)?;
                    let len = u32::try_from(n)
                        .map_err(|_| CompressionError::BoundExceeded { codec: KIND, bound: capacity })?;
                    BigEndian::write_u32(prefix, len);
                    offset += BITSHUFFLE_BLOCK_PREFIX_LEN + n;
                }
            }
        }
        chunk.commit(offset);

        trace!(
            frame_number = frame.frame_number(),
            elements = frame.element_count(),
            depth,
            payload = offset - BITSHUFFLE_PREFIX_LEN,
            "bitshuffle frame complete"
        );
        Ok(pending.commit())
    }
}
