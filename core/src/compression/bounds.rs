//! compression/bounds.rs
//! Worst-case output sizes for the one-shot engines.
//!
//! Each bound must hold for any input so that the one-shot engines can size
//! their single chunk up front and never grow.

use lz4_flex::block::get_maximum_output_size;

use crate::compression::constants::{lz4_frame, BITSHUFFLE_BLOCK_PREFIX_LEN, BITSHUFFLE_PREFIX_LEN};

/// Upper bound of a zlib-wrapped deflate stream for `len` input bytes.
///
/// Max of zlib's `compressBound` and miniz's stored-block worst case.
pub fn deflate_bound(len: usize) -> usize {
    let zlib = len + (len >> 12) + (len >> 14) + (len >> 25) + 13;
    let stored = 128 + len + (len / (31 * 1024) + 1) * 5;
    let ratio = 128 + len + len / 10;
    zlib.max(stored).max(ratio)
}

/// Upper bound of one LZ4 frame carrying `len` content bytes.
pub fn lz4_frame_bound(len: usize, block_size: usize, block_checksums: bool, content_checksum: bool) -> usize {
    let blocks = len.div_ceil(block_size);
    let block_payload = get_maximum_output_size(block_size.min(len));
    let block_checksum = if block_checksums { lz4_frame::CHECKSUM_LEN } else { 0 };
    let footer = lz4_frame::END_MARK_LEN + if content_checksum { lz4_frame::CHECKSUM_LEN } else { 0 };

    lz4_frame::MAX_HEADER_LEN
        + blocks * (lz4_frame::BLOCK_PREFIX_LEN + block_payload + block_checksum)
        + footer
}

/// Upper bound of the LZ4 payload following the bitshuffle prefix.
/// `block_bytes == None` means one block spanning the whole input.
pub fn bitshuffle_payload_bound(len: usize, block_bytes: Option<usize>) -> usize {
    match block_bytes {
        None => get_maximum_output_size(len),
        Some(block) => {
            let blocks = len.div_ceil(block);
            blocks * (BITSHUFFLE_BLOCK_PREFIX_LEN + get_maximum_output_size(block.min(len)))
        }
    }
}

/// Chunk capacity for a bitshuffle frame: the raw size, or more when the
/// prefix plus worst-case payload would not fit in it.
pub fn bitshuffle_chunk_capacity(len: usize, block_bytes: Option<usize>) -> usize {
    len.max(BITSHUFFLE_PREFIX_LEN + bitshuffle_payload_bound(len, block_bytes))
}
