//! compression/shuffle.rs
//! Byte transposition by element width.
//!
//! Byte `j` of element `i` moves to `dst[j * count + i]`, grouping the
//! slowly-varying high bytes of neighbouring samples together. Trailing bytes
//! that do not form a whole element are appended unchanged.

/// Shuffle `src` into `dst` (cleared and resized to `src.len()`).
pub fn shuffle_into(src: &[u8], depth: usize, dst: &mut Vec<u8>) {
    dst.clear();
    dst.resize(src.len(), 0);

    if depth <= 1 {
        dst.copy_from_slice(src);
        return;
    }

    let count = src.len() / depth;
    let body = count * depth;
    for (i, element) in src[..body].chunks_exact(depth).enumerate() {
        for (j, &byte) in element.iter().enumerate() {
            dst[j * count + i] = byte;
        }
    }
    dst[body..].copy_from_slice(&src[body..]);
}
