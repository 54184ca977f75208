/// Stable engine IDs (u16) for configuration and on-disk metadata.
pub mod engine_ids {
    pub const STREAM_DEFLATE: u16 = 0x0001;
    pub const FRAME_LZ4: u16      = 0x0002;
    pub const BITSHUFFLE_LZ4: u16 = 0x0003;
    pub const RAW_DEFLATE: u16    = 0x0004;
}

/// Default compression levels.
pub const DEFAULT_LEVEL_STREAM_DEFLATE: u32 = 8;
pub const DEFAULT_LEVEL_RAW_DEFLATE: u32 = 6;
pub const MAX_DEFLATE_LEVEL: u32 = 9;

/// gzip member framing (RFC 1952).
pub mod gzip {
    pub const MAGIC: [u8; 2] = [0x1f, 0x8b];
    pub const METHOD_DEFLATE: u8 = 0x08;
    pub const OS_UNKNOWN: u8 = 0xff;
    pub const XFL_MAX_COMPRESSION: u8 = 0x02;
    pub const XFL_FASTEST: u8 = 0x04;
    pub const HEADER_LEN: usize = 10;
    pub const TRAILER_LEN: usize = 8;
}

/// LZ4 frame layout worst cases.
pub mod lz4_frame {
    /// magic(4) + FLG(1) + BD(1) + content size(8) + dict id(4) + HC(1)
    pub const MAX_HEADER_LEN: usize = 19;
    pub const BLOCK_PREFIX_LEN: usize = 4;
    pub const CHECKSUM_LEN: usize = 4;
    pub const END_MARK_LEN: usize = 4;
}

/// Bitshuffle prefix: u64 BE original size + u32 BE block size.
pub const BITSHUFFLE_PREFIX_LEN: usize = 12;
/// Per-block compressed length prefix in blocked bitshuffle payloads.
pub const BITSHUFFLE_BLOCK_PREFIX_LEN: usize = 4;
/// Block sizes (in elements) must be a multiple of this.
pub const BITSHUFFLE_BLOCK_MULTIPLE: u32 = 8;
