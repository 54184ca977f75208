//! compression/codecs/mod.rs
//! One module per wire format.

pub mod bitshuffle_lz4;
pub mod frame_lz4;
pub mod raw_deflate;
pub mod stream_deflate;

pub use bitshuffle_lz4::*;
pub use frame_lz4::*;
pub use raw_deflate::*;
pub use stream_deflate::*;
