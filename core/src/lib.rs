//! framezip-core
//!
//! Frame compression for image acquisition: aligned output chunks, four
//! compression engines (gzip stream, LZ4 frame, bitshuffle LZ4, one-shot
//! deflate) and all-or-nothing delivery to a sink.

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;

pub mod buffer;
pub mod config;
pub mod frame;
pub mod header;

pub mod compression;
pub mod telemetry;

// Delivery layer
pub mod save_stream;
pub mod sink;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::buffer::{AllocationError, Chunk, ChunkAllocator, ChunkList};
    pub use crate::compression::{create_engine, create_engine_with_header, CompressionEngine, CompressionError, EngineKind, FrameCompressor};
    pub use crate::config::{ConfigurationError, EngineConfig, Lz4BlockSize};
    pub use crate::frame::{Frame, HeaderMap};
    pub use crate::header::{HeaderWriter, KeyValueHeaderWriter};
    pub use crate::save_stream::SaveStream;
    pub use crate::sink::{Delivery, MemorySink, Sink};
    pub use crate::types::EngineError;
}
