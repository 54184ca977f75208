//! buffer/mod.rs
//! Aligned output chunks and the per-frame ownership plumbing around them.
//!
//! Ownership of a chunk moves exactly once: allocator → `PendingChunks`
//! (engine building a frame) → `ChunkList` handed to a sink on success, or
//! disposed by the guard on failure.

pub mod allocator;
pub mod arena;
pub mod chunk;
pub mod chunk_list;
pub mod pending;
pub mod types;
pub mod writer;

pub use allocator::*;
pub use arena::*;
pub use chunk::*;
pub use chunk_list::*;
pub use pending::*;
pub use types::*;
pub use writer::*;
