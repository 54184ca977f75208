//! compression/mod.rs
//! Frame compression engines.
//!
//! Notes:
//! - Four wire formats behind one closed `CompressionEngine` enum; the
//!   variant is picked once, from `EngineConfig`, through the registry.
//! - Every engine shares the rollback contract of `FrameCompressor::process`.

pub mod bounds;
pub mod codecs;
pub mod constants;
pub mod engine;
pub mod registry;
pub mod shuffle;
pub mod types;

pub use constants::*;
pub use engine::*;
pub use registry::*;
pub use types::*;
