//! constants.rs
//! Crate-wide sizing constants for chunk allocation.

/// Alignment of every chunk (block-I/O friendly).
pub const CHUNK_ALIGNMENT: usize = 4 * 1024;

/// Defaults when Option<T> is None
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024; // 64 KiB
/// Smallest growth chunk accepted by configuration.
pub const MIN_CHUNK_SIZE: usize = CHUNK_ALIGNMENT;
/// Max chunk size sanity bound (32 MiB).
pub const MAX_CHUNK_SIZE: usize = 32 * 1024 * 1024;
