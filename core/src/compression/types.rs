//! compression/types.rs
//! Engine identifiers, codec errors and the per-engine compression seam.
use std::fmt;
use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

use crate::buffer::{ChunkAllocator, ChunkList};
use crate::compression::constants::engine_ids;
use crate::config::ConfigurationError;
use crate::frame::Frame;
use crate::types::EngineError;

/// FFI-safe enum for compression engine identifiers.
#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    StreamDeflate = engine_ids::STREAM_DEFLATE,
    FrameLz4      = engine_ids::FRAME_LZ4,
    BitshuffleLz4 = engine_ids::BITSHUFFLE_LZ4,
    RawDeflate    = engine_ids::RAW_DEFLATE,
}

/// Whether an engine prepends a header and targets multi-frame files.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineScope {
    File,
    Image,
}

impl EngineKind {
    pub fn verify(raw: u16) -> Result<Self, ConfigurationError> {
        Self::try_from_primitive(raw).map_err(|_| ConfigurationError::UnknownEngine { raw })
    }

    pub fn id(self) -> u16 {
        self as u16
    }

    pub fn name(self) -> &'static str {
        match self {
            EngineKind::StreamDeflate => "gzip",
            EngineKind::FrameLz4      => "lz4",
            EngineKind::BitshuffleLz4 => "bslz4",
            EngineKind::RawDeflate    => "deflate",
        }
    }

    pub fn scope(self) -> EngineScope {
        match self {
            EngineKind::StreamDeflate | EngineKind::FrameLz4 => EngineScope::File,
            EngineKind::BitshuffleLz4 | EngineKind::RawDeflate => EngineScope::Image,
        }
    }

    /// Deflate-family engines take a 0..=9 level.
    pub fn takes_level(self) -> bool {
        matches!(self, EngineKind::StreamDeflate | EngineKind::RawDeflate)
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Backend call that reported the failure.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CodecStep {
    Update,
    Finish,
}

impl fmt::Display for CodecStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CodecStep::Update => "update",
            CodecStep::Finish => "finish",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressionError {
    CodecProcessFailed { codec: EngineKind, step: CodecStep, msg: String },
    NoProgress { codec: EngineKind, step: CodecStep },
    BoundExceeded { codec: EngineKind, bound: usize },
    InvalidFrame { codec: EngineKind, msg: String },
    EmptyOutput { codec: EngineKind, frame_number: i64 },
}

impl CompressionError {
    pub(crate) fn process_failed(codec: EngineKind, step: CodecStep, err: impl fmt::Display) -> Self {
        CompressionError::CodecProcessFailed { codec, step, msg: err.to_string() }
    }

    pub fn codec(&self) -> EngineKind {
        use CompressionError::*;
        match self {
            CodecProcessFailed { codec, .. }
            | NoProgress { codec, .. }
            | BoundExceeded { codec, .. }
            | InvalidFrame { codec, .. }
            | EmptyOutput { codec, .. } => *codec,
        }
    }
}

impl fmt::Display for CompressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CompressionError::*;
        match self {
            CodecProcessFailed { codec, step, msg } =>
                write!(f, "codec {} {} failed: {}", codec, step, msg),
            NoProgress { codec, step } =>
                write!(f, "codec {} {} made no progress", codec, step),
            BoundExceeded { codec, bound } =>
                write!(f, "codec {} output exceeded its {} byte bound", codec, bound),
            InvalidFrame { codec, msg } =>
                write!(f, "codec {} rejected frame: {}", codec, msg),
            EmptyOutput { codec, frame_number } =>
                write!(f, "codec {} produced no output for frame {}", codec, frame_number),
        }
    }
}

impl std::error::Error for CompressionError {}

/// One compression engine: turns a frame into a finished chunk list.
///
/// `process` is all-or-nothing: on error every chunk allocated for the frame
/// has already been released when the error reaches the caller.
pub trait FrameCompressor: Send {
    fn kind(&self) -> EngineKind;

    fn allocator(&self) -> &ChunkAllocator;

    fn process(&mut self, frame: &Frame<'_>) -> Result<ChunkList, EngineError>;
}
