//! compression/registry.rs
//! Engine registry and factory functions.

use serde::Serialize;

use crate::compression::codecs::{BitshuffleLz4, FrameLz4, RawDeflate, StreamDeflate};
use crate::compression::constants::{DEFAULT_LEVEL_RAW_DEFLATE, DEFAULT_LEVEL_STREAM_DEFLATE};
use crate::compression::engine::CompressionEngine;
use crate::compression::types::{EngineKind, EngineScope};
use crate::config::{ConfigurationError, EngineConfig};
use crate::header::{FileScope, HeaderWriter, KeyValueHeaderWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineInfo {
    pub kind: EngineKind,
    pub name: &'static str,
    pub scope: EngineScope,
    pub default_level: Option<u32>,
}

pub fn resolve(engine_id: u16) -> Result<EngineInfo, ConfigurationError> {
    let kind = EngineKind::verify(engine_id)?;
    let default_level = match kind {
        EngineKind::StreamDeflate => Some(DEFAULT_LEVEL_STREAM_DEFLATE),
        EngineKind::RawDeflate => Some(DEFAULT_LEVEL_RAW_DEFLATE),
        EngineKind::FrameLz4 | EngineKind::BitshuffleLz4 => None,
    };
    Ok(EngineInfo { kind, name: kind.name(), scope: kind.scope(), default_level })
}

/// Build the engine described by `config` with the default header writer.
pub fn create_engine(config: &EngineConfig) -> Result<CompressionEngine, ConfigurationError> {
    create_engine_with_header(config, Box::new(KeyValueHeaderWriter))
}

/// Build the engine described by `config`. `header` is only used by
/// File-scope engines.
pub fn create_engine_with_header(
    config: &EngineConfig,
    header: Box<dyn HeaderWriter>,
) -> Result<CompressionEngine, ConfigurationError> {
    config.validate()?;
    let allocator = config.allocator();
    let level = config.effective_level();
    let file = || FileScope::new(header, config.header.clone(), config.frames_per_file);

    let engine: CompressionEngine = match config.kind {
        EngineKind::StreamDeflate => StreamDeflate::new(allocator, level, config.chunk_size, file())?.into(),
        EngineKind::FrameLz4 => {
            FrameLz4::new(allocator, config.lz4_block_size, config.lz4_content_checksum, file()).into()
        }
        EngineKind::BitshuffleLz4 => BitshuffleLz4::new(allocator, config.bitshuffle_block_size)?.into(),
        EngineKind::RawDeflate => RawDeflate::new(allocator, level)?.into(),
    };
    Ok(engine)
}
