//! config.rs
//! Engine configuration: serde-loadable settings plus validation.
//!
//! Every field has a default, so a partial JSON document such as
//! `{"kind": "raw_deflate", "level": 3}` is a complete configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::buffer::ChunkAllocator;
use crate::compression::constants::{
    BITSHUFFLE_BLOCK_MULTIPLE, DEFAULT_LEVEL_RAW_DEFLATE, DEFAULT_LEVEL_STREAM_DEFLATE, MAX_DEFLATE_LEVEL,
};
use crate::compression::types::EngineKind;
use crate::constants::{CHUNK_ALIGNMENT, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE, MIN_CHUNK_SIZE};
use crate::frame::HeaderMap;
use crate::utils::enum_name_or_hex;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("unknown engine id {}", engine_label(.raw))]
    UnknownEngine { raw: u16 },

    #[error("level {level} out of range 0..={max} for engine {kind}", max = MAX_DEFLATE_LEVEL)]
    LevelOutOfRange { kind: EngineKind, level: u32 },

    #[error("engine {kind} does not take a compression level")]
    LevelNotSupported { kind: EngineKind },

    #[error("chunk size {size} must be a multiple of {align} within {min}..={max}",
        align = CHUNK_ALIGNMENT, min = MIN_CHUNK_SIZE, max = MAX_CHUNK_SIZE)]
    InvalidChunkSize { size: usize },

    #[error("bitshuffle block size {elements} is not a multiple of {multiple}", multiple = BITSHUFFLE_BLOCK_MULTIPLE)]
    InvalidBlockSize { elements: u32 },

    #[error("memory budget {budget} is smaller than one {chunk_size} byte chunk")]
    BudgetTooSmall { budget: usize, chunk_size: usize },

    #[error("malformed configuration: {0}")]
    Parse(String),
}

fn engine_label(raw: &u16) -> String {
    enum_name_or_hex::<EngineKind>(*raw)
}

impl From<serde_json::Error> for ConfigurationError {
    fn from(e: serde_json::Error) -> Self {
        ConfigurationError::Parse(e.to_string())
    }
}

/// LZ4 frame block size.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lz4BlockSize {
    #[default]
    Max64Kb,
    Max256Kb,
    Max1Mb,
    Max4Mb,
}

impl Lz4BlockSize {
    pub fn bytes(self) -> usize {
        match self {
            Lz4BlockSize::Max64Kb => 64 * 1024,
            Lz4BlockSize::Max256Kb => 256 * 1024,
            Lz4BlockSize::Max1Mb => 1024 * 1024,
            Lz4BlockSize::Max4Mb => 4 * 1024 * 1024,
        }
    }
}

impl From<Lz4BlockSize> for lz4_flex::frame::BlockSize {
    fn from(size: Lz4BlockSize) -> Self {
        match size {
            Lz4BlockSize::Max64Kb => lz4_flex::frame::BlockSize::Max64KB,
            Lz4BlockSize::Max256Kb => lz4_flex::frame::BlockSize::Max256KB,
            Lz4BlockSize::Max1Mb => lz4_flex::frame::BlockSize::Max1MB,
            Lz4BlockSize::Max4Mb => lz4_flex::frame::BlockSize::Max4MB,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub kind: EngineKind,
    /// `None` picks the engine default (8 for gzip, 6 for one-shot deflate).
    pub level: Option<u32>,
    pub frames_per_file: u32,
    pub header: HeaderMap,
    pub chunk_size: usize,
    pub lz4_block_size: Lz4BlockSize,
    pub lz4_content_checksum: bool,
    /// Elements per bitshuffle block; 0 keeps the whole frame in one block.
    pub bitshuffle_block_size: u32,
    pub memory_budget: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind: EngineKind::StreamDeflate,
            level: None,
            frames_per_file: 1,
            header: HeaderMap::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            lz4_block_size: Lz4BlockSize::default(),
            lz4_content_checksum: true,
            bitshuffle_block_size: 0,
            memory_budget: None,
        }
    }
}

impl EngineConfig {
    pub fn new(kind: EngineKind) -> Self {
        Self { kind, ..Self::default() }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_frames_per_file(mut self, frames_per_file: u32) -> Self {
        self.frames_per_file = frames_per_file;
        self
    }

    pub fn with_header_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.header.insert(key, value);
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_lz4_block_size(mut self, block_size: Lz4BlockSize) -> Self {
        self.lz4_block_size = block_size;
        self
    }

    pub fn with_lz4_content_checksum(mut self, enabled: bool) -> Self {
        self.lz4_content_checksum = enabled;
        self
    }

    pub fn with_bitshuffle_block_size(mut self, elements: u32) -> Self {
        self.bitshuffle_block_size = elements;
        self
    }

    pub fn with_memory_budget(mut self, budget: usize) -> Self {
        self.memory_budget = Some(budget);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigurationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Level the engine will run at; 0 for engines without one.
    pub fn effective_level(&self) -> u32 {
        match (self.kind, self.level) {
            (EngineKind::StreamDeflate | EngineKind::RawDeflate, Some(level)) => level,
            (EngineKind::StreamDeflate, None) => DEFAULT_LEVEL_STREAM_DEFLATE,
            (EngineKind::RawDeflate, None) => DEFAULT_LEVEL_RAW_DEFLATE,
            _ => 0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match self.level {
            Some(_) if !self.kind.takes_level() => {
                return Err(ConfigurationError::LevelNotSupported { kind: self.kind })
            }
            Some(level) if level > MAX_DEFLATE_LEVEL => {
                return Err(ConfigurationError::LevelOutOfRange { kind: self.kind, level })
            }
            _ => {}
        }

        let size = self.chunk_size;
        if !(MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&size) || size % CHUNK_ALIGNMENT != 0 {
            return Err(ConfigurationError::InvalidChunkSize { size });
        }

        if self.bitshuffle_block_size % BITSHUFFLE_BLOCK_MULTIPLE != 0 {
            return Err(ConfigurationError::InvalidBlockSize { elements: self.bitshuffle_block_size });
        }

        if let Some(budget) = self.memory_budget {
            if self.kind == EngineKind::StreamDeflate && budget < self.chunk_size {
                return Err(ConfigurationError::BudgetTooSmall { budget, chunk_size: self.chunk_size });
            }
        }
        Ok(())
    }

    /// Allocator honouring `memory_budget`.
    pub fn allocator(&self) -> ChunkAllocator {
        match self.memory_budget {
            Some(budget) => ChunkAllocator::with_budget(budget),
            None => ChunkAllocator::new(),
        }
    }
}
