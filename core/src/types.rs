use thiserror::Error;

use crate::buffer::AllocationError;
use crate::compression::types::{CompressionError, EngineKind};
use crate::config::ConfigurationError;

/// Unified engine error covering allocation, codec and configuration failures.
/// - `From<T>` impls let `?` cross the buffer / codec / config layers.
/// - Whatever the variant, no chunk of the failed frame is still alive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("allocation error: {0}")]
    Allocation(#[from] AllocationError),

    #[error("compression error: {0}")]
    Compression(#[from] CompressionError),

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl EngineError {
    /// Codec that failed, when the failure came from a backend.
    pub fn codec(&self) -> Option<EngineKind> {
        match self {
            EngineError::Compression(e) => Some(e.codec()),
            _ => None,
        }
    }

    pub fn is_allocation(&self) -> bool {
        matches!(self, EngineError::Allocation(_))
    }
}
