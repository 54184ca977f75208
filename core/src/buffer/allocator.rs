//! buffer/allocator.rs
//! Chunk allocator with live accounting and an optional memory budget.
//!
//! Summary: every chunk handed out carries a handle to the shared ledger and
//! gives its bytes back on drop, so `live_chunks()` is an exact leak check and
//! the budget caps how much compressed output may be in flight.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::buffer::chunk::Chunk;
use crate::buffer::types::AllocationError;

#[derive(Debug, Default)]
pub(crate) struct Ledger {
    budget: Option<usize>,
    live_chunks: AtomicUsize,
    live_bytes: AtomicUsize,
    peak_bytes: AtomicUsize,
    allocations: AtomicU64,
    rejections: AtomicU64,
}

impl Ledger {
    fn reserve(&self, capacity: usize) -> Result<(), AllocationError> {
        let mut live = self.live_bytes.load(Ordering::Acquire);
        let next = loop {
            let next = live
                .checked_add(capacity)
                .ok_or(AllocationError::OutOfMemory { capacity })?;
            if let Some(budget) = self.budget {
                if next > budget {
                    self.rejections.fetch_add(1, Ordering::Relaxed);
                    return Err(AllocationError::BudgetExceeded { requested: capacity, live, budget });
                }
            }
            match self.live_bytes.compare_exchange_weak(live, next, Ordering::AcqRel, Ordering::Acquire) {
                Ok(_) => break next,
                Err(actual) => live = actual,
            }
        };
        self.live_chunks.fetch_add(1, Ordering::AcqRel);
        self.peak_bytes.fetch_max(next, Ordering::AcqRel);
        self.allocations.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    pub(crate) fn release(&self, capacity: usize) {
        self.live_bytes.fetch_sub(capacity, Ordering::AcqRel);
        self.live_chunks.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Cloneable handle; clones share one ledger (and one budget).
#[derive(Debug, Clone, Default)]
pub struct ChunkAllocator {
    ledger: Arc<Ledger>,
}

/// Point-in-time view of an allocator's ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatorStats {
    pub budget: Option<usize>,
    pub live_chunks: usize,
    pub live_bytes: usize,
    pub peak_bytes: usize,
    pub allocations: u64,
    pub rejections: u64,
}

impl ChunkAllocator {
    /// Unbounded allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocator refusing to keep more than `budget` bytes of chunks alive.
    pub fn with_budget(budget: usize) -> Self {
        Self {
            ledger: Arc::new(Ledger { budget: Some(budget), ..Ledger::default() }),
        }
    }

    pub fn allocate(&self, capacity: usize) -> Result<Chunk, AllocationError> {
        if capacity == 0 {
            return Err(AllocationError::ZeroCapacity);
        }
        self.ledger.reserve(capacity)?;
        Chunk::with_ledger(capacity, Some(Arc::clone(&self.ledger))).map_err(|e| {
            // The chunk never existed, so its Drop will not give the bytes back.
            self.ledger.release(capacity);
            e
        })
    }

    pub fn budget(&self) -> Option<usize> {
        self.ledger.budget
    }

    pub fn live_chunks(&self) -> usize {
        self.ledger.live_chunks.load(Ordering::Acquire)
    }

    pub fn live_bytes(&self) -> usize {
        self.ledger.live_bytes.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> AllocatorStats {
        AllocatorStats {
            budget: self.ledger.budget,
            live_chunks: self.live_chunks(),
            live_bytes: self.live_bytes(),
            peak_bytes: self.ledger.peak_bytes.load(Ordering::Acquire),
            allocations: self.ledger.allocations.load(Ordering::Relaxed),
            rejections: self.ledger.rejections.load(Ordering::Relaxed),
        }
    }
}
