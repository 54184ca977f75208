//! buffer/types.rs
//! Allocation error taxonomy.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("cannot allocate a zero-capacity chunk")]
    ZeroCapacity,

    #[error("invalid chunk layout: {capacity} bytes aligned to {align}")]
    Layout { capacity: usize, align: usize },

    #[error("out of memory allocating {capacity} bytes")]
    OutOfMemory { capacity: usize },

    #[error("memory budget exceeded: {requested} bytes requested, {live} live, budget {budget}")]
    BudgetExceeded { requested: usize, live: usize, budget: usize },
}
