//! buffer/pending.rs
//! Per-frame rollback guard.
//!
//! Chunks produced for a frame live in a `PendingChunks` until the engine
//! calls `commit()`. Every other exit path (error via `?`, early return,
//! panic unwind) runs `Drop`, which disposes the whole list exactly once.

use std::ops::{Index, IndexMut};

use tracing::trace;

use crate::buffer::chunk::Chunk;
use crate::buffer::chunk_list::ChunkList;

#[derive(Debug)]
pub struct PendingChunks {
    frame_number: i64,
    list: ChunkList,
    committed: bool,
}

impl PendingChunks {
    pub fn new(frame_number: i64) -> Self {
        Self { frame_number, list: ChunkList::new(), committed: false }
    }

    pub fn append(&mut self, chunk: Chunk) -> usize {
        self.list.append(chunk)
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn total_used_bytes(&self) -> usize {
        self.list.total_used_bytes()
    }

    /// Hand the finished list over; the guard no longer owns anything.
    pub fn commit(mut self) -> ChunkList {
        self.committed = true;
        std::mem::take(&mut self.list)
    }
}

impl Index<usize> for PendingChunks {
    type Output = Chunk;

    fn index(&self, index: usize) -> &Chunk {
        &self.list[index]
    }
}

impl IndexMut<usize> for PendingChunks {
    fn index_mut(&mut self, index: usize) -> &mut Chunk {
        &mut self.list[index]
    }
}

impl Drop for PendingChunks {
    fn drop(&mut self) {
        if !self.committed && !self.list.is_empty() {
            trace!(
                frame_number = self.frame_number,
                chunks = self.list.len(),
                bytes = self.list.total_capacity(),
                "rolling back frame output"
            );
            self.list.dispose_all();
        }
    }
}
