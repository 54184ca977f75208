//! buffer/arena.rs
//! Bump allocation across fixed-size chunks for output of unknown length.
//!
//! The pending list is the arena, addressed by index; `tail` points at the
//! chunk currently being filled. A new chunk is only allocated once the tail
//! is completely full, so every chunk but the last is full and earlier chunks
//! are never moved or copied.

use crate::buffer::allocator::ChunkAllocator;
use crate::buffer::chunk_list::ChunkList;
use crate::buffer::pending::PendingChunks;
use crate::buffer::types::AllocationError;

pub struct ChunkArena<'a> {
    allocator: &'a ChunkAllocator,
    chunk_size: usize,
    pending: PendingChunks,
    tail: Option<usize>,
}

impl<'a> ChunkArena<'a> {
    pub fn new(allocator: &'a ChunkAllocator, chunk_size: usize, frame_number: i64) -> Self {
        Self { allocator, chunk_size, pending: PendingChunks::new(frame_number), tail: None }
    }

    fn grow(&mut self) -> Result<usize, AllocationError> {
        let chunk = self.allocator.allocate(self.chunk_size)?;
        let tail = self.pending.append(chunk);
        self.tail = Some(tail);
        Ok(tail)
    }

    /// Free space of the tail chunk; grows the arena when the tail is full.
    /// Never returns an empty slice.
    pub fn tail_spare(&mut self) -> Result<&mut [u8], AllocationError> {
        let tail = match self.tail {
            Some(i) if !self.pending[i].is_full() => i,
            _ => self.grow()?,
        };
        Ok(self.pending[tail].spare_mut())
    }

    /// Mark `n` bytes of the last `tail_spare()` slice as written.
    pub fn commit(&mut self, n: usize) {
        match self.tail {
            Some(i) => self.pending[i].commit(n),
            None => assert_eq!(n, 0, "commit on an empty arena"),
        }
    }

    /// Copy raw bytes, spilling into new chunks as needed.
    pub fn write_all(&mut self, mut data: &[u8]) -> Result<(), AllocationError> {
        while !data.is_empty() {
            let spare = self.tail_spare()?;
            let n = spare.len().min(data.len());
            spare[..n].copy_from_slice(&data[..n]);
            self.commit(n);
            data = &data[n..];
        }
        Ok(())
    }

    pub fn chunk_count(&self) -> usize {
        self.pending.len()
    }

    pub fn total_used_bytes(&self) -> usize {
        self.pending.total_used_bytes()
    }

    pub fn finish(self) -> ChunkList {
        self.pending.commit()
    }
}
