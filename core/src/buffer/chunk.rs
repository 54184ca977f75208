//! buffer/chunk.rs
//! Fixed-capacity, page-aligned output block.
//!
//! Design notes:
//! - One `std::alloc` call with a 4096-aligned `Layout` replaces the
//!   platform-specific aligned allocators (posix_memalign / _aligned_malloc).
//! - Memory is zero-initialised so the free tail can be handed out as `&mut [u8]`.
//! - `used <= capacity` is enforced by every mutator; the block is released
//!   exactly once, in `Drop`.

use std::alloc::{self, Layout};
use std::fmt;
use std::ptr::NonNull;
use std::sync::Arc;

use tracing::trace;

use crate::buffer::allocator::Ledger;
use crate::buffer::types::AllocationError;
use crate::constants::CHUNK_ALIGNMENT;

pub struct Chunk {
    ptr: NonNull<u8>,
    layout: Layout,
    used: usize,
    ledger: Option<Arc<Ledger>>,
}

// SAFETY: a Chunk is the unique owner of its block; no aliasing pointer
// escapes except through borrows tied to `&self` / `&mut self`.
unsafe impl Send for Chunk {}
unsafe impl Sync for Chunk {}

impl Chunk {
    /// Allocate an untracked chunk of `capacity` bytes.
    pub fn allocate(capacity: usize) -> Result<Self, AllocationError> {
        Self::with_ledger(capacity, None)
    }

    pub(crate) fn with_ledger(
        capacity: usize,
        ledger: Option<Arc<Ledger>>,
    ) -> Result<Self, AllocationError> {
        if capacity == 0 {
            return Err(AllocationError::ZeroCapacity);
        }
        let layout = Layout::from_size_align(capacity, CHUNK_ALIGNMENT)
            .map_err(|_| AllocationError::Layout { capacity, align: CHUNK_ALIGNMENT })?;

        // SAFETY: layout has a non-zero size (checked above).
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(raw).ok_or(AllocationError::OutOfMemory { capacity })?;

        trace!(capacity, "chunk allocated");
        Ok(Self { ptr, layout, used: 0, ledger })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.layout.size()
    }

    #[inline]
    pub fn used(&self) -> usize {
        self.used
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.used
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.used == self.capacity()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Start of the block; always a multiple of `CHUNK_ALIGNMENT`.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    /// Bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: the first `used` bytes are inside the allocation and initialised.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.used) }
    }

    /// Free tail of the block, starting at the current write offset.
    pub fn spare_mut(&mut self) -> &mut [u8] {
        // SAFETY: [used, capacity) lies inside the allocation, is initialised
        // (zeroed at allocation) and is exclusively borrowed through `&mut self`.
        unsafe {
            std::slice::from_raw_parts_mut(self.ptr.as_ptr().add(self.used), self.remaining())
        }
    }

    /// Mark `n` more bytes of the free tail as written.
    ///
    /// # Panics
    /// If `n` exceeds `remaining()`.
    pub fn commit(&mut self, n: usize) {
        assert!(
            n <= self.remaining(),
            "chunk overflow: commit {} with {} remaining",
            n,
            self.remaining()
        );
        self.used += n;
    }

    /// Copy as much of `data` as fits; returns the number of bytes taken.
    pub fn fill_from(&mut self, data: &[u8]) -> usize {
        let n = data.len().min(self.remaining());
        self.spare_mut()[..n].copy_from_slice(&data[..n]);
        self.used += n;
        n
    }
}

impl Drop for Chunk {
    fn drop(&mut self) {
        // SAFETY: `ptr` was returned by `alloc_zeroed` with exactly this layout
        // and is released only here.
        unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) };
        if let Some(ledger) = self.ledger.take() {
            ledger.release(self.layout.size());
        }
        trace!(capacity = self.layout.size(), used = self.used, "chunk released");
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("capacity", &self.capacity())
            .field("used", &self.used)
            .finish()
    }
}

impl AsRef<[u8]> for Chunk {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}
