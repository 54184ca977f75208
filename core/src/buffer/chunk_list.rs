//! buffer/chunk_list.rs
//! Ordered, owning collection of chunks holding one frame's compressed output.

use std::io::{self, Write};
use std::ops::{Index, IndexMut};

use crate::buffer::chunk::Chunk;

#[derive(Debug, Default)]
pub struct ChunkList {
    chunks: Vec<Chunk>,
}

impl ChunkList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append in write order; returns the index of the new tail.
    pub fn append(&mut self, chunk: Chunk) -> usize {
        self.chunks.push(chunk);
        self.chunks.len() - 1
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Sum of `used` over all chunks: the exact compressed length.
    pub fn total_used_bytes(&self) -> usize {
        self.chunks.iter().map(Chunk::used).sum()
    }

    pub fn total_capacity(&self) -> usize {
        self.chunks.iter().map(Chunk::capacity).sum()
    }

    /// Free every chunk and leave the list empty.
    pub fn dispose_all(&mut self) {
        self.chunks.clear();
    }

    pub fn tail(&self) -> Option<&Chunk> {
        self.chunks.last()
    }

    pub fn tail_mut(&mut self) -> Option<&mut Chunk> {
        self.chunks.last_mut()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chunk> {
        self.chunks.iter()
    }

    /// Stream the used bytes of every chunk, in order.
    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<usize> {
        for chunk in &self.chunks {
            w.write_all(chunk.as_slice())?;
        }
        Ok(self.total_used_bytes())
    }

    /// Contiguous copy of the compressed bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.total_used_bytes());
        for chunk in &self.chunks {
            out.extend_from_slice(chunk.as_slice());
        }
        out
    }
}

impl Index<usize> for ChunkList {
    type Output = Chunk;

    fn index(&self, index: usize) -> &Chunk {
        &self.chunks[index]
    }
}

impl IndexMut<usize> for ChunkList {
    fn index_mut(&mut self, index: usize) -> &mut Chunk {
        &mut self.chunks[index]
    }
}

impl IntoIterator for ChunkList {
    type Item = Chunk;
    type IntoIter = std::vec::IntoIter<Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChunkList {
    type Item = &'a Chunk;
    type IntoIter = std::slice::Iter<'a, Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.iter()
    }
}
