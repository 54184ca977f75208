//! buffer/writer.rs
//! `io::Write` adapter over a single pre-sized chunk.

use std::io::{self, Write};

use crate::buffer::chunk::Chunk;

/// Appends at the chunk's write offset; reports `WriteZero` once the chunk is
/// full instead of growing, so an undersized bound surfaces as an error.
pub struct ChunkWriter<'a> {
    chunk: &'a mut Chunk,
}

impl<'a> ChunkWriter<'a> {
    pub fn new(chunk: &'a mut Chunk) -> Self {
        Self { chunk }
    }

    pub fn position(&self) -> usize {
        self.chunk.used()
    }
}

impl Write for ChunkWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        match self.chunk.fill_from(buf) {
            0 => Err(io::Error::new(io::ErrorKind::WriteZero, "chunk capacity exhausted")),
            n => Ok(n),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
