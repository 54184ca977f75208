//! sink.rs
//! Downstream consumers of finished frames.
//!
//! A sink receives each successfully compressed frame exactly once and owns
//! the chunks from then on. Failed frames never reach it.

use crossbeam::channel::Sender;
use tracing::warn;

use crate::buffer::ChunkList;

pub trait Sink {
    fn deliver(&mut self, frame_number: i64, chunks: ChunkList);
}

/// One delivered frame, as it travels to a persistence thread.
#[derive(Debug)]
pub struct Delivery {
    pub frame_number: i64,
    pub chunks: ChunkList,
}

/// Keeps every delivery in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    deliveries: Vec<Delivery>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.deliveries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }

    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }

    pub fn frame_numbers(&self) -> Vec<i64> {
        self.deliveries.iter().map(|d| d.frame_number).collect()
    }

    /// All delivered bytes concatenated, i.e. what a file would contain.
    pub fn concatenated(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for delivery in &self.deliveries {
            out.extend_from_slice(&delivery.chunks.to_vec());
        }
        out
    }

    pub fn into_deliveries(self) -> Vec<Delivery> {
        self.deliveries
    }
}

impl Sink for MemorySink {
    fn deliver(&mut self, frame_number: i64, chunks: ChunkList) {
        self.deliveries.push(Delivery { frame_number, chunks });
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn deliver(&mut self, frame_number: i64, chunks: ChunkList) {
        (**self).deliver(frame_number, chunks)
    }
}

/// Hands deliveries to another thread. If the receiver is gone the chunks
/// come back in the send error and are freed here.
impl Sink for Sender<Delivery> {
    fn deliver(&mut self, frame_number: i64, chunks: ChunkList) {
        if let Err(e) = self.send(Delivery { frame_number, chunks }) {
            let dropped = e.into_inner();
            warn!(
                frame_number = dropped.frame_number,
                bytes = dropped.chunks.total_used_bytes(),
                "sink receiver disconnected, dropping frame"
            );
        }
    }
}
