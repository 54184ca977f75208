//! frame.rs
//! Borrowed view of one acquired image plus its metadata.

use serde::{Deserialize, Serialize};

use crate::compression::types::{CompressionError, EngineKind};

/// Ordered key/value metadata. Insertion order is preserved; inserting an
/// existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = HeaderMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// One frame as handed over by the acquisition side.
///
/// The pixel buffer is borrowed: engines read it and never mutate or free it.
/// `frame_number` is fixed at construction.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    frame_number: i64,
    data: &'a [u8],
    sample_depth: usize,
    header: HeaderMap,
}

impl<'a> Frame<'a> {
    pub fn new(frame_number: i64, data: &'a [u8], sample_depth: usize) -> Self {
        Self { frame_number, data, sample_depth, header: HeaderMap::new() }
    }

    pub fn with_header(mut self, header: HeaderMap) -> Self {
        self.header = header;
        self
    }

    pub fn with_header_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.header.insert(key, value);
        self
    }

    pub fn frame_number(&self) -> i64 {
        self.frame_number
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    pub fn sample_depth(&self) -> usize {
        self.sample_depth
    }

    /// Whole elements in the buffer (`byte_size / sample_depth`).
    pub fn element_count(&self) -> usize {
        match self.sample_depth {
            0 => 0,
            depth => self.data.len() / depth,
        }
    }

    pub fn header(&self) -> &HeaderMap {
        &self.header
    }

    pub(crate) fn validate(&self, codec: EngineKind) -> Result<(), CompressionError> {
        if self.sample_depth == 0 {
            return Err(CompressionError::InvalidFrame {
                codec,
                msg: format!("frame {} has sample depth 0", self.frame_number),
            });
        }
        Ok(())
    }
}
