//! header.rs
//! Header bytes prepended by File-scope engines.
//!
//! The header grammar belongs to the caller; engines only see the rendered
//! bytes. `KeyValueHeaderWriter` is a plain default for callers without a
//! format of their own.

use std::fmt;
use std::io::Write;

use crate::frame::{Frame, HeaderMap};

pub trait HeaderWriter: Send {
    /// Append the header for `frame` to `out`.
    fn write_header(&self, frame: &Frame<'_>, template: &HeaderMap, frames_per_file: u32, out: &mut Vec<u8>);
}

impl<F> HeaderWriter for F
where
    F: Fn(&Frame<'_>, &HeaderMap, u32, &mut Vec<u8>) + Send,
{
    fn write_header(&self, frame: &Frame<'_>, template: &HeaderMap, frames_per_file: u32, out: &mut Vec<u8>) {
        self(frame, template, frames_per_file, out)
    }
}

/// Renders `key = value ;` lines between braces: frame geometry first, then
/// the session template, then the frame's own entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyValueHeaderWriter;

impl HeaderWriter for KeyValueHeaderWriter {
    fn write_header(&self, frame: &Frame<'_>, template: &HeaderMap, frames_per_file: u32, out: &mut Vec<u8>) {
        // Writing into a Vec cannot fail.
        let _ = write_block(frame, template, frames_per_file, out);
    }
}

fn write_block(
    frame: &Frame<'_>,
    template: &HeaderMap,
    frames_per_file: u32,
    out: &mut Vec<u8>,
) -> std::io::Result<()> {
    writeln!(out, "{{")?;
    writeln!(out, "frame_number = {} ;", frame.frame_number())?;
    writeln!(out, "frames_per_file = {} ;", frames_per_file)?;
    writeln!(out, "byte_size = {} ;", frame.byte_size())?;
    writeln!(out, "sample_depth = {} ;", frame.sample_depth())?;
    for (key, value) in template.iter().chain(frame.header().iter()) {
        writeln!(out, "{} = {} ;", key, value)?;
    }
    writeln!(out, "}}")
}

/// Header settings shared by the File-scope engines.
pub struct FileScope {
    writer: Box<dyn HeaderWriter>,
    template: HeaderMap,
    frames_per_file: u32,
}

impl FileScope {
    pub fn new(writer: Box<dyn HeaderWriter>, template: HeaderMap, frames_per_file: u32) -> Self {
        Self { writer, template, frames_per_file }
    }

    pub fn template(&self) -> &HeaderMap {
        &self.template
    }

    pub fn frames_per_file(&self) -> u32 {
        self.frames_per_file
    }

    /// Clear `out` and render the header of `frame` into it.
    pub fn render(&self, frame: &Frame<'_>, out: &mut Vec<u8>) {
        out.clear();
        self.writer.write_header(frame, &self.template, self.frames_per_file, out);
    }
}

impl Default for FileScope {
    fn default() -> Self {
        Self::new(Box::new(KeyValueHeaderWriter), HeaderMap::new(), 1)
    }
}

impl fmt::Debug for FileScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileScope")
            .field("template", &self.template)
            .field("frames_per_file", &self.frames_per_file)
            .finish_non_exhaustive()
    }
}
