// SPDX-License-Identifier: MIT
//
// OutputBuffer — one board update, staged.
//
// A row update is several pieces (movement, erase, label, content,
// newline) and a repaint is many row updates. They are staged here and
// handed to the sink in one write, so the terminal never sees a cursor
// movement without the row that follows it.

use std::io::{self, Write};

use crate::sink::Sink;

/// Room for a full repaint of a couple dozen 150-character rows.
const INITIAL_CAPACITY: usize = 4096;

/// Bytes waiting to be written to a [`Sink`].
#[derive(Debug)]
pub struct OutputBuffer {
    staged: Vec<u8>,
}

impl OutputBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            staged: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    #[inline]
    pub fn push_str(&mut self, text: &str) {
        self.staged.extend_from_slice(text.as_bytes());
    }

    #[inline]
    pub fn newline(&mut self) {
        self.staged.push(b'\n');
    }

    /// Write everything staged to `sink` and flush it.
    ///
    /// Does not touch the sink when nothing is staged. The buffer is
    /// emptied even on failure, so a failed update is never replayed in
    /// front of the next one.
    ///
    /// # Errors
    ///
    /// The sink's write or flush error.
    pub fn flush_to(&mut self, sink: &mut (impl Sink + ?Sized)) -> io::Result<()> {
        if self.staged.is_empty() {
            return Ok(());
        }
        let written = sink.write_all(&self.staged);
        self.staged.clear();
        written?;
        sink.flush()
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.staged.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    /// Staging only; see [`OutputBuffer::flush_to`].
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
