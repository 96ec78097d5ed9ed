// SPDX-License-Identifier: MIT
//
// Sinks — where the board's bytes go.
//
// The board treats its output as a byte sink it may query exactly once
// for two facts: is a real terminal attached, and how many rows does it
// show. Everything after that is "write these bytes" and "flush".
//
//   StderrSink  — the real thing: the process's stderr.
//   MemorySink  — an in-memory capture with a shared handle, so a test
//                 (or a caller that wants a snapshot) can keep reading
//                 what the board wrote after handing the sink over.
//   WriterSink  — any `Write` (file, pipe, socket); never interactive.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::ansi;
use crate::terminal;

// ─── Sink ───────────────────────────────────────────────────────────────────

/// A byte destination for board output.
///
/// `Send` so a board owning its sink can be shared across producer threads.
pub trait Sink: Send {
    /// Whether a real terminal is attached (cursor movement is meaningful).
    fn is_interactive(&self) -> bool;

    /// Visible terminal rows, when known. Only consulted when interactive.
    fn visible_rows(&self) -> Option<u16>;

    /// Write all of `bytes`.
    ///
    /// # Errors
    ///
    /// Propagates the underlying I/O error.
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Flush anything buffered downstream.
    ///
    /// # Errors
    ///
    /// Propagates the underlying I/O error.
    fn flush(&mut self) -> io::Result<()>;

    /// Hide the cursor and flush.
    ///
    /// # Errors
    ///
    /// Propagates the underlying I/O error.
    fn hide_cursor(&mut self) -> io::Result<()> {
        let mut seq = Vec::with_capacity(6);
        ansi::cursor_hide(&mut seq)?;
        self.write_all(&seq)?;
        self.flush()
    }

    /// Show the cursor and flush.
    ///
    /// # Errors
    ///
    /// Propagates the underlying I/O error.
    fn show_cursor(&mut self) -> io::Result<()> {
        let mut seq = Vec::with_capacity(6);
        ansi::cursor_show(&mut seq)?;
        self.write_all(&seq)?;
        self.flush()
    }
}

// ─── StderrSink ─────────────────────────────────────────────────────────────

/// The process's standard error stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl StderrSink {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Sink for StderrSink {
    fn is_interactive(&self) -> bool {
        terminal::stderr_is_tty()
    }

    fn visible_rows(&self) -> Option<u16> {
        terminal::stderr_size().map(|s| s.rows)
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        io::stderr().lock().write_all(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().lock().flush()
    }
}

// ─── MemorySink ─────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Captured {
    bytes: Vec<u8>,
    writes: usize,
    flushes: usize,
    failing: bool,
}

/// In-memory sink with a cloneable handle onto the same capture.
///
/// Clones share one buffer: give one clone to the board, keep another to
/// inspect what was written.
///
/// ```
/// use n_term::sink::{MemorySink, Sink};
///
/// let sink = MemorySink::interactive(24);
/// let mut handle = sink.clone();
/// handle.write_all(b"row\n").unwrap();
/// assert_eq!(sink.contents(), "row\n");
/// ```
#[derive(Debug, Clone)]
pub struct MemorySink {
    captured: Arc<Mutex<Captured>>,
    interactive: bool,
    rows: Option<u16>,
}

impl MemorySink {
    /// A sink that claims to be a terminal with `rows` visible rows.
    #[must_use]
    pub fn interactive(rows: u16) -> Self {
        Self {
            captured: Arc::default(),
            interactive: true,
            rows: Some(rows),
        }
    }

    /// A sink that claims to be a pipe or file.
    #[must_use]
    pub fn detached() -> Self {
        Self {
            captured: Arc::default(),
            interactive: false,
            rows: None,
        }
    }

    /// Everything written so far, decoded lossily as UTF-8.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock().bytes).into_owned()
    }

    /// Return everything written so far and reset the capture.
    pub fn take(&self) -> String {
        let mut captured = self.lock();
        let bytes = std::mem::take(&mut captured.bytes);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Number of `write_all` calls that reached the sink.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// Number of `flush` calls that reached the sink.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        self.lock().flushes
    }

    /// Make subsequent writes fail with `BrokenPipe` (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    fn lock(&self) -> MutexGuard<'_, Captured> {
        self.captured.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Sink for MemorySink {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn visible_rows(&self) -> Option<u16> {
        self.rows
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        let mut captured = self.lock();
        if captured.failing {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"));
        }
        captured.bytes.extend_from_slice(bytes);
        captured.writes += 1;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut captured = self.lock();
        if captured.failing {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"));
        }
        captured.flushes += 1;
        Ok(())
    }
}

// ─── WriterSink ─────────────────────────────────────────────────────────────

/// Adapter turning any writer into a non-interactive sink.
#[derive(Debug)]
pub struct WriterSink<W> {
    inner: W,
}

impl<W: Write + Send> WriterSink<W> {
    pub const fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Recover the wrapped writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn is_interactive(&self) -> bool {
        false
    }

    fn visible_rows(&self) -> Option<u16> {
        None
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── MemorySink ────────────────────────────────────────────────────

    #[test]
    fn memory_interactive_reports_rows() {
        let sink = MemorySink::interactive(40);
        assert!(sink.is_interactive());
        assert_eq!(sink.visible_rows(), Some(40));
    }

    #[test]
    fn memory_detached_reports_nothing() {
        let sink = MemorySink::detached();
        assert!(!sink.is_interactive());
        assert_eq!(sink.visible_rows(), None);
    }

    #[test]
    fn memory_clones_share_capture() {
        let sink = MemorySink::detached();
        let mut a = sink.clone();
        let mut b = sink.clone();
        a.write_all(b"one ").unwrap();
        b.write_all(b"two").unwrap();
        assert_eq!(sink.contents(), "one two");
        assert_eq!(sink.write_count(), 2);
    }

    #[test]
    fn memory_take_resets() {
        let mut sink = MemorySink::detached();
        sink.write_all(b"abc").unwrap();
        assert_eq!(sink.take(), "abc");
        assert_eq!(sink.contents(), "");
    }

    #[test]
    fn memory_failing_rejects_writes() {
        let mut sink = MemorySink::interactive(10);
        sink.set_failing(true);
        let err = sink.write_all(b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(sink.flush().is_err());
        sink.set_failing(false);
        sink.write_all(b"y").unwrap();
        assert_eq!(sink.contents(), "y");
    }

    #[test]
    fn hide_and_show_cursor_sequences() {
        let mut sink = MemorySink::interactive(10);
        sink.hide_cursor().unwrap();
        sink.show_cursor().unwrap();
        assert_eq!(sink.contents(), "\x1b[?25l\x1b[?25h");
        assert_eq!(sink.flush_count(), 2);
    }

    // ── WriterSink ────────────────────────────────────────────────────

    #[test]
    fn writer_sink_is_never_interactive() {
        let sink = WriterSink::new(Vec::new());
        assert!(!sink.is_interactive());
        assert_eq!(sink.visible_rows(), None);
    }

    #[test]
    fn writer_sink_passes_bytes_through() {
        let mut sink = WriterSink::new(Vec::new());
        sink.write_all(b"line\n").unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.into_inner(), b"line\n");
    }

    // ── StderrSink ────────────────────────────────────────────────────

    #[test]
    fn stderr_rows_only_with_tty() {
        let sink = StderrSink::new();
        if !sink.is_interactive() {
            assert_eq!(sink.visible_rows(), None);
        }
    }
}
