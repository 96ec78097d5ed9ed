// SPDX-License-Identifier: MIT
//
// LineBoard — a fixed block of rows that many producers update in place.
//
// The board owns three things that must always agree:
//
//   slots   — the last value written to each row (the source of truth)
//   cursor  — the row the terminal cursor is on, relative to row 0
//   sink    — the terminal (or pipe) the rows are projected onto
//
// All three live behind one Mutex owned by the board. A row update is
// "move to the row, clear it, print label + content + newline", and that
// sequence must reach the sink as a unit: if two producers interleaved
// their movement and their print, the cursor tracker would describe a
// row the cursor is not on, and every later update would land on the
// wrong line. Holding the lock across set + render also means the row a
// producer renders is the value it just wrote, never a torn mix.
//
// Producer operations take `&self`, so one board can be shared by any
// number of threads. Operations that change how many rows exist take
// `&mut self`: the borrow checker guarantees they run on the single
// coordinating thread, so they reach the state with `Mutex::get_mut`
// and no locking at all.
//
// Interactive vs deferred:
//
//   When the sink is a terminal, every mutation is painted immediately.
//   When it is not (a pipe, a CI log), nothing is painted until release,
//   which prints every row once, in order, with its final value. The
//   in-memory slots are always current either way.
//
// Lifecycle:
//
//   LineBoard::new   — validate options, query the sink once
//   board.session()  — hide cursor, print header, paint rows (if live)
//   drop(session)    — repaint every row (always), show cursor

use std::collections::HashMap;
use std::io;
use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, MutexGuard, PoisonError};

use n_term::ansi;
use n_term::output::OutputBuffer;
use n_term::sink::{Sink, StderrSink};
use n_term::style::Style;
use tracing::{debug, info, trace, warn};

use crate::cursor::CursorTracker;
use crate::error::BoardError;
use crate::labels::RowLabels;
use crate::message;
use crate::options::{BoardOptions, Layout};
use crate::sanitize::Sanitizer;

/// Printed once when rows cannot be painted live.
pub const DEFERRED_NOTICE: &str = "the output stream is not attached to a terminal: \
    lines will be printed when the board is released";

// ─── Repaint policy ─────────────────────────────────────────────────────────

/// Whether a paint happens only on a live terminal or unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Repaint {
    /// Paint only when the sink is interactive.
    Soft,
    /// Paint regardless (acquisition header, final release snapshot).
    Forced,
}

// ─── Painter ────────────────────────────────────────────────────────────────

/// Immutable presentation settings, fixed at construction.
#[derive(Debug)]
struct Painter {
    labels: RowLabels,
    show_labels: bool,
    accent: Style,
    sanitizer: Sanitizer,
}

impl Painter {
    /// Write `"{label}: "` for row `index`, or nothing when labels are off.
    fn prefix(&self, out: &mut OutputBuffer, index: usize) -> io::Result<()> {
        if !self.show_labels {
            return Ok(());
        }
        self.accent.paint(out, &self.labels.label(index))?;
        out.push_str(": ");
        Ok(())
    }

    /// Write the header lines, indented to line up with row content.
    fn header(&self, out: &mut OutputBuffer, lines: &[String]) -> io::Result<()> {
        let indent = if self.show_labels {
            " ".repeat(self.labels.width() + 2)
        } else {
            String::new()
        };
        for line in lines {
            out.push_str(&indent);
            self.accent.paint(out, line)?;
            out.newline();
        }
        Ok(())
    }
}

// ─── Screen ─────────────────────────────────────────────────────────────────

/// Mutable rendering state, guarded as one unit.
struct Screen<S> {
    slots: Vec<String>,
    cursor: CursorTracker,
    out: OutputBuffer,
    sink: S,
}

impl<S: Sink> Screen<S> {
    /// Queue move + clear + label + content + newline for row `index`.
    fn render_row(&mut self, painter: &Painter, index: usize) -> io::Result<()> {
        self.cursor.move_to(index, &mut self.out)?;
        ansi::clear_to_eol(&mut self.out)?;
        painter.prefix(&mut self.out, index)?;
        let text = painter.sanitizer.apply(&self.slots[index]);
        self.out.push_str(&text);
        self.out.newline();
        self.cursor.advance_past(index);
        trace!(row = index, "rendered row");
        Ok(())
    }

    /// Queue rows `from..len` top to bottom.
    fn render_rows(&mut self, painter: &Painter, from: usize) -> io::Result<()> {
        for index in from..self.slots.len() {
            self.render_row(painter, index)?;
        }
        Ok(())
    }

    /// Queue a blank-out of row `index` (leaves the cursor on it).
    fn clear_row(&mut self, index: usize) -> io::Result<()> {
        self.cursor.move_to(index, &mut self.out)?;
        ansi::clear_to_eol(&mut self.out)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush_to(&mut self.sink)
    }
}

fn announce(sink: &mut impl Sink) -> io::Result<()> {
    sink.write_all(DEFERRED_NOTICE.as_bytes())?;
    sink.write_all(b"\n")?;
    sink.flush()
}

// ─── LineBoard ──────────────────────────────────────────────────────────────

/// A block of rows addressable by index or by identifier.
///
/// # Example
///
/// ```
/// use n_board::{BoardOptions, LineBoard};
/// use n_term::sink::MemorySink;
///
/// let sink = MemorySink::detached();
/// let options = BoardOptions::identifiers(["fetch", "build"])
///     .use_color(false)
///     .announce_deferred(false);
/// let mut board = LineBoard::new(options, sink.clone())?;
/// {
///     let session = board.session()?;
///     session.write("build-> compiling 12 crates")?;
///     session.set(0, "done")?;
/// }
/// assert_eq!(board.snapshot(), vec!["done", "compiling 12 crates"]);
/// assert!(sink.contents().contains("1: compiling 12 crates\n"));
/// # Ok::<(), n_board::BoardError>(())
/// ```
pub struct LineBoard<S: Sink = StderrSink> {
    screen: Mutex<Screen<S>>,
    lookup: Option<HashMap<String, usize>>,
    painter: Painter,
    header: Option<Vec<String>>,
    interactive: bool,
}

impl LineBoard<StderrSink> {
    /// A board drawn on the process's stderr.
    ///
    /// # Errors
    ///
    /// See [`LineBoard::new`].
    pub fn stderr(options: BoardOptions) -> Result<Self, BoardError> {
        Self::new(options, StderrSink::new())
    }
}

impl<S: Sink> LineBoard<S> {
    /// Validate `options` and bind the board to `sink`.
    ///
    /// The sink is asked once whether it is interactive and, if so, how
    /// many rows it shows; the answers hold for the board's lifetime.
    ///
    /// # Errors
    ///
    /// Configuration errors for a missing row source, duplicate
    /// identifiers, or identifier/label counts that do not match the rows;
    /// [`BoardError::Capacity`] when a live terminal is shorter than the
    /// board. A deferred notice that cannot be printed is only logged.
    pub fn new(options: BoardOptions, mut sink: S) -> Result<Self, BoardError> {
        let layout = Layout::resolve(&options)?;
        let interactive = sink.is_interactive();

        if interactive {
            if let Some(available) = sink.visible_rows() {
                if layout.slots.len() > usize::from(available) {
                    return Err(BoardError::Capacity {
                        requested: layout.slots.len(),
                        available,
                    });
                }
            }
        } else if options.announce_deferred {
            info!("sink is not a terminal; rows will be printed on release");
            if let Err(err) = announce(&mut sink) {
                warn!(%err, "could not print the deferred notice");
            }
        }

        let labels = layout.row_labels.map_or_else(
            || RowLabels::numeric(layout.slots.len()),
            RowLabels::custom,
        );
        let painter = Painter {
            labels,
            show_labels: options.show_labels,
            accent: Style::accent_if(options.use_color),
            sanitizer: Sanitizer::new(options.max_chars),
        };
        let header = options
            .show_header
            .then(|| options.header.lines(painter.sanitizer));

        info!(
            rows = layout.slots.len(),
            interactive,
            identifiers = layout.lookup.is_some(),
            "line board created"
        );

        Ok(Self {
            screen: Mutex::new(Screen {
                slots: layout.slots,
                cursor: CursorTracker::new(),
                out: OutputBuffer::new(),
                sink,
            }),
            lookup: layout.lookup,
            painter,
            header,
            interactive,
        })
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Whether rows are painted live.
    #[inline]
    #[must_use]
    pub const fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().slots.is_empty()
    }

    /// The current (unsanitized) value of row `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<String> {
        self.lock().slots.get(index).cloned()
    }

    /// The current values of all rows.
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.lock().slots.clone()
    }

    /// The row the terminal cursor is on, relative to row 0.
    #[must_use]
    pub fn cursor_row(&self) -> usize {
        self.lock().cursor.row()
    }

    /// The row bound to `identifier` at construction.
    #[must_use]
    pub fn identifier_index(&self, identifier: &str) -> Option<usize> {
        self.lookup.as_ref()?.get(identifier).copied()
    }

    /// Consume the board and return its sink.
    ///
    /// No release happens here; use a [`Session`] for that.
    pub fn into_sink(self) -> S {
        self.screen
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .sink
    }

    // ── Scoped use ──────────────────────────────────────────────────────

    /// Acquire the terminal: hide the cursor, print the header, paint rows.
    ///
    /// The returned [`Session`] releases the terminal when dropped, on
    /// every exit path, including a panic unwinding through the caller.
    ///
    /// # Errors
    ///
    /// I/O errors from the sink. The release still runs in that case.
    pub fn session(&mut self) -> Result<Session<'_, S>, BoardError> {
        let mut session = Session {
            board: self,
            released: false,
        };
        session.board.acquire()?;
        Ok(session)
    }

    fn acquire(&mut self) -> Result<(), BoardError> {
        let interactive = self.interactive;
        let painter = &self.painter;
        let screen = self.screen.get_mut().unwrap_or_else(PoisonError::into_inner);

        if interactive {
            screen.sink.hide_cursor()?;
        }
        if let Some(lines) = &self.header {
            painter.header(&mut screen.out, lines)?;
            screen.flush()?;
        }
        self.paint_rows(0, Repaint::Soft)
    }

    fn release(&mut self) -> Result<(), BoardError> {
        let painted = self.paint_rows(0, Repaint::Forced);
        let shown = if self.interactive {
            let screen = self.screen.get_mut().unwrap_or_else(PoisonError::into_inner);
            screen.sink.show_cursor()
        } else {
            Ok(())
        };
        info!("line board released");
        painted?;
        shown?;
        Ok(())
    }

    // ── Producer operations (&self) ─────────────────────────────────────

    /// Replace row `index` and repaint it.
    ///
    /// # Errors
    ///
    /// [`BoardError::IndexOutOfRange`] for a row that does not exist;
    /// I/O errors from the sink.
    pub fn set(&self, index: usize, value: impl Into<String>) -> Result<(), BoardError> {
        let mut screen = self.lock();
        let len = screen.slots.len();
        let slot = screen
            .slots
            .get_mut(index)
            .ok_or(BoardError::IndexOutOfRange { index, len })?;
        *slot = value.into();
        self.paint_locked(&mut screen, index)
    }

    /// Route a tagged `"<identifier>-><payload>"` message to its row.
    ///
    /// Returns `Ok(true)` when a row changed. Messages without a tag, with
    /// an unknown identifier, on a board without identifiers, or carrying
    /// the value the row already shows are ignored (`Ok(false)`).
    ///
    /// # Errors
    ///
    /// Only I/O errors from the sink.
    pub fn write(&self, message: &str) -> Result<bool, BoardError> {
        let Some((identifier, payload)) = message::parse_tagged(message) else {
            return Ok(false);
        };
        self.write_to(identifier, payload)
    }

    /// Set the row bound to `identifier` to `payload`, unless it already
    /// shows exactly that. Unknown identifiers are ignored.
    ///
    /// # Errors
    ///
    /// Only I/O errors from the sink.
    pub fn write_to(&self, identifier: &str, payload: &str) -> Result<bool, BoardError> {
        let Some(index) = self.identifier_index(identifier) else {
            trace!(identifier, "no row for identifier");
            return Ok(false);
        };

        let mut screen = self.lock();
        let Some(slot) = screen.slots.get_mut(index) else {
            debug!(identifier, index, "identifier row no longer exists");
            return Ok(false);
        };
        if slot.as_str() == payload {
            return Ok(false);
        }
        payload.clone_into(slot);
        self.paint_locked(&mut screen, index)?;
        Ok(true)
    }

    // ── Topology operations (&mut self) ─────────────────────────────────

    /// Add a row at the bottom and repaint the board.
    ///
    /// The new row has no identifier and, past the end of custom labels,
    /// shows its index.
    ///
    /// # Errors
    ///
    /// I/O errors from the sink.
    pub fn append(&mut self, value: impl Into<String>) -> Result<(), BoardError> {
        self.screen
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .slots
            .push(value.into());
        self.paint_rows(0, Repaint::Soft)
    }

    /// Remove row `index` and return its value.
    ///
    /// The vanished bottom row is blanked, then rows from `index` down are
    /// repainted with their new contents. Rows above `index` are untouched.
    /// Identifiers of the removed row and of every row that shifted up are
    /// unbound; tagged writes to them are ignored from then on.
    ///
    /// # Errors
    ///
    /// [`BoardError::IndexOutOfRange`]; I/O errors from the sink.
    pub fn remove_at(&mut self, index: usize) -> Result<String, BoardError> {
        let interactive = self.interactive;
        let painter = &self.painter;
        let screen = self.screen.get_mut().unwrap_or_else(PoisonError::into_inner);

        let len = screen.slots.len();
        if index >= len {
            return Err(BoardError::IndexOutOfRange { index, len });
        }
        let removed = screen.slots.remove(index);
        if let Some(lookup) = &mut self.lookup {
            lookup.retain(|_, row| *row < index);
        }

        if interactive {
            debug!(index, "removing row");
            screen.clear_row(len - 1)?;
            screen.render_rows(painter, index)?;
            screen.flush()?;
        }
        Ok(removed)
    }

    /// Remove and return the bottom row.
    ///
    /// # Errors
    ///
    /// [`BoardError::IndexOutOfRange`] on an empty board; I/O errors.
    pub fn pop(&mut self) -> Result<String, BoardError> {
        let len = self.len_mut();
        if len == 0 {
            return Err(BoardError::IndexOutOfRange { index: 0, len });
        }
        self.remove_at(len - 1)
    }

    /// Remove and return row `index`. Same contract as [`remove_at`](Self::remove_at).
    ///
    /// # Errors
    ///
    /// [`BoardError::IndexOutOfRange`]; I/O errors from the sink.
    pub fn pop_at(&mut self, index: usize) -> Result<String, BoardError> {
        self.remove_at(index)
    }

    /// Remove every row, blanking them on a live terminal. The header
    /// stays; identifiers are unbound.
    ///
    /// # Errors
    ///
    /// I/O errors from the sink.
    pub fn clear(&mut self) -> Result<(), BoardError> {
        let interactive = self.interactive;
        let screen = self.screen.get_mut().unwrap_or_else(PoisonError::into_inner);
        let len = screen.slots.len();
        screen.slots.clear();
        if let Some(lookup) = &mut self.lookup {
            lookup.clear();
        }

        if interactive {
            for index in 0..len {
                screen.clear_row(index)?;
            }
            screen.flush()?;
        }
        Ok(())
    }

    /// Removing by value is refused: with duplicate values there is no
    /// telling which row was meant. Remove by index instead.
    ///
    /// # Errors
    ///
    /// Always [`BoardError::Unsupported`].
    pub fn remove_value(&mut self, _value: &str) -> Result<(), BoardError> {
        Err(BoardError::Unsupported("removing a line by value"))
    }

    // ── Painting ────────────────────────────────────────────────────────

    const fn should_paint(&self, policy: Repaint) -> bool {
        match policy {
            Repaint::Soft => self.interactive,
            Repaint::Forced => true,
        }
    }

    /// Paint rows `from..len` (exclusive access, no lock taken).
    fn paint_rows(&mut self, from: usize, policy: Repaint) -> Result<(), BoardError> {
        if !self.should_paint(policy) {
            return Ok(());
        }
        debug!(from, ?policy, "printing rows");
        let painter = &self.painter;
        let screen = self.screen.get_mut().unwrap_or_else(PoisonError::into_inner);
        screen.render_rows(painter, from)?;
        screen.flush()?;
        Ok(())
    }

    /// Paint one row while already holding the lock.
    fn paint_locked(&self, screen: &mut Screen<S>, index: usize) -> Result<(), BoardError> {
        if !self.should_paint(Repaint::Soft) {
            return Ok(());
        }
        screen.render_row(&self.painter, index)?;
        screen.flush()?;
        Ok(())
    }

    fn len_mut(&mut self) -> usize {
        self.screen
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .slots
            .len()
    }

    fn lock(&self) -> MutexGuard<'_, Screen<S>> {
        self.screen.lock().unwrap_or_else(|poisoned| {
            warn!("a producer panicked while painting; recovering board state");
            poisoned.into_inner()
        })
    }
}

// ─── Session ────────────────────────────────────────────────────────────────

/// Scoped use of a board. Dropping it repaints every row and restores
/// the cursor.
///
/// Derefs to the board, so producers use the session directly:
///
/// ```
/// use n_board::{BoardOptions, LineBoard};
/// use n_term::sink::MemorySink;
///
/// let mut board = LineBoard::new(BoardOptions::size(4), MemorySink::interactive(24))?;
/// let session = board.session()?;
/// std::thread::scope(|scope| {
///     for worker in 0..4 {
///         let board = &*session;
///         scope.spawn(move || board.set(worker, format!("worker {worker} done")));
///     }
/// });
/// session.finish()?;
/// # Ok::<(), n_board::BoardError>(())
/// ```
pub struct Session<'a, S: Sink> {
    board: &'a mut LineBoard<S>,
    released: bool,
}

impl<S: Sink> Session<'_, S> {
    /// Release now and report I/O errors instead of logging them.
    ///
    /// # Errors
    ///
    /// I/O errors from the final repaint or from restoring the cursor.
    pub fn finish(mut self) -> Result<(), BoardError> {
        self.released = true;
        self.board.release()
    }
}

impl<S: Sink> Deref for Session<'_, S> {
    type Target = LineBoard<S>;

    fn deref(&self) -> &Self::Target {
        self.board
    }
}

impl<S: Sink> DerefMut for Session<'_, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.board
    }
}

impl<S: Sink> Drop for Session<'_, S> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(err) = self.board.release() {
            warn!(%err, "failed to restore the terminal on release");
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
