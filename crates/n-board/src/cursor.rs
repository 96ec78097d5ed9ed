// SPDX-License-Identifier: MIT
//
// Cursor tracking — where the terminal cursor sits relative to row 0.
//
// The board never asks the terminal where the cursor is. It remembers.
// Row 0 is the first board row; the tracker starts there because the
// board is painted from wherever the cursor stood at startup.
//
// Two rules keep the memory true:
//
//   1. Moving to a row emits exactly the net displacement (CUU or CUD by
//      |target - current|) and nothing when already there.
//
//   2. Printing a row ends with a newline, which leaves the cursor at the
//      start of the *next* row. So after printing row `r` the tracker
//      holds `r + 1`. That is why a top-to-bottom repaint needs no
//      movement between rows: each print lands exactly where the next one
//      starts.
//
// The tracker is only ever changed through these two operations.

use std::io::{self, Write};

use n_term::ansi;

/// A relative cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Stay,
    Up(usize),
    Down(usize),
}

impl Movement {
    /// The minimal movement from row `current` to row `target`.
    #[must_use]
    pub const fn between(current: usize, target: usize) -> Self {
        if target < current {
            Self::Up(current - target)
        } else if target > current {
            Self::Down(target - current)
        } else {
            Self::Stay
        }
    }

    /// Rows crossed by this movement.
    #[must_use]
    pub const fn distance(self) -> usize {
        match self {
            Self::Stay => 0,
            Self::Up(n) | Self::Down(n) => n,
        }
    }

    /// Encode the movement.
    ///
    /// # Errors
    ///
    /// Propagates errors from the underlying writer.
    pub fn encode(self, w: &mut impl Write) -> io::Result<()> {
        match self {
            Self::Stay => Ok(()),
            Self::Up(n) => ansi::cursor_up(w, n),
            Self::Down(n) => ansi::cursor_down(w, n),
        }
    }
}

/// The row the terminal cursor is on, relative to board row 0.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CursorTracker {
    row: usize,
}

impl CursorTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self { row: 0 }
    }

    #[inline]
    #[must_use]
    pub const fn row(self) -> usize {
        self.row
    }

    /// Emit the minimal movement to `target` and record it.
    ///
    /// # Errors
    ///
    /// Propagates errors from the underlying writer; the tracker is only
    /// updated once the movement was written.
    pub fn move_to(&mut self, target: usize, w: &mut impl Write) -> io::Result<Movement> {
        let movement = Movement::between(self.row, target);
        movement.encode(w)?;
        self.row = target;
        Ok(movement)
    }

    /// Record that row `printed` was just printed with a trailing newline.
    #[inline]
    pub const fn advance_past(&mut self, printed: usize) {
        self.row = printed + 1;
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn moved(tracker: &mut CursorTracker, target: usize) -> (Movement, String) {
        let mut buf = Vec::new();
        let movement = tracker.move_to(target, &mut buf).unwrap();
        (movement, String::from_utf8(buf).unwrap())
    }

    // ── Movement ────────────────────────────────────────────────────────

    #[test]
    fn between_picks_direction() {
        assert_eq!(Movement::between(12, 7), Movement::Up(5));
        assert_eq!(Movement::between(2, 7), Movement::Down(5));
        assert_eq!(Movement::between(2, 2), Movement::Stay);
    }

    #[test]
    fn distance_is_net_displacement() {
        assert_eq!(Movement::Up(3).distance(), 3);
        assert_eq!(Movement::Down(4).distance(), 4);
        assert_eq!(Movement::Stay.distance(), 0);
    }

    // ── Tracker ─────────────────────────────────────────────────────────

    #[test]
    fn starts_at_row_zero() {
        assert_eq!(CursorTracker::new().row(), 0);
    }

    #[test]
    fn moving_up_emits_cuu() {
        let mut tracker = CursorTracker::new();
        tracker.advance_past(11);
        let (movement, bytes) = moved(&mut tracker, 7);
        assert_eq!(movement, Movement::Up(5));
        assert_eq!(bytes, "\x1b[5A");
        assert_eq!(tracker.row(), 7);
    }

    #[test]
    fn moving_down_emits_cud() {
        let mut tracker = CursorTracker::new();
        tracker.advance_past(1);
        let (movement, bytes) = moved(&mut tracker, 7);
        assert_eq!(movement, Movement::Down(5));
        assert_eq!(bytes, "\x1b[5B");
        assert_eq!(tracker.row(), 7);
    }

    #[test]
    fn staying_emits_nothing() {
        let mut tracker = CursorTracker::new();
        let (movement, bytes) = moved(&mut tracker, 0);
        assert_eq!(movement, Movement::Stay);
        assert_eq!(bytes, "");
    }

    #[test]
    fn printing_lands_on_next_row() {
        let mut tracker = CursorTracker::new();
        for row in 0..5 {
            let (movement, _) = moved(&mut tracker, row);
            assert_eq!(movement, Movement::Stay);
            tracker.advance_past(row);
        }
        assert_eq!(tracker.row(), 5);
    }
}
