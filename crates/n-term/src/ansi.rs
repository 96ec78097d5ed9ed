// SPDX-License-Identifier: MIT
//
// Escape sequences, one function per terminal command the board sends.
//
// Every function appends bytes to an `impl Write` and decides nothing;
// the board's cursor tracker chooses what to send and when. Cursor
// movement is relative only (CUU/CUD): the board starts wherever the
// shell left the cursor, so there is no absolute origin to address.
//
// Writing into an `OutputBuffer` cannot fail; the `io::Result` only
// matters when a caller writes straight to a stream.

use std::io::{self, Write};

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// CUU: up `rows` rows. Nothing is written for zero, since terminals
/// read `ESC[0A` as a one-row move.
pub fn cursor_up(w: &mut impl Write, rows: usize) -> io::Result<()> {
    relative(w, rows, 'A')
}

/// CUD: down `rows` rows. Nothing is written for zero.
pub fn cursor_down(w: &mut impl Write, rows: usize) -> io::Result<()> {
    relative(w, rows, 'B')
}

fn relative(w: &mut impl Write, rows: usize, direction: char) -> io::Result<()> {
    match rows {
        0 => Ok(()),
        n => write!(w, "\x1b[{n}{direction}"),
    }
}

/// DECTCEM off.
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// DECTCEM on.
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Line ────────────────────────────────────────────────────────────────────

/// EL 0: blank from the cursor to the end of the row.
pub fn clear_to_eol(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[K")
}

// ─── SGR ─────────────────────────────────────────────────────────────────────

/// SGR 0: back to the terminal's default rendition.
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

/// SGR 1: increased intensity.
pub fn bold(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[1m")
}

/// SGR 33: yellow foreground.
pub fn fg_yellow(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[33m")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bytes(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn vertical_moves() {
        assert_eq!(bytes(|w| cursor_up(w, 3)), "\x1b[3A");
        assert_eq!(bytes(|w| cursor_down(w, 12)), "\x1b[12B");
    }

    #[test]
    fn zero_rows_is_silent() {
        assert_eq!(bytes(|w| cursor_up(w, 0)), "");
        assert_eq!(bytes(|w| cursor_down(w, 0)), "");
    }

    #[test]
    fn cursor_visibility() {
        assert_eq!(bytes(|w| cursor_hide(w)), "\x1b[?25l");
        assert_eq!(bytes(|w| cursor_show(w)), "\x1b[?25h");
    }

    #[test]
    fn erase_and_reset() {
        assert_eq!(bytes(|w| clear_to_eol(w)), "\x1b[K");
        assert_eq!(bytes(|w| reset(w)), "\x1b[0m");
    }

    #[test]
    fn accent_parts() {
        assert_eq!(bytes(|w| bold(w)), "\x1b[1m");
        assert_eq!(bytes(|w| fg_yellow(w)), "\x1b[33m");
    }

    #[test]
    fn row_update_shape() {
        let mut buf = Vec::new();
        cursor_up(&mut buf, 2).unwrap();
        clear_to_eol(&mut buf).unwrap();
        buf.extend_from_slice(b"row\n");
        assert_eq!(String::from_utf8(buf).unwrap(), "\x1b[2A\x1b[Krow\n");
    }
}
