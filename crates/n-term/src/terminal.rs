// SPDX-License-Identifier: MIT
//
// Terminal queries: is a descriptor a terminal, and how big is it.
//
// isatty and ioctl(TIOCGWINSZ) are the only ways to ask, and both are
// `unsafe` through libc. Each call sits in its own one-line block.
#![allow(unsafe_code)]
//
// Stderr is the descriptor the board cares about. Stdout is often
// redirected (`tool > results.txt`) while stderr still reaches the
// screen, so the board draws there. The size is read once, when a board
// is built; there is no SIGWINCH handling.

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

#[cfg(unix)]
pub const STDOUT: i32 = libc::STDOUT_FILENO;
#[cfg(unix)]
pub const STDERR: i32 = libc::STDERR_FILENO;

#[cfg(not(unix))]
pub const STDOUT: i32 = 1;
#[cfg(not(unix))]
pub const STDERR: i32 = 2;

/// Window size of the terminal behind `fd`, or `None` when `fd` is not a
/// terminal or reports a zero dimension.
#[cfg(unix)]
#[must_use]
pub fn get_size(fd: i32) -> Option<Size> {
    let mut ws = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    if unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &raw mut ws) } != 0 {
        return None;
    }
    (ws.ws_col > 0 && ws.ws_row > 0).then_some(Size {
        cols: ws.ws_col,
        rows: ws.ws_row,
    })
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size(_fd: i32) -> Option<Size> {
    None
}

#[cfg(unix)]
#[must_use]
pub fn is_tty(fd: i32) -> bool {
    unsafe { libc::isatty(fd) == 1 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty(_fd: i32) -> bool {
    false
}

#[must_use]
pub fn stderr_size() -> Option<Size> {
    get_size(STDERR)
}

#[must_use]
pub fn stderr_is_tty() -> bool {
    is_tty(STDERR)
}
