// SPDX-License-Identifier: MIT
//
// n-term — Terminal layer for n-lines.
//
// Everything the line board needs from a terminal and nothing more:
// relative cursor movement, line clearing, cursor visibility, one accent
// style, and an output sink abstraction that knows whether a real
// terminal is attached and how many rows it has.
//
// No external TUI framework (ratatui, crossterm): cursor control is
// plain ANSI escape sequences and terminal queries are raw libc calls.
// The board never addresses absolute screen coordinates; it only moves
// up and down relative to where it last printed, so it coexists with
// whatever the shell printed before.

pub mod ansi;
pub mod output;
pub mod sink;
pub mod style;
pub mod terminal;

pub use output::OutputBuffer;
pub use sink::{MemorySink, Sink, StderrSink, WriterSink};
pub use style::Style;
pub use terminal::Size;
