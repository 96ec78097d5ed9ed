// SPDX-License-Identifier: MIT

//! Board errors.
//!
//! Construction problems are fatal and reported before anything touches
//! the terminal. Index errors fail only the operation that caused them.
//! Writes whose identifier does not resolve are *not* errors at all; see
//! [`LineBoard::write`](crate::LineBoard::write).

use std::io;

use thiserror::Error;

/// Everything that can go wrong while building or driving a board.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("a content list, a line count, or an identifier list must be provided")]
    MissingSource,

    #[error("identifier {0:?} appears more than once; identifiers must be unique")]
    DuplicateIdentifier(String),

    #[error("{identifiers} identifiers were given for {slots} lines; the counts must match")]
    IdentifierCountMismatch { identifiers: usize, slots: usize },

    #[error("{labels} row labels were given for {slots} lines; the counts must match")]
    LabelCountMismatch { labels: usize, slots: usize },

    #[error("number of lines to display {requested} exceeds current terminal height {available}")]
    Capacity { requested: usize, available: u16 },

    #[error("line index {index} is out of range for a board of {len} lines")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{0} is not supported")]
    Unsupported(&'static str),

    #[error("concurrency must be between 1 and {available} (the available parallelism), got {requested}")]
    InvalidConcurrency { requested: usize, available: usize },

    #[error("terminal output failed: {0}")]
    Io(#[from] io::Error),
}

/// Coarse classification of a [`BoardError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad construction arguments.
    Configuration,
    /// The board is taller than the terminal.
    Capacity,
    /// A line index outside the board.
    Index,
    /// An operation the board refuses to guess at.
    Unsupported,
    /// The sink failed.
    Io,
}

impl BoardError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingSource
            | Self::DuplicateIdentifier(_)
            | Self::IdentifierCountMismatch { .. }
            | Self::LabelCountMismatch { .. }
            | Self::InvalidConcurrency { .. } => ErrorKind::Configuration,
            Self::Capacity { .. } => ErrorKind::Capacity,
            Self::IndexOutOfRange { .. } => ErrorKind::Index,
            Self::Unsupported(_) => ErrorKind::Unsupported,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
