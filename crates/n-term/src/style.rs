// SPDX-License-Identifier: MIT
//
// Style — the board's one accent, painted around a run of text.
//
// Row labels and the header ruler are the only styled text, and they are
// either plain or accented: bold yellow, the classic "bright yellow" of
// 16-color terminals. Accented text is written as `bold + yellow + text +
// reset`, so the accent never leaks into the row content that follows.

use std::io::{self, Write};

use crate::ansi;

/// How a run of text is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Style {
    /// The text as-is, no escape sequences.
    #[default]
    Plain,
    /// Bold yellow, encoded `ESC[1m ESC[33m` and closed with `ESC[0m`.
    Accent,
}

impl Style {
    /// The accent when `enabled`, plain text otherwise.
    #[must_use]
    pub const fn accent_if(enabled: bool) -> Self {
        if enabled { Self::Accent } else { Self::Plain }
    }

    #[inline]
    #[must_use]
    pub const fn is_plain(self) -> bool {
        matches!(self, Self::Plain)
    }

    /// Write `text` in this style.
    ///
    /// # Errors
    ///
    /// Propagates errors from the underlying writer.
    pub fn paint(self, w: &mut impl Write, text: &str) -> io::Result<()> {
        match self {
            Self::Plain => w.write_all(text.as_bytes()),
            Self::Accent => {
                ansi::bold(w)?;
                ansi::fg_yellow(w)?;
                w.write_all(text.as_bytes())?;
                ansi::reset(w)
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
