// SPDX-License-Identifier: MIT
//
// Header — fixed line(s) printed once above the board.
//
// Useful as an x-axis when rows are read as columns of data. Without
// custom content the header is a ruler as wide as a row may get, with a
// digit every ten columns:
//
//   0.........1.........2.........3...
//
// The header is printed before row 0 and never repainted, so it takes no
// part in cursor tracking. That only holds if each header line is one
// terminal row, so literal lines are sanitized exactly like row values.

use crate::sanitize::Sanitizer;

/// Filler for ruler columns that carry no digit.
const RULER_FILL: char = '.';

/// What the header shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Header {
    /// A generated ruler, as wide as the row width.
    #[default]
    Ruler,
    /// A single literal line.
    Line(String),
    /// Several literal lines, printed top to bottom.
    Lines(Vec<String>),
}

impl Header {
    /// The concrete header lines, one terminal row each, for rows cut by
    /// `sanitizer`.
    #[must_use]
    pub fn lines(&self, sanitizer: Sanitizer) -> Vec<String> {
        let row = |line: &String| sanitizer.apply(line).into_owned();
        match self {
            Self::Ruler => vec![ruler(sanitizer.max_chars())],
            Self::Line(line) => vec![row(line)],
            Self::Lines(lines) => lines.iter().map(row).collect(),
        }
    }
}

impl From<&str> for Header {
    fn from(line: &str) -> Self {
        Self::Line(line.to_owned())
    }
}

impl From<String> for Header {
    fn from(line: String) -> Self {
        Self::Line(line)
    }
}

impl From<Vec<String>> for Header {
    fn from(lines: Vec<String>) -> Self {
        Self::Lines(lines)
    }
}

/// A ruler of `width` columns: column `i` shows the last digit of `i / 10`
/// when `i` is a multiple of ten, and [`RULER_FILL`] otherwise.
#[must_use]
pub fn ruler(width: usize) -> String {
    (0..width)
        .map(|col| {
            if col % 10 == 0 {
                decimal_digit((col / 10) % 10)
            } else {
                RULER_FILL
            }
        })
        .collect()
}

fn decimal_digit(d: usize) -> char {
    u32::try_from(d)
        .ok()
        .and_then(|d| char::from_digit(d, 10))
        .unwrap_or(RULER_FILL)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
