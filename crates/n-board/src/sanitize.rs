// SPDX-License-Identifier: MIT
//
// Sanitization — turning whatever a producer wrote into exactly one
// screen row.
//
// A board row must never wrap and never contain a line break: either
// would push every row below it down by one and break the cursor
// bookkeeping for the rest of the board's life. So a value is cut at its
// first line break, and anything longer than the configured width is
// truncated with an ellipsis.
//
// Lengths are counted in grapheme clusters, so a combining accent is
// never split from its base letter. No display-width computation is
// done: a wide CJK character counts as one, and ANSI escape bytes in a
// pre-colored value count like ordinary characters.

use std::borrow::Cow;
use std::fmt::{Display, Write as _};

use unicode_segmentation::UnicodeSegmentation;

/// Default maximum number of characters shown per row.
pub const DEFAULT_MAX_CHARS: usize = 150;

/// Marker appended to truncated rows.
pub const ELLIPSIS: &str = "...";

/// Smallest width that still leaves room for one character and the ellipsis.
const MIN_MAX_CHARS: usize = ELLIPSIS.len() + 1;

/// Cuts values down to a single row of at most `max_chars` characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sanitizer {
    max_chars: usize,
}

impl Sanitizer {
    /// A sanitizer for rows of at most `max_chars` characters.
    ///
    /// Zero selects [`DEFAULT_MAX_CHARS`]; other values below 4 are raised
    /// to 4 so a truncated row always keeps at least one character.
    #[must_use]
    pub const fn new(max_chars: usize) -> Self {
        let max_chars = if max_chars == 0 {
            DEFAULT_MAX_CHARS
        } else if max_chars < MIN_MAX_CHARS {
            MIN_MAX_CHARS
        } else {
            max_chars
        };
        Self { max_chars }
    }

    #[inline]
    #[must_use]
    pub const fn max_chars(self) -> usize {
        self.max_chars
    }

    /// Sanitize `raw` for display.
    ///
    /// Borrows when nothing had to change, which is the common case.
    #[must_use]
    pub fn apply(self, raw: &str) -> Cow<'_, str> {
        let first = raw.split_once('\n').map_or(raw, |(line, _)| line);
        let first = first.strip_suffix('\r').unwrap_or(first);

        if first.grapheme_indices(true).nth(self.max_chars).is_none() {
            return Cow::Borrowed(first);
        }

        let keep = self.max_chars - ELLIPSIS.len();
        let cut = first
            .grapheme_indices(true)
            .nth(keep)
            .map_or(first.len(), |(at, _)| at);
        let mut truncated = String::with_capacity(cut + ELLIPSIS.len());
        truncated.push_str(&first[..cut]);
        truncated.push_str(ELLIPSIS);
        Cow::Owned(truncated)
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHARS)
    }
}

/// Join displayable parts in order into one value.
///
/// Lets producers hand over pre-colored fragments:
///
/// ```
/// use n_board::sanitize::concat;
///
/// let row = concat(["\x1b[32m", "ok", "\x1b[0m", " 12 files"]);
/// assert_eq!(row, "\x1b[32mok\x1b[0m 12 files");
/// ```
pub fn concat<I>(parts: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let mut joined = String::new();
    for part in parts {
        let _ = write!(joined, "{part}");
    }
    joined
}

/// Display a value, or nothing for `None`.
pub fn display_or_empty<T: Display>(value: Option<T>) -> String {
    value.map_or_else(String::new, |v| v.to_string())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Line breaks ─────────────────────────────────────────────────────

    #[test]
    fn keeps_first_line_only() {
        let s = Sanitizer::default();
        assert_eq!(s.apply("line one\nline two"), "line one");
    }

    #[test]
    fn drops_carriage_return_before_break() {
        let s = Sanitizer::default();
        assert_eq!(s.apply("windows\r\nnext"), "windows");
    }

    #[test]
    fn leading_break_yields_empty() {
        let s = Sanitizer::default();
        assert_eq!(s.apply("\nhidden"), "");
    }

    #[test]
    fn untouched_values_are_borrowed() {
        let s = Sanitizer::default();
        assert!(matches!(s.apply("plain"), Cow::Borrowed("plain")));
        assert!(matches!(s.apply(""), Cow::Borrowed("")));
    }

    // ── Truncation ──────────────────────────────────────────────────────

    #[test]
    fn long_value_truncates_to_exact_width() {
        let s = Sanitizer::new(150);
        let raw = "x".repeat(200);
        let out = s.apply(&raw);
        assert_eq!(out.len(), 150);
        assert!(out.ends_with(ELLIPSIS));
        assert_eq!(&out[..147], &raw[..147]);
    }

    #[test]
    fn value_at_width_is_untouched() {
        let s = Sanitizer::new(10);
        assert_eq!(s.apply("0123456789"), "0123456789");
        assert_eq!(s.apply("0123456789a"), "0123456...");
    }

    #[test]
    fn truncation_happens_after_line_cut() {
        let s = Sanitizer::new(10);
        assert_eq!(s.apply("short\n0123456789abcdef"), "short");
    }

    #[test]
    fn counts_graphemes_not_bytes() {
        let s = Sanitizer::new(5);
        // "é" as e + combining acute: two chars, one grapheme.
        let raw = "e\u{301}e\u{301}e\u{301}e\u{301}e\u{301}";
        assert_eq!(s.apply(raw), raw);
        let longer = format!("{raw}e\u{301}");
        assert_eq!(s.apply(&longer), "e\u{301}e\u{301}...");
    }

    #[test]
    fn multibyte_truncation_stays_on_boundaries() {
        let s = Sanitizer::new(4);
        assert_eq!(s.apply("日本語のテキスト"), "日...");
    }

    // ── Width clamping ──────────────────────────────────────────────────

    #[test]
    fn zero_means_default() {
        assert_eq!(Sanitizer::new(0).max_chars(), DEFAULT_MAX_CHARS);
    }

    #[test]
    fn tiny_widths_are_raised() {
        assert_eq!(Sanitizer::new(1).max_chars(), 4);
        assert_eq!(Sanitizer::new(2).apply("abcdef"), "a...");
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    #[test]
    fn concat_joins_in_order() {
        assert_eq!(concat(["a", "b", "c"]), "abc");
        assert_eq!(concat([1, 2, 3]), "123");
        assert_eq!(concat(Vec::<String>::new()), "");
    }

    #[test]
    fn display_or_empty_maps_none() {
        assert_eq!(display_or_empty(None::<u32>), "");
        assert_eq!(display_or_empty(Some(42)), "42");
    }
}
