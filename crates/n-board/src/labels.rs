// SPDX-License-Identifier: MIT
//
// Row labels — what each row shows before its content.
//
// Either caller-supplied names (right-justified to the longest one, so
// the content column lines up) or the row index, zero-padded to the digit
// count of the last index. The width is fixed when the board is built:
// rows appended later reuse it, and rows past the end of a custom label
// list fall back to their index.

/// Label source and column width for a board's rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLabels {
    custom: Option<Vec<String>>,
    width: usize,
}

impl RowLabels {
    /// Zero-padded numeric labels for a board of `slot_count` rows.
    #[must_use]
    pub fn numeric(slot_count: usize) -> Self {
        Self {
            custom: None,
            width: digit_count(slot_count.saturating_sub(1)),
        }
    }

    /// Caller-supplied labels, right-justified to the longest one.
    #[must_use]
    pub fn custom(labels: Vec<String>) -> Self {
        let width = labels
            .iter()
            .map(|label| label.chars().count())
            .max()
            .unwrap_or(0);
        Self {
            custom: Some(labels),
            width,
        }
    }

    /// Column width of every label, in characters.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// The label text for row `index`, padded to [`width`](Self::width).
    #[must_use]
    pub fn label(&self, index: usize) -> String {
        let width = self.width;
        match self.custom.as_ref().and_then(|labels| labels.get(index)) {
            Some(label) => format!("{label:>width$}"),
            None => format!("{index:0width$}"),
        }
    }
}

/// Number of decimal digits in `n` (at least one).
fn digit_count(mut n: usize) -> usize {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Numeric ─────────────────────────────────────────────────────────

    #[test]
    fn numeric_width_follows_last_index() {
        assert_eq!(RowLabels::numeric(1).width(), 1);
        assert_eq!(RowLabels::numeric(10).width(), 1);
        assert_eq!(RowLabels::numeric(11).width(), 2);
        assert_eq!(RowLabels::numeric(101).width(), 3);
    }

    #[test]
    fn numeric_labels_are_zero_padded() {
        let labels = RowLabels::numeric(15);
        assert_eq!(labels.label(0), "00");
        assert_eq!(labels.label(7), "07");
        assert_eq!(labels.label(14), "14");
    }

    #[test]
    fn numeric_labels_grow_past_width() {
        let labels = RowLabels::numeric(3);
        assert_eq!(labels.label(12), "12");
    }

    #[test]
    fn empty_board_has_width_one() {
        assert_eq!(RowLabels::numeric(0).width(), 1);
    }

    // ── Custom ──────────────────────────────────────────────────────────

    #[test]
    fn custom_labels_are_right_justified() {
        let labels = RowLabels::custom(vec!["Ana".into(), "Bartholomew".into()]);
        assert_eq!(labels.width(), 11);
        assert_eq!(labels.label(0), "        Ana");
        assert_eq!(labels.label(1), "Bartholomew");
    }

    #[test]
    fn custom_width_counts_chars() {
        let labels = RowLabels::custom(vec!["José".into(), "Al".into()]);
        assert_eq!(labels.width(), 4);
        assert_eq!(labels.label(1), "  Al");
    }

    #[test]
    fn custom_falls_back_to_index_past_end() {
        let labels = RowLabels::custom(vec!["first".into()]);
        assert_eq!(labels.label(1), "00001");
    }

    #[test]
    fn digit_count_boundaries() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(99), 2);
        assert_eq!(digit_count(100), 3);
    }
}
