// SPDX-License-Identifier: MIT

//! Board options — how many rows, how they are addressed, how they look.
//!
//! | Option              | Default                 |
//! |---------------------|-------------------------|
//! | source              | none (required)         |
//! | identifiers         | none                    |
//! | row labels          | none (numeric index)    |
//! | header              | ruler                   |
//! | `show_labels`       | true                    |
//! | `show_header`       | false                   |
//! | `max_chars`         | 150                     |
//! | `use_color`         | true                    |
//! | `announce_deferred` | true                    |
//!
//! Exactly one row source is required: explicit content, a row count, or
//! an identifier list (which yields one empty row per identifier).
//! Identifiers may also be attached to explicit content, in which case
//! the two lists must have the same length.

use std::collections::HashMap;

use crate::error::BoardError;
use crate::header::Header;
use crate::sanitize::DEFAULT_MAX_CHARS;

/// Where the board's initial rows come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotSource {
    /// Explicit initial content, one entry per row.
    Content(Vec<String>),
    /// A number of initially empty rows.
    Size(usize),
    /// One initially empty row per identifier.
    Identifiers(Vec<String>),
}

/// Construction options for a [`LineBoard`](crate::LineBoard).
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)] // Each flag is an independent display switch.
pub struct BoardOptions {
    pub source: Option<SlotSource>,
    pub identifiers: Option<Vec<String>>,
    pub row_labels: Option<Vec<String>>,
    pub header: Header,
    pub show_labels: bool,
    pub show_header: bool,
    pub max_chars: usize,
    pub use_color: bool,
    /// Print a one-line notice when the sink is not a terminal, since
    /// nothing else will appear until the board is released.
    pub announce_deferred: bool,
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            source: None,
            identifiers: None,
            row_labels: None,
            header: Header::default(),
            show_labels: true,
            show_header: false,
            max_chars: DEFAULT_MAX_CHARS,
            use_color: true,
            announce_deferred: true,
        }
    }
}

impl BoardOptions {
    /// Rows initialized from explicit content.
    #[must_use]
    pub fn content<I, T>(lines: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            source: Some(SlotSource::Content(
                lines.into_iter().map(Into::into).collect(),
            )),
            ..Self::default()
        }
    }

    /// `count` initially empty rows.
    #[must_use]
    pub fn size(count: usize) -> Self {
        Self {
            source: Some(SlotSource::Size(count)),
            ..Self::default()
        }
    }

    /// One initially empty row per identifier.
    #[must_use]
    pub fn identifiers<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            source: Some(SlotSource::Identifiers(
                ids.into_iter().map(Into::into).collect(),
            )),
            ..Self::default()
        }
    }

    /// Attach identifiers to rows given by another source.
    #[must_use]
    pub fn with_identifiers<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.identifiers = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Show these labels instead of row indices.
    #[must_use]
    pub fn with_row_labels<I, T>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.row_labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Use custom header content. Only shown with [`show_header`](Self::show_header).
    #[must_use]
    pub fn with_header(mut self, header: impl Into<Header>) -> Self {
        self.header = header.into();
        self
    }

    #[must_use]
    pub const fn show_labels(mut self, show: bool) -> Self {
        self.show_labels = show;
        self
    }

    #[must_use]
    pub const fn show_header(mut self, show: bool) -> Self {
        self.show_header = show;
        self
    }

    /// Maximum characters per row; `0` selects the default of 150.
    #[must_use]
    pub const fn max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    #[must_use]
    pub const fn use_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    #[must_use]
    pub const fn announce_deferred(mut self, announce: bool) -> Self {
        self.announce_deferred = announce;
        self
    }
}

// ─── Resolution ─────────────────────────────────────────────────────────────

/// Rows and identifiers after validation.
#[derive(Debug)]
pub(crate) struct Layout {
    pub slots: Vec<String>,
    pub lookup: Option<HashMap<String, usize>>,
    pub row_labels: Option<Vec<String>>,
}

impl Layout {
    /// Validate the row source, identifiers, and labels of `options`.
    ///
    /// An empty content list or a count of zero counts as no source.
    pub(crate) fn resolve(options: &BoardOptions) -> Result<Self, BoardError> {
        let (slots, source_ids) = match &options.source {
            Some(SlotSource::Content(lines)) if !lines.is_empty() => (lines.clone(), None),
            Some(SlotSource::Size(count)) if *count > 0 => (vec![String::new(); *count], None),
            Some(SlotSource::Identifiers(ids)) if !ids.is_empty() => {
                (vec![String::new(); ids.len()], Some(ids))
            }
            _ => return Err(BoardError::MissingSource),
        };

        let ids = options
            .identifiers
            .as_ref()
            .filter(|ids| !ids.is_empty())
            .or(source_ids);
        let lookup = ids.map(|ids| index_identifiers(ids, slots.len())).transpose()?;

        if let Some(labels) = &options.row_labels {
            if labels.len() != slots.len() {
                return Err(BoardError::LabelCountMismatch {
                    labels: labels.len(),
                    slots: slots.len(),
                });
            }
        }

        Ok(Self {
            slots,
            lookup,
            row_labels: options.row_labels.clone(),
        })
    }
}

/// Map each identifier to its row, rejecting duplicates and length mismatches.
fn index_identifiers(ids: &[String], slot_count: usize) -> Result<HashMap<String, usize>, BoardError> {
    let mut lookup = HashMap::with_capacity(ids.len());
    for (index, id) in ids.iter().enumerate() {
        if lookup.insert(id.clone(), index).is_some() {
            return Err(BoardError::DuplicateIdentifier(id.clone()));
        }
    }
    if ids.len() != slot_count {
        return Err(BoardError::IdentifierCountMismatch {
            identifiers: ids.len(),
            slots: slot_count,
        });
    }
    Ok(lookup)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn resolve(options: &BoardOptions) -> Result<Layout, BoardError> {
        Layout::resolve(options)
    }

    // ── Defaults ────────────────────────────────────────────────────────

    #[test]
    fn defaults() {
        let o = BoardOptions::default();
        assert!(o.source.is_none());
        assert!(o.show_labels);
        assert!(!o.show_header);
        assert_eq!(o.max_chars, 150);
        assert!(o.use_color);
        assert!(o.announce_deferred);
        assert_eq!(o.header, Header::Ruler);
    }

    #[test]
    fn builders_chain() {
        let o = BoardOptions::size(3)
            .show_labels(false)
            .show_header(true)
            .max_chars(80)
            .use_color(false)
            .announce_deferred(false)
            .with_header("a b c");
        assert!(!o.show_labels);
        assert!(o.show_header);
        assert_eq!(o.max_chars, 80);
        assert!(!o.use_color);
        assert!(!o.announce_deferred);
        assert_eq!(o.header, Header::Line("a b c".into()));
    }

    // ── Sources ─────────────────────────────────────────────────────────

    #[test]
    fn missing_source_is_rejected() {
        let err = resolve(&BoardOptions::default()).unwrap_err();
        assert!(matches!(err, BoardError::MissingSource));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn empty_sources_count_as_missing() {
        assert!(matches!(
            resolve(&BoardOptions::size(0)),
            Err(BoardError::MissingSource)
        ));
        assert!(matches!(
            resolve(&BoardOptions::content(Vec::<String>::new())),
            Err(BoardError::MissingSource)
        ));
        assert!(matches!(
            resolve(&BoardOptions::identifiers(Vec::<String>::new())),
            Err(BoardError::MissingSource)
        ));
    }

    #[test]
    fn size_yields_empty_rows() {
        let layout = resolve(&BoardOptions::size(4)).unwrap();
        assert_eq!(layout.slots, vec![""; 4]);
        assert!(layout.lookup.is_none());
    }

    #[test]
    fn content_is_kept() {
        let layout = resolve(&BoardOptions::content(["a", "b"])).unwrap();
        assert_eq!(layout.slots, vec!["a", "b"]);
    }

    #[test]
    fn identifiers_yield_rows_and_lookup() {
        let layout = resolve(&BoardOptions::identifiers(["a", "b", "c"])).unwrap();
        assert_eq!(layout.slots.len(), 3);
        let lookup = layout.lookup.unwrap();
        assert_eq!(lookup["a"], 0);
        assert_eq!(lookup["c"], 2);
    }

    // ── Identifiers ─────────────────────────────────────────────────────

    #[test]
    fn duplicate_identifiers_are_rejected() {
        let err = resolve(&BoardOptions::identifiers(["x", "x"])).unwrap_err();
        assert!(matches!(err, BoardError::DuplicateIdentifier(ref id) if id == "x"));
    }

    #[test]
    fn identifier_count_must_match_content() {
        let options = BoardOptions::content(["a", "b"]).with_identifiers(["x", "y", "z"]);
        let err = resolve(&options).unwrap_err();
        assert!(matches!(
            err,
            BoardError::IdentifierCountMismatch {
                identifiers: 3,
                slots: 2
            }
        ));
    }

    #[test]
    fn identifiers_attach_to_content() {
        let options = BoardOptions::content(["a", "b"]).with_identifiers(["x", "y"]);
        let layout = resolve(&options).unwrap();
        assert_eq!(layout.lookup.unwrap()["y"], 1);
    }

    // ── Labels ──────────────────────────────────────────────────────────

    #[test]
    fn label_count_must_match() {
        let options = BoardOptions::size(3).with_row_labels(["one", "two"]);
        let err = resolve(&options).unwrap_err();
        assert!(matches!(
            err,
            BoardError::LabelCountMismatch { labels: 2, slots: 3 }
        ));
    }

    #[test]
    fn labels_are_carried() {
        let options = BoardOptions::size(2).with_row_labels(["one", "two"]);
        let layout = resolve(&options).unwrap();
        assert_eq!(layout.row_labels.unwrap(), vec!["one", "two"]);
    }
}
