// SPDX-License-Identifier: MIT

//! Identifier-tagged status messages: `<identifier>-><payload>`.
//!
//! Producers that do not know their row index tag each status line with
//! their identifier instead. The board splits the tag off, looks the
//! identifier up, and shows only the payload.

/// Separates the identifier from the payload.
pub const SEPARATOR: &str = "->";

/// Split a tagged message into `(identifier, payload)`.
///
/// The split happens at the first [`SEPARATOR`]. Trailing whitespace is
/// trimmed from the identifier and leading whitespace from the payload,
/// so `"worker-3 -> done"` yields `("worker-3", "done")`. Messages
/// without a separator are untagged and yield `None`.
#[must_use]
pub fn parse_tagged(message: &str) -> Option<(&str, &str)> {
    message
        .split_once(SEPARATOR)
        .map(|(id, payload)| (id.trim_end(), payload.trim_start()))
}

/// Format a tagged message.
#[must_use]
pub fn tag(identifier: &str, payload: &str) -> String {
    format!("{identifier}{SEPARATOR}{payload}")
}
