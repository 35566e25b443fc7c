//! Content-integrity fingerprints for AI typeset suggestions.
//!
//! A suggestion may only move markers and line breaks around. Stripping the
//! three marker tokens and all whitespace from both sides must leave the exact
//! same character sequence, otherwise the suggestion rewrote content and is
//! rejected outright.

use crate::markup::highlight::HIGHLIGHT_TOKEN;

/// Marker- and whitespace-free character sequence of `text`.
pub fn fingerprint(text: &str) -> String {
    text.replace(HIGHLIGHT_TOKEN, "")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '#' && *c != '>')
        .collect()
}

/// True when `candidate` carries exactly the characters of `original`,
/// markers and whitespace aside.
pub fn content_matches(original: &str, candidate: &str) -> bool {
    fingerprint(original) == fingerprint(candidate)
}
