//! Markup normalization — canonical block stream for the card renderer.
//!
//! Marker conventions: `# ` title line, `> ` quote line, `==…==` inline
//! highlight. Raw editor text goes through a fixed transform pipeline
//! (balance → optional reflow → split multi-line spans → demote excess
//! quotes → prune short spans → auto-highlight) and is then classified
//! line-by-line into typed blocks. Every transform is fingerprint-preserving:
//! stripping markers and whitespace from the output yields exactly the
//! characters of the input.

pub mod blocks;
pub mod handlers;
pub mod highlight;
pub mod integrity;
pub mod reflow;

pub use blocks::{classify_blocks, BlockKind, ContentBlock};

/// Canonicalizes raw editor text. `apply_reflow` additionally breaks lines at
/// sentence boundaries before the span transforms run.
pub fn canonicalize(text: &str, apply_reflow: bool) -> String {
    let balanced = highlight::balance_tokens(text);
    let flowed = if apply_reflow {
        reflow::reflow_sentences(&balanced)
    } else {
        balanced
    };
    let split = highlight::split_multiline_spans(&flowed);
    let demoted = highlight::demote_excess_quotes(&split);
    let pruned = highlight::prune_short_spans(&demoted);
    highlight::auto_highlight(&pruned)
}

/// Canonical text plus its typed block stream.
pub fn normalize(text: &str, apply_reflow: bool) -> (String, Vec<ContentBlock>) {
    let canonical = canonicalize(text, apply_reflow);
    let blocks = classify_blocks(&canonical);
    (canonical, blocks)
}
