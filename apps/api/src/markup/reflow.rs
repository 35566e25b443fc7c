//! Sentence-boundary reflow.
//!
//! Inserts a line break after terminal punctuation (and any closing quotes or
//! brackets trailing it) so each sentence lands on its own card line. The text
//! is first split into plain/highlighted runs; reflow only touches plain runs,
//! and a break that would separate punctuation from an immediately following
//! `==` opener is deferred until after that highlighted run.

use crate::markup::highlight::{split_runs, Run, HIGHLIGHT_TOKEN, TERMINAL_PUNCTUATION};

/// Closing quotation and bracket characters that stay attached to the
/// sentence they close.
pub const CLOSING_CHARS: &[char] = &[
    '”', '’', '"', '\'', '」', '』', '）', ')', '】', ']', '》', '〉',
];

/// Reflows `text` so every sentence ends a line. Idempotent: already-broken
/// text comes back unchanged.
pub fn reflow_sentences(text: &str) -> String {
    let runs = split_runs(text);
    let mut out = String::with_capacity(text.len() + 16);
    let mut pending_break = false;

    for (i, run) in runs.iter().enumerate() {
        if run.highlighted {
            out.push_str(HIGHLIGHT_TOKEN);
            out.push_str(run.text);
            out.push_str(HIGHLIGHT_TOKEN);
            if pending_break {
                pending_break = false;
                if has_more_text(&runs, i) && !next_starts_with_newline(&runs, i) {
                    out.push('\n');
                }
            }
            continue;
        }
        if pending_break {
            pending_break = false;
            if !run.text.starts_with('\n') {
                out.push('\n');
            }
        }
        reflow_plain_run(run.text, &mut out, next_is_highlight(&runs, i), &mut pending_break);
    }
    out
}

fn reflow_plain_run(
    text: &str,
    out: &mut String,
    next_is_highlight: bool,
    pending_break: &mut bool,
) {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        out.push(c);
        i += 1;
        if !TERMINAL_PUNCTUATION.contains(&c) {
            continue;
        }
        // A dot between two digits is a decimal point, not a sentence end.
        if c == '.'
            && i >= 2
            && chars[i - 2].is_ascii_digit()
            && i < chars.len()
            && chars[i].is_ascii_digit()
        {
            continue;
        }
        while i < chars.len() && CLOSING_CHARS.contains(&chars[i]) {
            out.push(chars[i]);
            i += 1;
        }
        if i < chars.len() {
            // Break inside the run, unless one already exists or the
            // punctuation run continues (e.g. "！！？").
            if chars[i] != '\n' && !TERMINAL_PUNCTUATION.contains(&chars[i]) {
                out.push('\n');
                while i < chars.len() && (chars[i] == ' ' || chars[i] == '　') {
                    i += 1;
                }
            }
        } else if next_is_highlight {
            // The `==` opener abuts the punctuation; defer the break until
            // after the highlighted run.
            *pending_break = true;
        }
    }
}

fn next_is_highlight(runs: &[Run<'_>], i: usize) -> bool {
    runs.get(i + 1).is_some_and(|r| r.highlighted)
}

fn next_starts_with_newline(runs: &[Run<'_>], i: usize) -> bool {
    runs.get(i + 1).is_some_and(|r| r.text.starts_with('\n'))
}

fn has_more_text(runs: &[Run<'_>], i: usize) -> bool {
    runs[i + 1..].iter().any(|r| r.highlighted || !r.text.is_empty())
}
