//! Inline highlight (`==…==`) span maintenance.
//!
//! The renderer parses highlights per line and paints them as a background
//! tint, so every transform here keeps two invariants: the token count stays
//! even, and no span crosses a line boundary.

use crate::markup::blocks::{QUOTE_MARKER, TITLE_MARKER};

/// The paired highlight delimiter.
pub const HIGHLIGHT_TOKEN: &str = "==";

/// Terminal sentence punctuation, full-width and half-width.
pub const TERMINAL_PUNCTUATION: &[char] = &['。', '！', '？', '；', '…', '.', '!', '?', ';'];

/// A document gets promoted highlights until it carries this many spans.
const AUTO_HIGHLIGHT_TARGET: usize = 4;
/// Trimmed length bounds for an auto-highlight candidate line.
const AUTO_HIGHLIGHT_MIN_CHARS: usize = 8;
const AUTO_HIGHLIGHT_MAX_CHARS: usize = 30;

/// Emotional-appeal keywords that make a line worth highlighting.
const EMOTIONAL_KEYWORDS: &[&str] = &[
    "终于", "原来", "没想到", "突然", "竟然", "其实", "真的", "最", "从来",
    "梦想", "坚持", "放弃", "热爱", "遗憾", "惊喜", "治愈", "感动", "值得",
    "amazing", "finally", "never", "always", "love", "dream", "grateful",
];

/// First-person intent phrases (matched against the lowercased line).
const FIRST_PERSON_PATTERNS: &[&str] = &[
    "我想", "我要", "我希望", "我打算", "我决定", "我相信",
    "i want to", "i will", "i hope to", "i plan to", "i decided to",
];

// ────────────────────────────────────────────────────────────────────────────
// Run scanning
// ────────────────────────────────────────────────────────────────────────────

/// A run of text either inside or outside a highlight span. Delimiter tokens
/// themselves belong to no run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run<'a> {
    pub highlighted: bool,
    pub text: &'a str,
}

/// Splits balanced text into alternating plain/highlighted runs. Empty plain
/// runs are dropped; empty highlighted runs are kept so `==…==` pairs survive
/// a round trip through [`join_runs`].
pub fn split_runs(text: &str) -> Vec<Run<'_>> {
    let mut runs = Vec::new();
    let mut highlighted = false;
    for part in text.split(HIGHLIGHT_TOKEN) {
        if !part.is_empty() || highlighted {
            runs.push(Run { highlighted, text: part });
        }
        highlighted = !highlighted;
    }
    runs
}

/// Rebuilds text from runs, re-wrapping highlighted runs in tokens.
pub fn join_runs(runs: &[Run<'_>]) -> String {
    let mut out = String::new();
    for run in runs {
        if run.highlighted {
            out.push_str(HIGHLIGHT_TOKEN);
            out.push_str(run.text);
            out.push_str(HIGHLIGHT_TOKEN);
        } else {
            out.push_str(run.text);
        }
    }
    out
}

/// Number of `==` tokens in the text (non-overlapping).
pub fn token_count(text: &str) -> usize {
    text.matches(HIGHLIGHT_TOKEN).count()
}

/// Number of complete highlight spans.
pub fn span_count(text: &str) -> usize {
    token_count(text) / 2
}

// ────────────────────────────────────────────────────────────────────────────
// Transforms
// ────────────────────────────────────────────────────────────────────────────

/// Drops the final unmatched token when the total count is odd. Earlier,
/// already-balanced pairs are never touched.
pub fn balance_tokens(text: &str) -> String {
    let indices: Vec<usize> = text
        .match_indices(HIGHLIGHT_TOKEN)
        .map(|(i, _)| i)
        .collect();
    if indices.len() % 2 == 0 {
        return text.to_string();
    }
    let last = indices[indices.len() - 1];
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..last]);
    out.push_str(&text[last + HIGHLIGHT_TOKEN.len()..]);
    out
}

/// Splits a highlighted span containing newlines into one span per non-empty
/// line. A span crossing a line boundary would never close in the renderer.
pub fn split_multiline_spans(text: &str) -> String {
    let runs = split_runs(text);
    let mut out = String::with_capacity(text.len() + 8);
    for run in &runs {
        if run.highlighted && run.text.contains('\n') {
            let spans: Vec<String> = run
                .text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| format!("{HIGHLIGHT_TOKEN}{line}{HIGHLIGHT_TOKEN}"))
                .collect();
            out.push_str(&spans.join("\n"));
        } else if run.highlighted {
            out.push_str(HIGHLIGHT_TOKEN);
            out.push_str(run.text);
            out.push_str(HIGHLIGHT_TOKEN);
        } else {
            out.push_str(run.text);
        }
    }
    out
}

/// Keeps only the first quote line as a quote; every later `> ` line becomes
/// a highlighted paragraph. Inner tokens are stripped first so the new
/// whole-line span stays balanced.
pub fn demote_excess_quotes(text: &str) -> String {
    let mut seen_quote = false;
    let lines: Vec<String> = text
        .lines()
        .map(|line| {
            let Some(rest) = line.strip_prefix(QUOTE_MARKER) else {
                return line.to_string();
            };
            if !seen_quote {
                seen_quote = true;
                return line.to_string();
            }
            let inner = rest.replace(HIGHLIGHT_TOKEN, "");
            let inner = inner.trim();
            if inner.is_empty() {
                String::new()
            } else {
                format!("{HIGHLIGHT_TOKEN}{inner}{HIGHLIGHT_TOKEN}")
            }
        })
        .collect();
    lines.join("\n")
}

/// Demotes highlight spans of three or fewer characters (after trim) back to
/// plain text. Highlights that short read as noise, not emphasis.
pub fn prune_short_spans(text: &str) -> String {
    let mut runs = split_runs(text);
    for run in &mut runs {
        if run.highlighted && run.text.trim().chars().count() <= 3 {
            run.highlighted = false;
        }
    }
    join_runs(&runs)
}

/// Promotes qualifying paragraph lines to full-line highlights until the
/// document carries four spans. Candidates are taken in document order.
pub fn auto_highlight(text: &str) -> String {
    let existing = span_count(text);
    if existing >= AUTO_HIGHLIGHT_TARGET {
        return text.to_string();
    }
    let mut budget = AUTO_HIGHLIGHT_TARGET - existing;
    let lines: Vec<String> = text
        .lines()
        .map(|line| {
            if budget == 0 || !is_highlight_candidate(line) {
                return line.to_string();
            }
            budget -= 1;
            let trimmed = line.trim();
            format!("{HIGHLIGHT_TOKEN}{trimmed}{HIGHLIGHT_TOKEN}")
        })
        .collect();
    lines.join("\n")
}

/// A candidate is a plain paragraph line with no existing span, ending in
/// terminal punctuation, 8–30 chars after trim, carrying an emotional keyword
/// or a first-person intent phrase.
fn is_highlight_candidate(line: &str) -> bool {
    if line.starts_with(TITLE_MARKER) || line.starts_with(QUOTE_MARKER) {
        return false;
    }
    let trimmed = line.trim();
    if trimmed.contains(HIGHLIGHT_TOKEN) {
        return false;
    }
    let len = trimmed.chars().count();
    if !(AUTO_HIGHLIGHT_MIN_CHARS..=AUTO_HIGHLIGHT_MAX_CHARS).contains(&len) {
        return false;
    }
    let Some(last) = trimmed.chars().last() else {
        return false;
    };
    if !TERMINAL_PUNCTUATION.contains(&last) {
        return false;
    }
    let lower = trimmed.to_lowercase();
    EMOTIONAL_KEYWORDS.iter().any(|kw| lower.contains(kw))
        || FIRST_PERSON_PATTERNS.iter().any(|pat| lower.contains(pat))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_leaves_even_counts_alone() {
        let text = "前 ==重点== 后";
        assert_eq!(balance_tokens(text), text);
    }

    #[test]
    fn test_balance_drops_only_the_trailing_token() {
        // Three tokens: the last one is unmatched and must be the one dropped.
        let balanced = balance_tokens("a ==b==c== d");
        assert_eq!(balanced, "a ==b==c d");
        assert_eq!(token_count(&balanced) % 2, 0);
        assert_eq!(span_count(&balanced), 1);
    }

    #[test]
    fn test_split_runs_round_trips() {
        let text = "a ==b== c ==d==";
        assert_eq!(join_runs(&split_runs(text)), text);
    }

    #[test]
    fn test_split_multiline_span_becomes_one_span_per_line() {
        assert_eq!(split_multiline_spans("==一\n二=="), "==一==\n==二==");
    }

    #[test]
    fn test_split_multiline_span_discards_blank_lines() {
        assert_eq!(split_multiline_spans("前==一\n\n   \n二==后"), "前==一==\n==二==后");
    }

    #[test]
    fn test_single_line_spans_pass_through_splitter() {
        let text = "前 ==重点== 后";
        assert_eq!(split_multiline_spans(text), text);
    }

    #[test]
    fn test_demote_keeps_first_quote_only() {
        let demoted = demote_excess_quotes("> 第一条引用\n正文\n> 第二条引用");
        assert_eq!(demoted, "> 第一条引用\n正文\n==第二条引用==");
    }

    #[test]
    fn test_demote_strips_inner_tokens_before_wrapping() {
        let demoted = demote_excess_quotes("> 甲\n> 乙 ==丙== 丁");
        assert_eq!(demoted, "> 甲\n==乙 丙 丁==");
        assert_eq!(token_count(&demoted) % 2, 0);
    }

    #[test]
    fn test_prune_demotes_short_spans() {
        assert_eq!(prune_short_spans("==短== 和 ==足够长的重点=="), "短 和 ==足够长的重点==");
    }

    #[test]
    fn test_prune_counts_trimmed_chars() {
        // Three chars once the padding is trimmed: still too short.
        assert_eq!(prune_short_spans("== 三个字 =="), " 三个字 ");
        // Four chars survive.
        assert_eq!(prune_short_spans("==四个字呀=="), "==四个字呀==");
    }

    #[test]
    fn test_prune_removes_empty_spans() {
        assert_eq!(prune_short_spans("a====b"), "ab");
    }

    #[test]
    fn test_auto_highlight_promotes_qualifying_lines() {
        let text = "我想去看海，一个人也可以。\n普通的一句话而已,没有结尾标点\n终于把这件事做完了！";
        let highlighted = auto_highlight(text);
        assert!(highlighted.contains("==我想去看海，一个人也可以。=="));
        assert!(highlighted.contains("==终于把这件事做完了！=="));
        assert!(highlighted.contains("普通的一句话而已,没有结尾标点"));
    }

    #[test]
    fn test_auto_highlight_respects_budget() {
        // Five qualifying lines, empty budget of four: the fifth stays plain.
        let line = "我决定再试一次这个方案。";
        let text = vec![line; 5].join("\n");
        let highlighted = auto_highlight(&text);
        assert_eq!(span_count(&highlighted), 4);
        assert!(highlighted.ends_with(line));
    }

    #[test]
    fn test_auto_highlight_counts_existing_spans() {
        let text = "==一个== ==两个== ==三个== ==四个==\n我想把这句也加亮试试看。";
        assert_eq!(auto_highlight(text), text);
    }

    #[test]
    fn test_auto_highlight_skips_titles_quotes_and_length_violations() {
        let text = "# 我想当标题的一句话呢。\n> 我想当引用的一句话呢。\n短我想。\n我真的真的真的真的真的真的真的真的真的真的真的想要这一句变得特别特别长。";
        assert_eq!(auto_highlight(text), text);
    }

    #[test]
    fn test_auto_highlight_requires_terminal_punctuation() {
        let text = "我想去看海一个人也可以";
        assert_eq!(auto_highlight(text), text);
    }

    #[test]
    fn test_auto_highlight_matches_english_intent() {
        let text = "I hope to ship this someday.";
        assert_eq!(auto_highlight(text), "==I hope to ship this someday.==");
    }
}
