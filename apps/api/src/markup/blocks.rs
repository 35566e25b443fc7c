//! Typed content blocks and line classification.
//!
//! Raw editor text is scanned line by line: `# ` marks a title, `> ` marks a
//! quote, every other non-blank line is a paragraph. Blank lines never become
//! blocks. The block stream is regenerated from scratch whenever the raw text
//! changes; blocks themselves are immutable.

use serde::{Deserialize, Serialize};

/// Line-leading marker for a title block. The space is part of the marker:
/// `#hashtag` stays a paragraph.
pub const TITLE_MARKER: &str = "# ";
/// Line-leading marker for a quote block.
pub const QUOTE_MARKER: &str = "> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Paragraph,
    Title,
    Quote,
}

/// One classified unit of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub text: String,
}

/// Scans canonical text into the typed block stream.
pub fn classify_blocks(text: &str) -> Vec<ContentBlock> {
    text.lines()
        .filter_map(|line| {
            if line.trim().is_empty() {
                None
            } else if let Some(rest) = line.strip_prefix(TITLE_MARKER) {
                Some(ContentBlock {
                    kind: BlockKind::Title,
                    text: rest.trim().to_string(),
                })
            } else if let Some(rest) = line.strip_prefix(QUOTE_MARKER) {
                Some(ContentBlock {
                    kind: BlockKind::Quote,
                    text: rest.trim().to_string(),
                })
            } else {
                Some(ContentBlock {
                    kind: BlockKind::Paragraph,
                    text: line.trim().to_string(),
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_title_quote_paragraph() {
        let blocks = classify_blocks("# 标题\n> 引用\n正文");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].kind, BlockKind::Title);
        assert_eq!(blocks[0].text, "标题");
        assert_eq!(blocks[1].kind, BlockKind::Quote);
        assert_eq!(blocks[1].text, "引用");
        assert_eq!(blocks[2].kind, BlockKind::Paragraph);
        assert_eq!(blocks[2].text, "正文");
    }

    #[test]
    fn test_marker_without_space_stays_paragraph() {
        let blocks = classify_blocks("#标签\n>引文");
        assert_eq!(blocks[0].kind, BlockKind::Paragraph);
        assert_eq!(blocks[0].text, "#标签");
        assert_eq!(blocks[1].kind, BlockKind::Paragraph);
    }

    #[test]
    fn test_blank_lines_never_become_blocks() {
        let blocks = classify_blocks("一\n\n   \n二\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text, "一");
        assert_eq!(blocks[1].text, "二");
    }

    #[test]
    fn test_extra_marker_whitespace_is_trimmed() {
        let blocks = classify_blocks("#   宽标题  ");
        assert_eq!(blocks[0].kind, BlockKind::Title);
        assert_eq!(blocks[0].text, "宽标题");
    }

    #[test]
    fn test_empty_input_yields_no_blocks() {
        assert!(classify_blocks("").is_empty());
        assert!(classify_blocks("\n\n").is_empty());
    }
}
