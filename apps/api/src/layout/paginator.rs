//! Block-stream pagination.
//!
//! Walks the canonical block stream in order and closes a page whenever the
//! next block would push the measured height past the content budget. Pure
//! function of its inputs — every input change triggers a full recompute,
//! never an incremental patch.

use serde::Serialize;

use crate::layout::canvas::{content_width, max_content_height, CanvasRatio, CanvasTemplate};
use crate::layout::measure::{block_margin, block_style, hero_style, TextMeasurer};
use crate::markup::highlight::HIGHLIGHT_TOKEN;
use crate::markup::ContentBlock;

/// A maximal contiguous run of blocks fitting one canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageContent {
    pub blocks: Vec<ContentBlock>,
    pub page_index: usize,
}

/// Synthesized title treatment leading page 1 under the minimal template.
/// Carried alongside the page list, not inside the block stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeroBlock {
    pub text: String,
    pub height_px: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pagination {
    pub hero: Option<HeroBlock>,
    pub pages: Vec<PageContent>,
    pub max_content_height: f32,
}

/// Partitions `blocks` into pages for the given canvas configuration.
///
/// Overflow is tested with strict `>`: a page measuring exactly the budget
/// fits. A single block taller than the budget is emitted as its own page —
/// content is never dropped for being too tall.
pub fn paginate(
    blocks: &[ContentBlock],
    title: Option<&str>,
    ratio: CanvasRatio,
    template: CanvasTemplate,
    font_size: f32,
    measurer: &dyn TextMeasurer,
) -> Pagination {
    let max_height = max_content_height(ratio, template);
    let width = content_width(ratio);
    let margin = block_margin(font_size);

    let hero = match title.map(str::trim) {
        Some(t) if template == CanvasTemplate::Minimal && !t.is_empty() => {
            let height = measurer.block_height(t, &hero_style(font_size), width);
            Some(HeroBlock { text: t.to_string(), height_px: height })
        }
        _ => None,
    };

    let mut pages: Vec<PageContent> = Vec::new();
    let mut current: Vec<ContentBlock> = Vec::new();
    // The hero occupies the start of page 1; its height counts toward that
    // page's running total.
    let mut used = hero.as_ref().map_or(0.0, |h| h.height_px);

    for block in blocks {
        let style = block_style(block.kind, font_size);
        let visible = block.text.replace(HIGHLIGHT_TOKEN, "");
        let height = measurer.block_height(&visible, &style, width - 2.0 * style.width_inset);

        let occupied = used > 0.0 || !current.is_empty();
        let spacing = if occupied { margin } else { 0.0 };

        if occupied && used + spacing + height > max_height {
            if current.is_empty() {
                // Page 1 holds only the hero and even one block overflows it:
                // the block joins the hero page rather than being dropped.
                pages.push(PageContent {
                    blocks: vec![block.clone()],
                    page_index: pages.len(),
                });
            } else {
                pages.push(PageContent {
                    blocks: std::mem::take(&mut current),
                    page_index: pages.len(),
                });
                current.push(block.clone());
            }
            used = if current.is_empty() { 0.0 } else { height };
        } else if !occupied && height > max_height {
            // A lone block taller than the budget gets its own page.
            pages.push(PageContent {
                blocks: vec![block.clone()],
                page_index: pages.len(),
            });
            used = 0.0;
        } else {
            current.push(block.clone());
            used += spacing + height;
        }
    }

    if !current.is_empty() {
        pages.push(PageContent {
            blocks: current,
            page_index: pages.len(),
        });
    }
    if pages.is_empty() && hero.is_some() {
        // The hero alone still produces a page.
        pages.push(PageContent {
            blocks: Vec::new(),
            page_index: 0,
        });
    }

    Pagination {
        hero,
        pages,
        max_content_height: max_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::measure::CharMetricMeasurer;
    use crate::markup::{classify_blocks, BlockKind};

    fn make_blocks(lines: usize, chars_per_line: usize) -> Vec<ContentBlock> {
        let text = vec!["字".repeat(chars_per_line); lines].join("\n");
        classify_blocks(&text)
    }

    fn page_height(page: &PageContent, ratio: CanvasRatio, font_size: f32) -> f32 {
        let measurer = CharMetricMeasurer;
        let width = content_width(ratio);
        let margin = block_margin(font_size);
        let mut total = 0.0;
        for (i, block) in page.blocks.iter().enumerate() {
            let style = block_style(block.kind, font_size);
            let visible = block.text.replace(HIGHLIGHT_TOKEN, "");
            total += measurer.block_height(&visible, &style, width - 2.0 * style.width_inset);
            if i > 0 {
                total += margin;
            }
        }
        total
    }

    #[test]
    fn test_empty_input_yields_zero_pages() {
        let pagination = paginate(
            &[],
            None,
            CanvasRatio::Portrait,
            CanvasTemplate::Classic,
            36.0,
            &CharMetricMeasurer,
        );
        assert!(pagination.pages.is_empty());
        assert!(pagination.hero.is_none());
    }

    #[test]
    fn test_every_page_fits_the_budget() {
        let blocks = make_blocks(10, 30);
        let pagination = paginate(
            &blocks,
            None,
            CanvasRatio::Portrait,
            CanvasTemplate::Classic,
            36.0,
            &CharMetricMeasurer,
        );
        assert!(pagination.pages.len() > 1, "30-char lines at 36px should split");
        for page in &pagination.pages {
            if page.blocks.len() > 1 {
                let height = page_height(page, CanvasRatio::Portrait, 36.0);
                assert!(
                    height <= pagination.max_content_height,
                    "page {} measures {height}, budget {}",
                    page.page_index,
                    pagination.max_content_height
                );
            }
        }
    }

    #[test]
    fn test_coverage_no_block_skipped_duplicated_or_reordered() {
        let blocks = make_blocks(25, 20);
        let pagination = paginate(
            &blocks,
            None,
            CanvasRatio::Square,
            CanvasTemplate::Classic,
            40.0,
            &CharMetricMeasurer,
        );
        let rejoined: Vec<ContentBlock> = pagination
            .pages
            .iter()
            .flat_map(|p| p.blocks.iter().cloned())
            .collect();
        assert_eq!(rejoined, blocks);
        for (i, page) in pagination.pages.iter().enumerate() {
            assert_eq!(page.page_index, i);
        }
    }

    #[test]
    fn test_page_count_monotone_in_font_size() {
        let blocks = make_blocks(10, 30);
        let mut last_count = 0;
        for font_size in [24.0, 30.0, 36.0, 42.0, 48.0, 54.0, 60.0] {
            let pagination = paginate(
                &blocks,
                None,
                CanvasRatio::Portrait,
                CanvasTemplate::Classic,
                font_size,
                &CharMetricMeasurer,
            );
            assert!(
                pagination.pages.len() >= last_count,
                "page count dropped from {last_count} at font size {font_size}"
            );
            last_count = pagination.pages.len();
        }
        assert!(last_count > 1, "60px text should need more than one page");
    }

    #[test]
    fn test_repagination_is_idempotent() {
        let blocks = make_blocks(12, 25);
        let run = || {
            paginate(
                &blocks,
                Some("标题"),
                CanvasRatio::Standard,
                CanvasTemplate::Minimal,
                36.0,
                &CharMetricMeasurer,
            )
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_oversized_block_is_emitted_not_dropped() {
        let mut blocks = classify_blocks("短前文");
        blocks.push(ContentBlock {
            kind: BlockKind::Paragraph,
            text: "长".repeat(2000),
        });
        blocks.push(ContentBlock {
            kind: BlockKind::Paragraph,
            text: "短后文".to_string(),
        });
        let pagination = paginate(
            &blocks,
            None,
            CanvasRatio::Square,
            CanvasTemplate::Classic,
            48.0,
            &CharMetricMeasurer,
        );
        let rejoined: Vec<ContentBlock> = pagination
            .pages
            .iter()
            .flat_map(|p| p.blocks.iter().cloned())
            .collect();
        assert_eq!(rejoined, blocks);
        // The oversized block sits alone on its page.
        let oversized_page = pagination
            .pages
            .iter()
            .find(|p| p.blocks.iter().any(|b| b.text.chars().count() == 2000))
            .unwrap();
        assert_eq!(oversized_page.blocks.len(), 1);
    }

    #[test]
    fn test_minimal_template_synthesizes_hero_on_page_one() {
        let blocks = make_blocks(3, 10);
        let pagination = paginate(
            &blocks,
            Some("  长图标题  "),
            CanvasRatio::Portrait,
            CanvasTemplate::Minimal,
            36.0,
            &CharMetricMeasurer,
        );
        let hero = pagination.hero.expect("minimal + title must produce a hero");
        assert_eq!(hero.text, "长图标题");
        assert!(hero.height_px > 0.0);
    }

    #[test]
    fn test_hero_height_counts_toward_page_one() {
        let blocks = make_blocks(10, 30);
        let with_hero = paginate(
            &blocks,
            Some("占据版面的长图大标题"),
            CanvasRatio::Portrait,
            CanvasTemplate::Minimal,
            36.0,
            &CharMetricMeasurer,
        );
        let without_hero = paginate(
            &blocks,
            None,
            CanvasRatio::Portrait,
            CanvasTemplate::Minimal,
            36.0,
            &CharMetricMeasurer,
        );
        assert!(
            with_hero.pages[0].blocks.len() <= without_hero.pages[0].blocks.len(),
            "the hero must consume page-one budget"
        );
    }

    #[test]
    fn test_classic_template_never_gets_a_hero() {
        let pagination = paginate(
            &make_blocks(2, 10),
            Some("标题"),
            CanvasRatio::Portrait,
            CanvasTemplate::Classic,
            36.0,
            &CharMetricMeasurer,
        );
        assert!(pagination.hero.is_none());
    }

    #[test]
    fn test_hero_with_no_blocks_still_emits_one_page() {
        let pagination = paginate(
            &[],
            Some("只有标题"),
            CanvasRatio::Portrait,
            CanvasTemplate::Minimal,
            36.0,
            &CharMetricMeasurer,
        );
        assert!(pagination.hero.is_some());
        assert_eq!(pagination.pages.len(), 1);
        assert!(pagination.pages[0].blocks.is_empty());
    }

    #[test]
    fn test_exact_fit_is_not_overflow() {
        use crate::layout::measure::BlockStyle;
        struct FixedMeasurer(f32);
        impl TextMeasurer for FixedMeasurer {
            fn block_height(&self, _: &str, _: &BlockStyle, _: f32) -> f32 {
                self.0
            }
        }
        // Budget 1200 (3:4 classic); margin at 40px is 32. Two blocks of 584
        // plus one margin measure exactly 1200 and must share a page.
        let blocks = make_blocks(2, 5);
        let pagination = paginate(
            &blocks,
            None,
            CanvasRatio::Portrait,
            CanvasTemplate::Classic,
            40.0,
            &FixedMeasurer(584.0),
        );
        assert_eq!(pagination.pages.len(), 1);
        assert_eq!(pagination.pages[0].blocks.len(), 2);
    }
}
