//! Text measurement for the paginator.
//!
//! The paginator needs rendered block heights under the renderer's typography
//! rules. The measurement backend is pluggable via [`TextMeasurer`] — a
//! headless browser or native shaper can stand in — and the default,
//! [`CharMetricMeasurer`], uses a static character-width table over the
//! renderer's sans stack: proportional ASCII widths, everything else (CJK
//! glyphs, full-width punctuation) at 1.0 em.

use crate::markup::BlockKind;

// ────────────────────────────────────────────────────────────────────────────
// Typography rules (shared by the measurer and the client render plan)
// ────────────────────────────────────────────────────────────────────────────

pub const LINE_HEIGHT: f32 = 1.6;
pub const TITLE_SCALE: f32 = 1.5;
pub const TITLE_LINE_HEIGHT: f32 = 1.4;
pub const HERO_SCALE: f32 = 2.0;
/// Extra vertical space around the hero treatment.
pub const HERO_PADDING_PX: f32 = 56.0;
/// Quote box vertical padding, per side.
pub const QUOTE_BOX_PADDING_PX: f32 = 24.0;
/// Quote box horizontal inset, per side.
pub const QUOTE_INSET_PX: f32 = 32.0;
/// Margin between adjacent blocks, in em of the base font size.
pub const BLOCK_MARGIN_EM: f32 = 0.8;

pub const SPACE_WIDTH_EM: f32 = 0.25;

/// Resolved typographic parameters for one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockStyle {
    pub font_size: f32,
    pub line_height: f32,
    /// Extra vertical pixels the block's box adds beyond its text lines.
    pub box_padding: f32,
    /// Horizontal inset, per side, narrowing the wrap width.
    pub width_inset: f32,
}

pub fn block_style(kind: BlockKind, font_size: f32) -> BlockStyle {
    match kind {
        BlockKind::Paragraph => BlockStyle {
            font_size,
            line_height: LINE_HEIGHT,
            box_padding: 0.0,
            width_inset: 0.0,
        },
        BlockKind::Title => BlockStyle {
            font_size: font_size * TITLE_SCALE,
            line_height: TITLE_LINE_HEIGHT,
            box_padding: 0.0,
            width_inset: 0.0,
        },
        BlockKind::Quote => BlockStyle {
            font_size,
            line_height: LINE_HEIGHT,
            box_padding: 2.0 * QUOTE_BOX_PADDING_PX,
            width_inset: QUOTE_INSET_PX,
        },
    }
}

/// Style for the synthesized hero block under the minimal template.
pub fn hero_style(font_size: f32) -> BlockStyle {
    BlockStyle {
        font_size: font_size * HERO_SCALE,
        line_height: TITLE_LINE_HEIGHT,
        box_padding: HERO_PADDING_PX,
        width_inset: 0.0,
    }
}

/// Vertical margin between adjacent blocks at the given base font size.
pub fn block_margin(font_size: f32) -> f32 {
    BLOCK_MARGIN_EM * font_size
}

// ────────────────────────────────────────────────────────────────────────────
// Measurer trait
// ────────────────────────────────────────────────────────────────────────────

/// Rendered-height oracle for one block of text. Implementations must apply
/// the same wrapping the renderer will.
pub trait TextMeasurer: Send + Sync {
    /// Height in pixels of `text` rendered at `style` into a column
    /// `width_px` wide. `text` is the visible text — highlight delimiters are
    /// stripped by the caller.
    fn block_height(&self, text: &str, style: &BlockStyle, width_px: f32) -> f32;
}

// ────────────────────────────────────────────────────────────────────────────
// Default backend: static character metrics
// ────────────────────────────────────────────────────────────────────────────

/// Character-width table for the renderer's sans stack, in em units.
/// Covers ASCII 0x20..=0x7E; index = (char as usize) - 32.
#[rustfmt::skip]
static SANS_WIDTHS: [f32; 95] = [
    // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
    0.25, 0.30, 0.38, 0.56, 0.56, 0.89, 0.67, 0.22, 0.33, 0.33, 0.39, 0.59, 0.28, 0.33, 0.28, 0.31,
    // 0     1     2     3     4     5     6     7     8     9
    0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
    // :     ;     <     =     >     ?     @
    0.28, 0.28, 0.59, 0.59, 0.59, 0.50, 1.02,
    // A     B     C     D     E     F     G     H     I     J     K     L     M
    0.67, 0.61, 0.61, 0.67, 0.56, 0.50, 0.67, 0.67, 0.25, 0.39, 0.61, 0.53, 0.78,
    // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
    0.67, 0.72, 0.56, 0.72, 0.61, 0.50, 0.56, 0.67, 0.67, 0.89, 0.61, 0.61, 0.56,
    // [     \     ]     ^     _     `
    0.28, 0.31, 0.28, 0.47, 0.56, 0.34,
    // a     b     c     d     e     f     g     h     i     j     k     l     m
    0.56, 0.56, 0.50, 0.56, 0.56, 0.31, 0.56, 0.56, 0.22, 0.22, 0.53, 0.22, 0.83,
    // n     o     p     q     r     s     t     u     v     w     x     y     z
    0.56, 0.56, 0.56, 0.56, 0.33, 0.44, 0.39, 0.56, 0.50, 0.72, 0.50, 0.50, 0.44,
    // {     |     }     ~
    0.33, 0.26, 0.33, 0.59,
];

fn char_width_em(c: char) -> f32 {
    let code = c as usize;
    if (32..=126).contains(&code) {
        SANS_WIDTHS[code - 32]
    } else {
        // CJK glyphs and full-width punctuation render at one em.
        1.0
    }
}

/// Default measurer: greedy atom wrapping over the static width table.
/// CJK characters break anywhere; Latin words break at spaces; an atom wider
/// than the line is hard-split.
pub struct CharMetricMeasurer;

impl TextMeasurer for CharMetricMeasurer {
    fn block_height(&self, text: &str, style: &BlockStyle, width_px: f32) -> f32 {
        let lines: usize = text
            .lines()
            .map(|line| wrapped_line_count(line, style.font_size, width_px))
            .sum();
        lines as f32 * style.font_size * style.line_height + style.box_padding
    }
}

#[derive(Clone, Copy)]
enum Atom {
    Space,
    /// An unbreakable chunk with its width in em. CJK characters arrive as
    /// one-char chunks, Latin words as whole-word chunks.
    Chunk(f32),
}

fn atomize(line: &str, max_em: f32) -> Vec<Atom> {
    let mut atoms = Vec::new();
    let mut word = 0.0_f32;
    let mut in_word = false;
    let flush = |atoms: &mut Vec<Atom>, word: &mut f32, in_word: &mut bool| {
        if *in_word {
            atoms.push(Atom::Chunk(*word));
            *word = 0.0;
            *in_word = false;
        }
    };
    for c in line.chars() {
        if c.is_whitespace() {
            flush(&mut atoms, &mut word, &mut in_word);
            if !matches!(atoms.last(), Some(Atom::Space) | None) {
                atoms.push(Atom::Space);
            }
        } else if c.is_ascii() {
            word += char_width_em(c);
            in_word = true;
        } else {
            flush(&mut atoms, &mut word, &mut in_word);
            atoms.push(Atom::Chunk(char_width_em(c)));
        }
    }
    flush(&mut atoms, &mut word, &mut in_word);
    // A word wider than the line gets hard-split per character.
    atoms
        .into_iter()
        .flat_map(|atom| match atom {
            Atom::Chunk(w) if w > max_em => {
                let pieces = (w / max_em).ceil() as usize;
                let piece = w / pieces as f32;
                vec![Atom::Chunk(piece); pieces]
            }
            other => vec![other],
        })
        .collect()
}

fn wrapped_line_count(line: &str, font_size: f32, width_px: f32) -> usize {
    if line.trim().is_empty() {
        return 1;
    }
    let max_em = (width_px / font_size).max(0.1);
    let mut lines = 1usize;
    let mut cur = 0.0_f32;
    for atom in atomize(line, max_em) {
        match atom {
            Atom::Space => {
                if cur > 0.0 {
                    cur += SPACE_WIDTH_EM;
                }
            }
            Atom::Chunk(w) => {
                if cur > 0.0 && cur + w > max_em {
                    lines += 1;
                    cur = w;
                } else {
                    cur += w;
                }
            }
        }
    }
    lines
}
