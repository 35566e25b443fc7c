//! Canvas configuration — closed enumerations for ratio, theme, and template,
//! each mapping to an immutable config record.

use serde::{Deserialize, Serialize};

/// Vertical pixel budget reserved for borders, headers, and footers.
/// Templates drawing a decorative border reserve more.
pub const VERTICAL_PADDING_BORDERED_PX: f32 = 240.0;
pub const VERTICAL_PADDING_PLAIN_PX: f32 = 160.0;
/// Horizontal content padding, per side.
pub const HORIZONTAL_PADDING_PX: f32 = 96.0;

// ────────────────────────────────────────────────────────────────────────────
// Ratio
// ────────────────────────────────────────────────────────────────────────────

/// Supported canvas aspect ratios. Wire names are the ratio strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanvasRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "3:4")]
    Portrait,
    #[serde(rename = "4:5")]
    Standard,
    #[serde(rename = "9:16")]
    Story,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatioConfig {
    pub width: u32,
    pub height: u32,
}

impl CanvasRatio {
    pub const ALL: [CanvasRatio; 4] = [
        CanvasRatio::Square,
        CanvasRatio::Portrait,
        CanvasRatio::Standard,
        CanvasRatio::Story,
    ];

    pub fn config(self) -> RatioConfig {
        match self {
            CanvasRatio::Square => RatioConfig { width: 1080, height: 1080 },
            CanvasRatio::Portrait => RatioConfig { width: 1080, height: 1440 },
            CanvasRatio::Standard => RatioConfig { width: 1080, height: 1350 },
            CanvasRatio::Story => RatioConfig { width: 1080, height: 1920 },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CanvasRatio::Square => "1:1",
            CanvasRatio::Portrait => "3:4",
            CanvasRatio::Standard => "4:5",
            CanvasRatio::Story => "9:16",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Theme
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanvasTheme {
    #[serde(rename = "plain-white")]
    PlainWhite,
    #[serde(rename = "warm-coffee")]
    WarmCoffee,
    #[serde(rename = "dark")]
    Dark,
}

/// Fixed color set for a theme. Colors are CSS hex strings the renderer
/// applies verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeConfig {
    pub background: &'static str,
    pub text: &'static str,
    pub title: &'static str,
    pub quote: &'static str,
    pub border: &'static str,
}

impl CanvasTheme {
    pub const ALL: [CanvasTheme; 3] = [
        CanvasTheme::PlainWhite,
        CanvasTheme::WarmCoffee,
        CanvasTheme::Dark,
    ];

    pub fn config(self) -> ThemeConfig {
        match self {
            CanvasTheme::PlainWhite => ThemeConfig {
                background: "#ffffff",
                text: "#1f2937",
                title: "#111827",
                quote: "#6b7280",
                border: "#e5e7eb",
            },
            CanvasTheme::WarmCoffee => ThemeConfig {
                background: "#f5efe6",
                text: "#4a3728",
                title: "#2d2016",
                quote: "#8c7a6b",
                border: "#d9c7b2",
            },
            CanvasTheme::Dark => ThemeConfig {
                background: "#18181b",
                text: "#e4e4e7",
                title: "#fafafa",
                quote: "#a1a1aa",
                border: "#3f3f46",
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CanvasTheme::PlainWhite => "plain-white",
            CanvasTheme::WarmCoffee => "warm-coffee",
            CanvasTheme::Dark => "dark",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Template
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanvasTemplate {
    Classic,
    Minimal,
    Magazine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderStyle {
    Banner,
    Masthead,
}

/// Page-number placement in the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FooterLayout {
    Side,
    Centered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemplateConfig {
    pub border: bool,
    pub header: Option<HeaderStyle>,
    pub footer: FooterLayout,
}

impl CanvasTemplate {
    pub const ALL: [CanvasTemplate; 3] = [
        CanvasTemplate::Classic,
        CanvasTemplate::Minimal,
        CanvasTemplate::Magazine,
    ];

    pub fn config(self) -> TemplateConfig {
        match self {
            CanvasTemplate::Classic => TemplateConfig {
                border: true,
                header: Some(HeaderStyle::Banner),
                footer: FooterLayout::Side,
            },
            // Minimal draws no chrome; its title treatment is the hero block.
            CanvasTemplate::Minimal => TemplateConfig {
                border: false,
                header: None,
                footer: FooterLayout::Centered,
            },
            CanvasTemplate::Magazine => TemplateConfig {
                border: true,
                header: Some(HeaderStyle::Masthead),
                footer: FooterLayout::Centered,
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CanvasTemplate::Classic => "classic",
            CanvasTemplate::Minimal => "minimal",
            CanvasTemplate::Magazine => "magazine",
        }
    }
}

impl TemplateConfig {
    pub fn vertical_padding(&self) -> f32 {
        if self.border {
            VERTICAL_PADDING_BORDERED_PX
        } else {
            VERTICAL_PADDING_PLAIN_PX
        }
    }
}

/// Content-height budget for one page: canvas height minus the template's
/// vertical padding.
pub fn max_content_height(ratio: CanvasRatio, template: CanvasTemplate) -> f32 {
    ratio.config().height as f32 - template.config().vertical_padding()
}

/// Horizontal pixel width available to block text.
pub fn content_width(ratio: CanvasRatio) -> f32 {
    ratio.config().width as f32 - 2.0 * HORIZONTAL_PADDING_PX
}
