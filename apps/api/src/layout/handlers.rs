use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::layout::canvas::{
    CanvasRatio, CanvasTemplate, CanvasTheme, FooterLayout, HeaderStyle, ThemeConfig,
};
use crate::layout::paginator::{paginate, HeroBlock, PageContent};
use crate::markup;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PaginateRequest {
    pub text: String,
    #[serde(default)]
    pub title: Option<String>,
    pub ratio: CanvasRatio,
    pub font_size: f32,
    #[serde(default)]
    pub theme: Option<CanvasTheme>,
    pub template: CanvasTemplate,
    #[serde(default)]
    pub reflow: bool,
}

#[derive(Serialize)]
pub struct PaginateResponse {
    pub hero: Option<HeroBlock>,
    pub pages: Vec<PageContent>,
    pub page_count: usize,
    pub max_content_height: f32,
    /// Echoed so the client renderer paints with the same colors the page
    /// list was computed for.
    pub theme: ThemeConfig,
}

/// POST /api/v1/layout/paginate
pub async fn handle_paginate(
    State(state): State<AppState>,
    Json(req): Json<PaginateRequest>,
) -> Result<Json<PaginateResponse>, AppError> {
    if !(8.0..=160.0).contains(&req.font_size) {
        return Err(AppError::Validation(format!(
            "font_size must be between 8 and 160, got {}",
            req.font_size
        )));
    }
    let (_, blocks) = markup::normalize(&req.text, req.reflow);
    let pagination = paginate(
        &blocks,
        req.title.as_deref(),
        req.ratio,
        req.template,
        req.font_size,
        state.measurer.as_ref(),
    );
    let theme = req.theme.unwrap_or(CanvasTheme::PlainWhite);
    Ok(Json(PaginateResponse {
        hero: pagination.hero,
        page_count: pagination.pages.len(),
        pages: pagination.pages,
        max_content_height: pagination.max_content_height,
        theme: theme.config(),
    }))
}

#[derive(Serialize)]
pub struct RatioOption {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
}

#[derive(Serialize)]
pub struct ThemeOption {
    pub name: &'static str,
    #[serde(flatten)]
    pub config: ThemeConfig,
}

#[derive(Serialize)]
pub struct TemplateOption {
    pub name: &'static str,
    pub border: bool,
    pub header: Option<HeaderStyle>,
    pub footer: FooterLayout,
}

#[derive(Serialize)]
pub struct OptionsResponse {
    pub ratios: Vec<RatioOption>,
    pub themes: Vec<ThemeOption>,
    pub templates: Vec<TemplateOption>,
}

/// GET /api/v1/layout/options
pub async fn handle_options() -> Json<OptionsResponse> {
    let ratios = CanvasRatio::ALL
        .into_iter()
        .map(|r| {
            let config = r.config();
            RatioOption {
                name: r.label(),
                width: config.width,
                height: config.height,
            }
        })
        .collect();
    let themes = CanvasTheme::ALL
        .into_iter()
        .map(|t| ThemeOption {
            name: t.label(),
            config: t.config(),
        })
        .collect();
    let templates = CanvasTemplate::ALL
        .into_iter()
        .map(|t| {
            let config = t.config();
            TemplateOption {
                name: t.label(),
                border: config.border,
                header: config.header,
                footer: config.footer,
            }
        })
        .collect();
    Json(OptionsResponse {
        ratios,
        themes,
        templates,
    })
}
