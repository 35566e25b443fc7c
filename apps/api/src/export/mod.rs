//! Batch export: rasterization semantics and zip archive assembly.
//!
//! Rasterization itself happens where the laid-out page lives (browser
//! canvas or headless renderer); this module owns the batch contract —
//! strictly sequential, page order preserved, first failure aborts the whole
//! batch — and the archive layout (cover first, pages numbered from 1).
#![allow(dead_code)]

use std::io::{Cursor, Write};

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

use crate::layout::canvas::{CanvasRatio, CanvasTemplate, CanvasTheme};
use crate::layout::paginator::PageContent;

pub mod handlers;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("page {index} failed to rasterize: {message}")]
    Rasterize { index: usize, message: String },

    #[error("archive must contain at least one image")]
    Empty,

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The canvas configuration a page was paginated for; the rasterizer renders
/// with exactly these parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RenderPlan {
    pub ratio: CanvasRatio,
    pub theme: CanvasTheme,
    pub template: CanvasTemplate,
    pub font_size: f32,
}

#[derive(Debug, Clone)]
pub struct RasterOptions {
    pub pixel_ratio: f32,
    pub background: String,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            pixel_ratio: 2.0,
            background: "#ffffff".to_string(),
        }
    }
}

/// Renders one laid-out page to encoded raster bytes (PNG unless the
/// implementation says otherwise).
#[async_trait]
pub trait PageRasterizer: Send + Sync {
    async fn rasterize(
        &self,
        page: &PageContent,
        plan: &RenderPlan,
        options: &RasterOptions,
    ) -> Result<Bytes, String>;
}

/// Runs the rasterizer over `pages` strictly in sequence — the rasterizer is
/// a critical section over shared render state. The first failure aborts the
/// batch; nothing partial is returned.
pub async fn render_batch(
    rasterizer: &dyn PageRasterizer,
    pages: &[PageContent],
    plan: &RenderPlan,
    options: &RasterOptions,
) -> Result<Vec<Bytes>, ExportError> {
    let mut images = Vec::with_capacity(pages.len());
    for page in pages {
        match rasterizer.rasterize(page, plan, options).await {
            Ok(bytes) => images.push(bytes),
            Err(message) => {
                return Err(ExportError::Rasterize {
                    index: page.page_index,
                    message,
                })
            }
        }
    }
    Ok(images)
}

/// Assembles the export archive: `cover.png` first when present, then pages
/// as `1.png`, `2.png`, … in order. PNG payloads are already compressed, so
/// entries are stored.
pub fn build_archive(cover: Option<&[u8]>, pages: &[Bytes]) -> Result<Bytes, ExportError> {
    if cover.is_none() && pages.is_empty() {
        return Err(ExportError::Empty);
    }
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Stored);
    if let Some(bytes) = cover {
        writer.start_file("cover.png", options)?;
        writer.write_all(bytes)?;
    }
    for (i, page) in pages.iter().enumerate() {
        writer.start_file(format!("{}.png", i + 1), options)?;
        writer.write_all(page)?;
    }
    let cursor = writer.finish()?;
    Ok(Bytes::from(cursor.into_inner()))
}
