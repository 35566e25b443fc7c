use axum::extract::Json;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;

use crate::errors::AppError;
use crate::export::build_archive;

#[derive(Deserialize)]
pub struct ArchiveRequest {
    #[serde(default)]
    pub cover: Option<String>,
    pub pages: Vec<String>,
}

/// POST /api/v1/export/archive
///
/// Images arrive base64-encoded (a `data:` URI prefix is tolerated); the
/// response is the zip archive itself, not a JSON envelope.
pub async fn handle_archive(
    Json(req): Json<ArchiveRequest>,
) -> Result<impl IntoResponse, AppError> {
    let cover = match &req.cover {
        Some(encoded) => Some(decode_image(encoded, "cover")?),
        None => None,
    };
    let mut pages = Vec::with_capacity(req.pages.len());
    for (i, encoded) in req.pages.iter().enumerate() {
        pages.push(decode_image(encoded, &format!("page {}", i + 1))?.into());
    }
    let archive = build_archive(cover.as_deref(), &pages)?;
    Ok((
        [
            (CONTENT_TYPE, "application/zip"),
            (CONTENT_DISPOSITION, "attachment; filename=\"pages.zip\""),
        ],
        archive,
    ))
}

fn decode_image(encoded: &str, label: &str) -> Result<Vec<u8>, AppError> {
    let payload = match encoded.find(',') {
        Some(comma) if encoded.starts_with("data:") => &encoded[comma + 1..],
        _ => encoded,
    };
    BASE64
        .decode(payload.trim())
        .map_err(|_| AppError::Validation(format!("{label} is not valid base64")))
}
