use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::compose::cover::{generate_cover, CoverData};
use crate::compose::typeset::typeset;
use crate::errors::AppError;
use crate::layout::canvas::CanvasRatio;
use crate::markup::ContentBlock;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TypesetRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct TypesetResponse {
    pub text: String,
    pub blocks: Vec<ContentBlock>,
}

/// POST /api/v1/compose/typeset
pub async fn handle_typeset(
    State(state): State<AppState>,
    Json(req): Json<TypesetRequest>,
) -> Result<Json<TypesetResponse>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("text must not be empty".to_string()));
    }
    let outcome = typeset(&state.chat, &req.text).await?;
    Ok(Json(TypesetResponse {
        text: outcome.text,
        blocks: outcome.blocks,
    }))
}

#[derive(Deserialize)]
pub struct CoverRequest {
    pub content: String,
    #[serde(default)]
    pub ratio: Option<CanvasRatio>,
    #[serde(default)]
    pub direction: Option<String>,
}

/// POST /api/v1/compose/cover
pub async fn handle_cover(
    State(state): State<AppState>,
    Json(req): Json<CoverRequest>,
) -> Result<Json<CoverData>, AppError> {
    if req.content.trim().is_empty() {
        return Err(AppError::Validation("content must not be empty".to_string()));
    }
    let ratio = req.ratio.unwrap_or(CanvasRatio::Portrait);
    let cover = generate_cover(
        &state.chat,
        &state.image,
        &req.content,
        ratio,
        req.direction.as_deref(),
    )
    .await?;
    Ok(Json(cover))
}
