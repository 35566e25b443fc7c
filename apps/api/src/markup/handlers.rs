use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::markup::{self, ContentBlock};

#[derive(Deserialize)]
pub struct NormalizeRequest {
    pub text: String,
    #[serde(default)]
    pub reflow: bool,
}

#[derive(Serialize)]
pub struct NormalizeResponse {
    pub text: String,
    pub blocks: Vec<ContentBlock>,
}

/// POST /api/v1/markup/normalize
pub async fn handle_normalize(
    Json(req): Json<NormalizeRequest>,
) -> Result<Json<NormalizeResponse>, AppError> {
    let (text, blocks) = markup::normalize(&req.text, req.reflow);
    Ok(Json(NormalizeResponse { text, blocks }))
}
