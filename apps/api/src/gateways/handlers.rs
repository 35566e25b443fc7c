use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::gateways::chat::ChatMessage;
use crate::gateways::publish::{PublishReceipt, WechatDraft, XiaohongshuNote};
use crate::gateways::scrape::SourceMaterial;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequestBody {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
pub struct ChatReply {
    pub reply: String,
}

/// POST /api/v1/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequestBody>,
) -> Result<Json<ChatReply>, AppError> {
    if req.messages.is_empty() {
        return Err(AppError::Validation("messages must not be empty".to_string()));
    }
    let reply = state.chat.complete(&req.model, &req.messages).await?;
    Ok(Json(ChatReply { reply }))
}

#[derive(Deserialize)]
pub struct ScrapeRequestBody {
    pub url: String,
}

/// POST /api/v1/scrape
pub async fn handle_scrape(
    State(state): State<AppState>,
    Json(req): Json<ScrapeRequestBody>,
) -> Result<Json<SourceMaterial>, AppError> {
    let url = req.url.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(AppError::Validation("url must be an http(s) URL".to_string()));
    }
    Ok(Json(state.scraper.scrape(url).await))
}

/// POST /api/v1/publish/wechat
pub async fn handle_publish_wechat(
    State(state): State<AppState>,
    Json(draft): Json<WechatDraft>,
) -> Result<Json<PublishReceipt>, AppError> {
    if draft.title.trim().is_empty() || draft.content.trim().is_empty() {
        return Err(AppError::Validation("title and content are required".to_string()));
    }
    Ok(Json(state.publisher.publish_wechat_draft(&draft).await?))
}

/// POST /api/v1/publish/xiaohongshu
///
/// An optional `Idempotency-Key` header is forwarded to the provider so a
/// client retry cannot double-post.
pub async fn handle_publish_note(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(note): Json<XiaohongshuNote>,
) -> Result<Json<PublishReceipt>, AppError> {
    if note.title.trim().is_empty() || note.content.trim().is_empty() {
        return Err(AppError::Validation("title and content are required".to_string()));
    }
    let idempotency_key = headers
        .get("idempotency-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Ok(Json(
        state
            .publisher
            .publish_note(&note, idempotency_key.as_deref())
            .await?,
    ))
}
