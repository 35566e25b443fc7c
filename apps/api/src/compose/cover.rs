//! Cover generation: a creative brief from the chat gateway, then an
//! illustration from the image gateway.
//!
//! The returned `CoverData` carries the article digest the brief was built
//! from, so a "new creative direction" request reuses the same article
//! context with a different direction hint. An image-side provider failure
//! degrades to a brief-only cover; a missing image credential does not (the
//! missing-credentials rule fails fast).

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::compose::prompts::{COVER_SYSTEM, COVER_TEMPLATE};
use crate::errors::AppError;
use crate::gateways::chat::{ChatClient, ChatMessage};
use crate::gateways::image::ImageClient;
use crate::gateways::GatewayError;
use crate::layout::canvas::CanvasRatio;

/// Portion of the article fed to the brief prompt and carried for
/// re-generation.
const ARTICLE_DIGEST_CHARS: usize = 600;

#[derive(Debug, Deserialize)]
pub struct CoverBrief {
    pub title: String,
    #[serde(rename = "abstract")]
    pub summary: String,
    pub image_prompt: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverImage {
    pub mime: String,
    pub base64: String,
}

#[derive(Debug, Serialize)]
pub struct CoverData {
    pub title: String,
    #[serde(rename = "abstract")]
    pub summary: String,
    pub image_prompt: String,
    pub image: Option<CoverImage>,
    pub article_digest: String,
}

pub async fn generate_cover(
    chat: &ChatClient,
    image: &ImageClient,
    content: &str,
    ratio: CanvasRatio,
    direction: Option<&str>,
) -> Result<CoverData, AppError> {
    let digest: String = content.chars().take(ARTICLE_DIGEST_CHARS).collect();
    let prompt = COVER_TEMPLATE
        .replace("{content}", &digest)
        .replace("{direction}", direction.unwrap_or("editor's choice"));
    let brief: CoverBrief = chat
        .complete_json("chat", &[ChatMessage::system(COVER_SYSTEM), ChatMessage::user(prompt)])
        .await?;
    info!(title = %brief.title, "cover brief generated");

    let cover_image = match image.generate(&brief.image_prompt, ratio).await {
        Ok(generated) => Some(CoverImage {
            base64: BASE64.encode(&generated.bytes),
            mime: generated.mime,
        }),
        Err(e @ GatewayError::NotConfigured(_)) => return Err(e.into()),
        Err(e) => {
            warn!(error = %e, "cover image generation failed, returning brief only");
            None
        }
    };

    Ok(CoverData {
        title: brief.title,
        summary: brief.summary,
        image_prompt: brief.image_prompt,
        image: cover_image,
        article_digest: digest,
    })
}
