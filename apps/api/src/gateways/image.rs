//! Image-generation gateway.
//!
//! Same endpoint shape as chat, but `messages[0].content` is a structured
//! part list carrying the prompt and an aspect-ratio hint. Providers return
//! the image in one of three shapes — a structured image part, a data URI
//! embedded in the content string, or a bare base64 blob — tried in that
//! order by a fixed strategy list.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytes::Bytes;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use super::{chat::resolve_model, provider_failure, GatewayError};
use crate::layout::canvas::CanvasRatio;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub bytes: Bytes,
    pub mime: String,
}

type ExtractFn = fn(&Value) -> Option<GeneratedImage>;

/// Ordered extraction strategies, tried first to last.
const EXTRACTION_STRATEGIES: &[(&str, ExtractFn)] = &[
    ("structured-part", extract_structured_part),
    ("data-uri", extract_data_uri),
    ("bare-base64", extract_bare_base64),
];

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    base: Option<String>,
    api_key: Option<String>,
}

impl ImageClient {
    pub fn new(base: Option<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            base,
            api_key,
        }
    }

    fn credentials(&self) -> Result<(&str, &str), GatewayError> {
        match (self.base.as_deref(), self.api_key.as_deref()) {
            (Some(base), Some(key)) if !base.is_empty() && !key.is_empty() => Ok((base, key)),
            _ => Err(GatewayError::NotConfigured("image")),
        }
    }

    /// Generates one image for `prompt` at the given aspect ratio.
    pub async fn generate(
        &self,
        prompt: &str,
        ratio: CanvasRatio,
    ) -> Result<GeneratedImage, GatewayError> {
        let (base, key) = self.credentials()?;
        let ratio_config = ratio.config();
        let body = json!({
            "model": resolve_model("image"),
            "messages": [{
                "role": "user",
                "content": [{
                    "type": "text",
                    "text": format!(
                        "{prompt}\n\nAspect ratio: {} ({}x{}).",
                        ratio.label(), ratio_config.width, ratio_config.height
                    ),
                }],
            }],
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", base.trim_end_matches('/')))
            .bearer_auth(key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(provider_failure(status, &body));
        }

        let value: Value = response.json().await?;
        let content = value
            .pointer("/choices/0/message/content")
            .filter(|c| !c.is_null())
            .ok_or(GatewayError::EmptyContent)?;
        extract_image(content).ok_or(GatewayError::NoImage)
    }
}

/// Runs the strategy list in order against the message content.
pub(crate) fn extract_image(content: &Value) -> Option<GeneratedImage> {
    for (name, extract) in EXTRACTION_STRATEGIES {
        if let Some(image) = extract(content) {
            debug!(strategy = name, bytes = image.bytes.len(), "image extracted");
            return Some(image);
        }
    }
    None
}

/// Structured part list: an `image_url` part carrying a data URI, or an
/// `image` part carrying raw base64.
fn extract_structured_part(content: &Value) -> Option<GeneratedImage> {
    for part in content.as_array()? {
        match part.get("type").and_then(Value::as_str).unwrap_or("") {
            "image_url" => {
                if let Some(image) = part
                    .pointer("/image_url/url")
                    .and_then(Value::as_str)
                    .and_then(decode_data_uri)
                {
                    return Some(image);
                }
            }
            "image" => {
                // A part missing its data is skipped, not fatal: a later
                // part may still carry the image.
                let Some(data) = part
                    .pointer("/source/data")
                    .or_else(|| part.get("data"))
                    .and_then(Value::as_str)
                else {
                    continue;
                };
                let mime = part
                    .pointer("/source/media_type")
                    .and_then(Value::as_str)
                    .unwrap_or("image/png");
                if let Ok(bytes) = BASE64.decode(data.trim()) {
                    return Some(GeneratedImage {
                        bytes: bytes.into(),
                        mime: mime.to_string(),
                    });
                }
            }
            _ => {}
        }
    }
    None
}

/// A `data:image/...;base64,...` URI embedded anywhere in the content text.
fn extract_data_uri(content: &Value) -> Option<GeneratedImage> {
    let text = content_text(content)?;
    let start = text.find("data:image/")?;
    decode_data_uri(&text[start..])
}

/// The whole content string is one base64 blob (whitespace tolerated).
fn extract_bare_base64(content: &Value) -> Option<GeneratedImage> {
    let text = content_text(content)?;
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.len() < 256 || !cleaned.chars().all(is_base64_char) {
        return None;
    }
    let bytes = BASE64.decode(&cleaned).ok()?;
    let mime = sniff_mime(&bytes)?;
    Some(GeneratedImage {
        bytes: bytes.into(),
        mime: mime.to_string(),
    })
}

fn decode_data_uri(uri: &str) -> Option<GeneratedImage> {
    let rest = uri.strip_prefix("data:")?;
    let comma = rest.find(',')?;
    let (header, data) = rest.split_at(comma);
    if !header.contains("base64") {
        return None;
    }
    let mime = header.split(';').next().unwrap_or("image/png").to_string();
    // The URI may be embedded in prose; stop at the first non-base64 char.
    let data: String = data[1..].chars().take_while(|c| is_base64_char(*c)).collect();
    let bytes = BASE64.decode(&data).ok()?;
    Some(GeneratedImage {
        bytes: bytes.into(),
        mime,
    })
}

fn is_base64_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=')
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if bytes.starts_with(b"\xff\xd8\xff") {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF8") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

/// String content as-is, or the concatenated text parts of a part list.
fn content_text(content: &Value) -> Option<String> {
    match content {
        Value::String(s) => Some(s.clone()),
        Value::Array(parts) => {
            let joined: String = parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect();
            (!joined.is_empty()).then_some(joined)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn png_base64() -> String {
        let mut bytes = PNG_MAGIC.to_vec();
        bytes.extend_from_slice(&[0u8; 256]);
        BASE64.encode(bytes)
    }

    #[test]
    fn test_structured_image_url_part() {
        let content = json!([
            {"type": "text", "text": "here you go"},
            {"type": "image_url", "image_url": {"url": format!("data:image/png;base64,{}", png_base64())}},
        ]);
        let image = extract_image(&content).unwrap();
        assert_eq!(image.mime, "image/png");
        assert!(image.bytes.starts_with(PNG_MAGIC));
    }

    #[test]
    fn test_structured_image_part_with_raw_base64() {
        let content = json!([
            {"type": "image", "source": {"media_type": "image/jpeg", "data": BASE64.encode(b"\xff\xd8\xff fake")}},
        ]);
        let image = extract_image(&content).unwrap();
        assert_eq!(image.mime, "image/jpeg");
    }

    #[test]
    fn test_data_uri_embedded_in_prose() {
        let content = json!(format!(
            "Here is your image: data:image/png;base64,{} — enjoy!",
            png_base64()
        ));
        let image = extract_image(&content).unwrap();
        assert_eq!(image.mime, "image/png");
        assert!(image.bytes.starts_with(PNG_MAGIC));
    }

    #[test]
    fn test_bare_base64_blob_with_sniffed_mime() {
        let content = json!(png_base64());
        let image = extract_image(&content).unwrap();
        assert_eq!(image.mime, "image/png");
    }

    #[test]
    fn test_malformed_image_part_does_not_hide_later_parts() {
        let content = json!([
            {"type": "image", "source": {"media_type": "image/png"}},
            {"type": "image_url", "image_url": {"url": format!("data:image/png;base64,{}", png_base64())}},
        ]);
        let image = extract_image(&content).unwrap();
        assert_eq!(image.mime, "image/png");
        assert!(image.bytes.starts_with(PNG_MAGIC));
    }

    #[test]
    fn test_plain_prose_yields_no_image() {
        let content = json!("Sorry, I cannot generate that image.");
        assert!(extract_image(&content).is_none());
    }

    #[test]
    fn test_strategy_order_prefers_structured_part() {
        // Content matching both the structured and data-uri strategies must
        // resolve through the structured part.
        let jpeg_b64 = BASE64.encode(b"\xff\xd8\xff structured");
        let content = json!([
            {"type": "image_url", "image_url": {"url": format!("data:image/jpeg;base64,{jpeg_b64}")}},
            {"type": "text", "text": format!("data:image/png;base64,{}", png_base64())},
        ]);
        let image = extract_image(&content).unwrap();
        assert_eq!(image.mime, "image/jpeg");
    }
}
