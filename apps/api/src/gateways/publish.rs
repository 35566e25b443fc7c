//! Publishing gateway — WeChat drafts and Xiaohongshu notes.
//!
//! Both actions post a JSON payload with an `x-api-key` header and decode the
//! shared `{ success, data?, error?, message?, code? }` envelope. A non-2xx
//! status or a falsy `success` is a failure carrying the provider's message
//! (code-prefixed when present). The note action forwards a client-supplied
//! idempotency key so provider-side retries do not double-post.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::{json_code, GatewayError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WechatDraft {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XiaohongshuNote {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
}

/// Provider-assigned identifier and/or shareable URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReceipt {
    pub id: Option<String>,
    pub url: Option<String>,
}

#[derive(Deserialize)]
struct PublishEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<Value>,
}

#[derive(Clone)]
pub struct PublishClient {
    client: Client,
    base: Option<String>,
    api_key: Option<String>,
}

impl PublishClient {
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
            _ => Err(GatewayError::NotConfigured("publish")),
        }
    }

    pub async fn publish_wechat_draft(
        &self,
        draft: &WechatDraft,
    ) -> Result<PublishReceipt, GatewayError> {
        let receipt = self.post_action("wechat/draft", draft, None).await?;
        info!(id = ?receipt.id, "wechat draft submitted");
        Ok(receipt)
    }

    pub async fn publish_note(
        &self,
        note: &XiaohongshuNote,
        idempotency_key: Option<&str>,
    ) -> Result<PublishReceipt, GatewayError> {
        let receipt = self
            .post_action("xiaohongshu/note", note, idempotency_key)
            .await?;
        info!(id = ?receipt.id, url = ?receipt.url, "xiaohongshu note submitted");
        Ok(receipt)
    }

    async fn post_action<T: Serialize>(
        &self,
        action: &str,
        payload: &T,
        idempotency_key: Option<&str>,
    ) -> Result<PublishReceipt, GatewayError> {
        let (base, key) = self.credentials()?;
        let mut request = self
            .client
            .post(format!("{}/{}", base.trim_end_matches('/'), action))
            .header("x-api-key", key)
            .json(payload);
        if let Some(token) = idempotency_key {
            request = request.header("Idempotency-Key", token);
        }
        let response = request.send().await?;
        let status = response.status();
        let status_text = super::status_text(status);
        let body = response.text().await.unwrap_or_default();
        decode_envelope(status.as_u16(), &status_text, &body)
    }
}

/// Pure envelope decoding, shared by both actions.
pub(crate) fn decode_envelope(
    status: u16,
    status_text: &str,
    body: &str,
) -> Result<PublishReceipt, GatewayError> {
    let envelope: Option<PublishEnvelope> = serde_json::from_str(body).ok();
    let succeeded =
        (200..300).contains(&status) && envelope.as_ref().is_some_and(|e| e.success);
    if !succeeded {
        let (message, code) = match &envelope {
            Some(e) => (
                e.error
                    .clone()
                    .or_else(|| e.message.clone())
                    .unwrap_or_else(|| status_text.to_string()),
                e.code.as_ref().and_then(json_code),
            ),
            None => (status_text.to_string(), None),
        };
        return Err(GatewayError::Provider { status, code, message });
    }
    let data = envelope.and_then(|e| e.data).unwrap_or(Value::Null);
    Ok(PublishReceipt {
        id: ["media_id", "note_id", "id"]
            .iter()
            .find_map(|k| data.get(k))
            .and_then(value_string),
        url: ["share_url", "url"]
            .iter()
            .find_map(|k| data.get(k))
            .and_then(value_string),
    })
}

fn value_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
