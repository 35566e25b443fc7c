//! Chat-completion gateway.
//!
//! OpenAI-compatible endpoint shape: `POST {base}/chat/completions` with
//! bearer auth and `{ model, messages }`; the reply is
//! `choices[0].message.content`. Chat actions are terminal per user trigger —
//! failures are reported, never retried automatically.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use super::{provider_failure, GatewayError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Logical model aliases → provider identifiers. Each alias can be overridden
/// via `MODEL_<ALIAS>` (uppercased, `-` → `_`); unknown names pass through
/// untouched.
const MODEL_ALIASES: &[(&str, &str)] = &[
    ("chat", "gpt-4o"),
    ("chat-fast", "gpt-4o-mini"),
    ("image", "gemini-2.0-flash-exp"),
];

/// Resolves a logical model name to the provider identifier.
pub fn resolve_model(name: &str) -> String {
    let env_key = format!("MODEL_{}", name.to_uppercase().replace('-', "_"));
    if let Ok(overridden) = std::env::var(&env_key) {
        if !overridden.trim().is_empty() {
            return overridden;
        }
    }
    MODEL_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, id)| id.to_string())
        .unwrap_or_else(|| name.to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Completion seam for the compose orchestrations. [`ChatClient`] is the
/// production backend; tests script replies through a stub.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, GatewayError>;
}

#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base: Option<String>,
    api_key: Option<String>,
}

#[async_trait]
impl Completer for ChatClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, GatewayError> {
        ChatClient::complete(self, model, messages).await
    }
}

impl ChatClient {
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
            _ => Err(GatewayError::NotConfigured("chat")),
        }
    }

    /// Sends the message history and returns the reply text.
    pub async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, GatewayError> {
        let (base, key) = self.credentials()?;
        let model = resolve_model(model);

        let response = self
            .client
            .post(format!("{}/chat/completions", base.trim_end_matches('/')))
            .bearer_auth(key)
            .json(&ChatRequest { model: &model, messages })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(provider_failure(status, &body));
        }

        let parsed: ChatResponse = response.json().await?;
        let reply = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(GatewayError::EmptyContent)?;

        debug!(model = %model, chars = reply.chars().count(), "chat completion succeeded");
        Ok(reply)
    }

    /// Calls the gateway and deserializes the reply as JSON, tolerating
    /// markdown code fences around it.
    pub async fn complete_json<T: DeserializeOwned>(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<T, GatewayError> {
        let reply = self.complete(model, messages).await?;
        let reply = strip_json_fences(&reply);
        serde_json::from_str(reply).map_err(GatewayError::Parse)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
pub(crate) fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_model_known_alias() {
        assert_eq!(resolve_model("chat"), "gpt-4o");
        assert_eq!(resolve_model("chat-fast"), "gpt-4o-mini");
    }

    #[test]
    fn test_resolve_model_unknown_name_passes_through() {
        assert_eq!(resolve_model("some-provider/custom-model"), "some-provider/custom-model");
    }

    #[test]
    fn test_resolve_model_env_override_wins() {
        // The "image" alias is resolved by no other test, so the env
        // mutation cannot race the parallel runner.
        std::env::set_var("MODEL_IMAGE", "override-model");
        assert_eq!(resolve_model("image"), "override-model");
        std::env::remove_var("MODEL_IMAGE");
        assert_eq!(resolve_model("image"), "gemini-2.0-flash-exp");
    }

    #[test]
    fn test_unconfigured_client_fails_before_network() {
        let client = ChatClient::new(None, Some("key".to_string()));
        assert!(matches!(
            client.credentials(),
            Err(GatewayError::NotConfigured("chat"))
        ));
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }
}
