//! External gateway clients (scrape, chat completion, image generation,
//! publishing) and their shared error taxonomy.
//!
//! All four speak JSON over HTTPS. A gateway invoked without its credentials
//! fails with `NotConfigured` before any network I/O. Provider failures carry
//! the provider's own message; `Display` renders it verbatim, prefixed with
//! the machine code when one is present.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

pub mod chat;
pub mod handlers;
pub mod image;
pub mod publish;
pub mod scrape;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0} gateway is not configured (missing base URL or API key)")]
    NotConfigured(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{}", render_provider_message(.code, .message))]
    Provider {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("failed to parse gateway response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("gateway returned empty content")]
    EmptyContent,

    #[error("no image found in gateway response")]
    NoImage,
}

fn render_provider_message(code: &Option<String>, message: &str) -> String {
    match code {
        Some(code) => format!("[{code}] {message}"),
        None => message.to_string(),
    }
}

/// Builds a `Provider` error from a non-2xx response body. Providers disagree
/// on envelope shape, so the message is pulled from `error.message`, a bare
/// `error` string, or `message`, falling back to the HTTP status text.
pub(crate) fn provider_failure(status: StatusCode, body: &str) -> GatewayError {
    let value: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let message = value
        .pointer("/error/message")
        .and_then(Value::as_str)
        .or_else(|| value.get("error").and_then(Value::as_str))
        .or_else(|| value.get("message").and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| status_text(status));
    let code = value
        .pointer("/error/code")
        .or_else(|| value.get("code"))
        .and_then(json_code);
    GatewayError::Provider {
        status: status.as_u16(),
        code,
        message,
    }
}

pub(crate) fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

/// Stringifies a JSON error code, which providers send as either a string or
/// a number.
pub(crate) fn json_code(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_message_renders_verbatim_without_code() {
        let err = GatewayError::Provider {
            status: 401,
            code: None,
            message: "invalid token".to_string(),
        };
        assert_eq!(err.to_string(), "invalid token");
    }

    #[test]
    fn test_provider_message_is_code_prefixed_when_code_present() {
        let err = GatewayError::Provider {
            status: 401,
            code: Some("AUTH_401".to_string()),
            message: "invalid token".to_string(),
        };
        assert_eq!(err.to_string(), "[AUTH_401] invalid token");
    }

    #[test]
    fn test_provider_failure_reads_nested_error_message() {
        let err = provider_failure(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"message":"prompt too long","code":40001}}"#,
        );
        assert_eq!(err.to_string(), "[40001] prompt too long");
    }

    #[test]
    fn test_provider_failure_reads_flat_error_string() {
        let err = provider_failure(StatusCode::FORBIDDEN, r#"{"error":"quota exhausted"}"#);
        assert_eq!(err.to_string(), "quota exhausted");
    }

    #[test]
    fn test_provider_failure_falls_back_to_status_text() {
        let err = provider_failure(StatusCode::BAD_GATEWAY, "<html>upstream died</html>");
        assert_eq!(err.to_string(), "Bad Gateway");
    }
}
