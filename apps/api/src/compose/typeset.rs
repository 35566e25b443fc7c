//! AI typesetting with a content-integrity gate.
//!
//! The chat gateway suggests a re-flow (line breaks + markers only). A
//! suggestion whose marker-stripped fingerprint differs from the original is
//! rejected outright; one retry with a stricter repair prompt is permitted,
//! then the operation fails with a content-integrity error and the caller's
//! text is left untouched.

use tracing::{info, warn};

use crate::compose::prompts::{REPAIR_SYSTEM, REPAIR_TEMPLATE, TYPESET_SYSTEM, TYPESET_TEMPLATE};
use crate::errors::AppError;
use crate::gateways::chat::{ChatMessage, Completer};
use crate::markup::{self, integrity, ContentBlock};

#[derive(Debug)]
pub struct TypesetOutcome {
    pub text: String,
    pub blocks: Vec<ContentBlock>,
}

pub async fn typeset(chat: &dyn Completer, text: &str) -> Result<TypesetOutcome, AppError> {
    let prompt = TYPESET_TEMPLATE.replace("{text}", text);
    let suggestion = chat
        .complete("chat", &[ChatMessage::system(TYPESET_SYSTEM), ChatMessage::user(prompt)])
        .await?;
    if integrity::content_matches(text, &suggestion) {
        return Ok(finish(&suggestion));
    }

    warn!("typeset suggestion altered content, retrying with repair prompt");
    let repair = REPAIR_TEMPLATE
        .replace("{text}", text)
        .replace("{attempt}", &suggestion);
    let retry = chat
        .complete("chat", &[ChatMessage::system(REPAIR_SYSTEM), ChatMessage::user(repair)])
        .await?;
    if integrity::content_matches(text, &retry) {
        info!("repair attempt restored content integrity");
        return Ok(finish(&retry));
    }

    Err(AppError::ContentIntegrity(
        "AI re-flow altered the original content; no changes were applied".to_string(),
    ))
}

/// Runs the accepted suggestion through the canonical pipeline. Every
/// pipeline transform is fingerprint-preserving, so the gate above still
/// holds for the returned text.
fn finish(suggestion: &str) -> TypesetOutcome {
    let (text, blocks) = markup::normalize(suggestion, false);
    TypesetOutcome { text, blocks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateways::GatewayError;
    use crate::markup::integrity::fingerprint;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns its scripted replies in order; panics when over-called.
    struct ScriptedCompleter {
        replies: Mutex<Vec<&'static str>>,
        calls: Mutex<usize>,
    }

    fn make_completer(replies: &[&'static str]) -> ScriptedCompleter {
        ScriptedCompleter {
            replies: Mutex::new(replies.to_vec()),
            calls: Mutex::new(0),
        }
    }

    impl ScriptedCompleter {
        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl Completer for ScriptedCompleter {
        async fn complete(
            &self,
            _model: &str,
            _messages: &[ChatMessage],
        ) -> Result<String, GatewayError> {
            *self.calls.lock().unwrap() += 1;
            Ok(self.replies.lock().unwrap().remove(0).to_string())
        }
    }

    const ORIGINAL: &str = "第一句很重要。第二句是补充。";

    #[tokio::test]
    async fn test_preserving_suggestion_is_accepted_first_try() {
        let chat = make_completer(&["# 第一句很重要。\n==第二句是补充。=="]);
        let outcome = typeset(&chat, ORIGINAL).await.unwrap();
        assert_eq!(chat.calls(), 1);
        assert_eq!(fingerprint(&outcome.text), fingerprint(ORIGINAL));
        assert!(!outcome.blocks.is_empty());
    }

    #[tokio::test]
    async fn test_altering_suggestion_triggers_one_repair_retry() {
        let chat = make_completer(&[
            "这里被完全改写了。",
            "第一句很重要。\n第二句是补充。",
        ]);
        let outcome = typeset(&chat, ORIGINAL).await.unwrap();
        assert_eq!(chat.calls(), 2);
        assert_eq!(fingerprint(&outcome.text), fingerprint(ORIGINAL));
    }

    #[tokio::test]
    async fn test_second_mismatch_fails_with_content_integrity() {
        let chat = make_completer(&["第一次改写。", "第二次还是改写。"]);
        let err = typeset(&chat, ORIGINAL).await.unwrap_err();
        assert_eq!(chat.calls(), 2);
        assert!(matches!(err, AppError::ContentIntegrity(_)));
    }

    #[tokio::test]
    async fn test_gateway_failure_propagates_without_retry() {
        struct FailingCompleter;
        #[async_trait]
        impl Completer for FailingCompleter {
            async fn complete(
                &self,
                _model: &str,
                _messages: &[ChatMessage],
            ) -> Result<String, GatewayError> {
                Err(GatewayError::EmptyContent)
            }
        }
        let err = typeset(&FailingCompleter, ORIGINAL).await.unwrap_err();
        assert!(matches!(err, AppError::Gateway(GatewayError::EmptyContent)));
    }
}
