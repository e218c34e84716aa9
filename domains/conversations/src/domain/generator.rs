//! Reply generation for one conversation turn
//!
//! Wraps an [`LlmService`] and always produces displayable text. Provider
//! failures are logged and replaced by the specialist's fallback message.

use std::sync::Arc;

use soudan_llm::{CompletionRequest, FinishReason, LlmMessage, LlmService};

use super::entities::{Message, MessageRole};
use super::specialists::SpecialistType;

/// Shown when neither the user nor the server has a provider key
pub const MISSING_API_KEY_MESSAGE: &str =
    "申し訳ございません。Gemini APIキーが設定されていません。プロフィール画面でAPIキーを設定してください。";

/// Shown when the provider hit its output limit without returning text
pub const TRUNCATED_MESSAGE: &str =
    "申し訳ございませんが、回答が長すぎるため途中で切れてしまいました。より具体的な質問をしていただけますでしょうか。";

/// Why a fixed message was used instead of generated text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    MissingApiKey,
    Truncated,
    EmptyResponse,
    Upstream,
}

/// Outcome of a generation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Generated(String),
    Fallback {
        text: String,
        reason: FallbackReason,
    },
}

/// Where the assistant reply of a turn came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Generated,
    Fallback(FallbackReason),
}

impl Reply {
    fn fallback(text: impl Into<String>, reason: FallbackReason) -> Self {
        Reply::Fallback {
            text: text.into(),
            reason,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Reply::Generated(text) | Reply::Fallback { text, .. } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Reply::Generated(text) | Reply::Fallback { text, .. } => text,
        }
    }

    pub fn source(&self) -> ReplySource {
        match self {
            Reply::Generated(_) => ReplySource::Generated,
            Reply::Fallback { reason, .. } => ReplySource::Fallback(*reason),
        }
    }
}

/// Produces the assistant reply for a specialist and history
#[derive(Clone)]
pub struct ReplyGenerator {
    llm: Arc<dyn LlmService>,
}

impl ReplyGenerator {
    pub fn new(llm: Arc<dyn LlmService>) -> Self {
        Self { llm }
    }

    /// Build the provider input: persona instruction, acknowledgment, then history
    fn build_messages(specialist: SpecialistType, history: &[Message]) -> Vec<LlmMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(LlmMessage::user(specialist.system_prompt()));
        messages.push(LlmMessage::assistant(specialist.acknowledgment()));
        messages.extend(history.iter().map(|m| match m.role {
            MessageRole::User => LlmMessage::user(m.content.clone()),
            MessageRole::Assistant => LlmMessage::assistant(m.content.clone()),
        }));
        messages
    }

    /// Generate a reply. Never fails; see [`Reply`].
    pub async fn generate_reply(
        &self,
        specialist: SpecialistType,
        history: &[Message],
        api_key: Option<&str>,
    ) -> Reply {
        let Some(api_key) = api_key.map(str::trim).filter(|k| !k.is_empty()) else {
            tracing::info!(specialist = %specialist, "No provider key configured");
            return Reply::fallback(MISSING_API_KEY_MESSAGE, FallbackReason::MissingApiKey);
        };

        let request = CompletionRequest {
            api_key: api_key.to_string(),
            model: None,
            messages: Self::build_messages(specialist, history),
        };

        match self.llm.complete(request).await {
            Ok(response) => match response.text {
                Some(text) if !text.trim().is_empty() => Reply::Generated(text),
                _ if response.finish_reason == Some(FinishReason::MaxTokens) => {
                    tracing::warn!(
                        specialist = %specialist,
                        model = %response.model,
                        "Provider reply truncated before any text"
                    );
                    Reply::fallback(TRUNCATED_MESSAGE, FallbackReason::Truncated)
                }
                _ => {
                    tracing::warn!(
                        specialist = %specialist,
                        model = %response.model,
                        finish_reason = ?response.finish_reason,
                        "Provider returned no text"
                    );
                    Reply::fallback(specialist.fallback_message(), FallbackReason::EmptyResponse)
                }
            },
            Err(e) => {
                tracing::warn!(specialist = %specialist, error = %e, "Provider call failed");
                Reply::fallback(specialist.fallback_message(), FallbackReason::Upstream)
            }
        }
    }
}
