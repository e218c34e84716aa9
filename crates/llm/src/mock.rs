//! Mock LLM Service Implementation
//!
//! Used by `LlmServiceFactory` when provider is `"mock"` and by tests that
//! need to script provider behavior or count calls.

use std::sync::{Arc, Mutex};

use crate::{CompletionRequest, CompletionResponse, FinishReason, LlmError, LlmService};

const MOCK_MODEL: &str = "mock-model";

/// Scripted behavior of the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// Answer with `Mock response to: {last message}`
    Echo,
    /// Answer with fixed text
    Text(String),
    /// No text, finish reason `MAX_TOKENS`
    Truncated,
    /// A candidate with no text
    Empty,
    /// Fail with the given error
    Fail(LlmError),
}

/// Mock LLM service for testing
#[derive(Debug, Clone)]
pub struct MockLlmService {
    reply: MockReply,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockLlmService {
    /// Create a new mock LLM service that echoes the last message
    pub fn new() -> Self {
        Self::with_reply(MockReply::Echo)
    }

    pub fn with_reply(reply: MockReply) -> Self {
        Self {
            reply,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of completion calls received
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Requests received so far, oldest first
    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl Default for MockLlmService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmService for MockLlmService {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        tracing::info!("Mock LLM service processing completion request");

        let model = request
            .model
            .clone()
            .unwrap_or_else(|| MOCK_MODEL.to_string());

        let last_message = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_else(|| "empty".to_string());

        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        let (text, finish_reason) = match &self.reply {
            MockReply::Echo => (
                Some(format!("Mock response to: {}", last_message)),
                Some(FinishReason::Stop),
            ),
            MockReply::Text(text) => (Some(text.clone()), Some(FinishReason::Stop)),
            MockReply::Truncated => (None, Some(FinishReason::MaxTokens)),
            MockReply::Empty => (None, Some(FinishReason::Stop)),
            MockReply::Fail(err) => return Err(err.clone()),
        };

        Ok(CompletionResponse {
            text,
            finish_reason,
            model,
        })
    }

    fn default_model(&self) -> &str {
        MOCK_MODEL
    }
}
