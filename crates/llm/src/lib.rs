//! Soudan LLM Service
//!
//! Provides text generation behind the `LlmService` trait with support for:
//! - Google Gemini `generateContent` API for production
//! - Mock LLM service for testing and development
//! - Generation parameters fixed per process through `LlmConfig`

pub mod gemini;
pub mod mock;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    #[error("LLM configuration error: {0}")]
    Configuration(String),

    #[error("LLM request error: {0}")]
    Request(String),

    #[error("LLM request timed out")]
    Timeout,

    #[error("LLM rate limit exceeded")]
    RateLimit,

    #[error("LLM response error: {0}")]
    Response(String),
}

/// Speaker of a message sent to the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmRole {
    User,
    Assistant,
}

/// One turn of provider input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmMessage {
    pub role: LlmRole,
    pub content: String,
}

impl LlmMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: LlmRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: LlmRole::Assistant,
            content: content.into(),
        }
    }
}

/// Sampling parameters sent with every request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 24576,
        }
    }
}

/// Completion request
#[derive(Clone)]
pub struct CompletionRequest {
    /// Provider key the call is billed to
    pub api_key: String,
    /// Model override; the service default is used when `None`
    pub model: Option<String>,
    pub messages: Vec<LlmMessage>,
}

impl std::fmt::Debug for CompletionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionRequest")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("messages", &self.messages.len())
            .finish()
    }
}

/// Why the provider stopped generating
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Safety,
    Other(String),
}

impl FinishReason {
    /// Parse the provider's finish reason string
    pub fn parse(raw: &str) -> Self {
        match raw {
            "STOP" => FinishReason::Stop,
            "MAX_TOKENS" => FinishReason::MaxTokens,
            "SAFETY" => FinishReason::Safety,
            other => FinishReason::Other(other.to_string()),
        }
    }
}

/// Completion response
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    /// Generated text, if the provider returned any text parts
    pub text: Option<String>,
    pub finish_reason: Option<FinishReason>,
    pub model: String,
}

/// LLM service configuration.
#[derive(Clone)]
pub struct LlmConfig {
    /// LLM provider (gemini, mock)
    pub provider: String,
    /// Base URL override for the provider API
    pub base_url: Option<String>,
    pub default_model: String,
    pub generation: GenerationParams,
    /// Per-request timeout; the HTTP client default applies when `None`
    pub request_timeout: Option<Duration>,
    /// Server-wide key used when a user has not configured their own
    pub default_api_key: Option<String>,
}

impl std::fmt::Debug for LlmConfig {
    #[mutants::skip] // Formatting only; secrets are covered by test_config_debug_redacts_key
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("generation", &self.generation)
            .field("request_timeout", &self.request_timeout)
            .field(
                "default_api_key",
                &self.default_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            base_url: None,
            default_model: DEFAULT_MODEL.to_string(),
            generation: GenerationParams::default(),
            request_timeout: None,
            default_api_key: None,
        }
    }
}

impl LlmConfig {
    /// Create LLM config from environment variables.
    pub fn from_env() -> Result<Self, LlmError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create LLM config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parse<T: std::str::FromStr>(key: &str, raw: Option<String>) -> Result<Option<T>, LlmError> {
            raw.map(|v| {
                v.trim()
                    .parse::<T>()
                    .map_err(|_| LlmError::Configuration(format!("{} has an invalid value", key)))
            })
            .transpose()
        }

        let defaults = GenerationParams::default();
        let generation = GenerationParams {
            temperature: parse("LLM_TEMPERATURE", lookup("LLM_TEMPERATURE"))?
                .unwrap_or(defaults.temperature),
            top_k: parse("LLM_TOP_K", lookup("LLM_TOP_K"))?.unwrap_or(defaults.top_k),
            top_p: parse("LLM_TOP_P", lookup("LLM_TOP_P"))?.unwrap_or(defaults.top_p),
            max_output_tokens: parse("LLM_MAX_OUTPUT_TOKENS", lookup("LLM_MAX_OUTPUT_TOKENS"))?
                .unwrap_or(defaults.max_output_tokens),
        };

        let request_timeout = parse::<u64>(
            "LLM_REQUEST_TIMEOUT_SECS",
            lookup("LLM_REQUEST_TIMEOUT_SECS"),
        )?
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs);

        Ok(Self {
            provider: lookup("LLM_PROVIDER").unwrap_or_else(|| "gemini".to_string()),
            base_url: lookup("GEMINI_BASE_URL").filter(|v| !v.is_empty()),
            default_model: lookup("GEMINI_MODEL")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            generation,
            request_timeout,
            default_api_key: lookup("GEMINI_API_KEY").filter(|v| !v.trim().is_empty()),
        })
    }
}

/// LLM service trait for different implementations.
#[async_trait::async_trait]
pub trait LlmService: Send + Sync {
    /// Run one completion. Every failure mode is reported as `LlmError`.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Model used when a request does not name one
    fn default_model(&self) -> &str;
}

/// Factory for creating LlmService implementations.
pub struct LlmServiceFactory;

impl LlmServiceFactory {
    /// Create an LlmService based on configuration.
    pub fn create(config: LlmConfig) -> Result<Box<dyn LlmService>, LlmError> {
        match config.provider.as_str() {
            "gemini" => {
                tracing::info!(model = %config.default_model, "Creating Gemini LLM service");
                Ok(Box::new(gemini::GeminiService::new(config)?))
            }
            "mock" => {
                tracing::info!("Creating mock LLM service");
                Ok(Box::new(mock::MockLlmService::new()))
            }
            provider => Err(LlmError::Configuration(format!(
                "Unknown LLM provider: {}. Supported providers: gemini, mock",
                provider
            ))),
        }
    }
}
