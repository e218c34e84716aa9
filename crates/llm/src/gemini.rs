//! Google Gemini HTTP Client Implementation
//!
//! POSTs to `{base_url}/v1/models/{model}:generateContent`. The key travels in
//! the `x-goog-api-key` header so it never appears in request URLs or logs.

use serde::{Deserialize, Serialize};

use crate::{
    CompletionRequest, CompletionResponse, FinishReason, GenerationParams, LlmConfig, LlmError,
    LlmMessage, LlmRole, LlmService,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Real Gemini client
pub struct GeminiService {
    http: reqwest::Client,
    base_url: String,
    default_model: String,
    generation: GenerationParams,
}

impl GeminiService {
    /// Create a new Gemini client from configuration.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            http,
            base_url,
            default_model: config.default_model,
            generation: config.generation,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1/models/{}:generateContent", self.base_url, model)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

impl From<GenerationParams> for GenerationConfig {
    fn from(params: GenerationParams) -> Self {
        Self {
            temperature: params.temperature,
            top_k: params.top_k,
            top_p: params.top_p,
            max_output_tokens: params.max_output_tokens,
        }
    }
}

impl<'a> From<&'a LlmMessage> for Content<'a> {
    fn from(message: &'a LlmMessage) -> Self {
        let role = match message.role {
            LlmRole::User => "user",
            LlmRole::Assistant => "model",
        };
        Self {
            role,
            parts: [Part {
                text: &message.content,
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn request_error(err: reqwest::Error) -> LlmError {
    if err.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::Request(err.to_string())
    }
}

/// Concatenate the text parts of the first candidate; `None` when there is no text
fn candidate_text(candidate: &Candidate) -> Option<String> {
    let text: String = candidate
        .content
        .as_ref()?
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[async_trait::async_trait]
impl LlmService for GeminiService {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.default_model.clone());

        let body = GenerateContentBody {
            contents: request.messages.iter().map(Content::from).collect(),
            generation_config: self.generation.into(),
        };

        tracing::debug!(
            model = %model,
            turns = body.contents.len(),
            "Sending Gemini generateContent request"
        );

        let response = self
            .http
            .post(self.endpoint(&model))
            .header(API_KEY_HEADER, &request.api_key)
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimit);
        }

        if !status.is_success() {
            let raw = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".to_string());
            let detail = serde_json::from_str::<ErrorEnvelope>(&raw)
                .ok()
                .and_then(|envelope| {
                    let ErrorBody { message, status } = envelope.error;
                    match (status, message) {
                        (Some(s), Some(m)) => Some(format!("{}: {}", s, m)),
                        (None, Some(m)) => Some(m),
                        (Some(s), None) => Some(s),
                        (None, None) => None,
                    }
                })
                .unwrap_or(raw);
            return Err(LlmError::Response(format!(
                "Gemini API returned {}: {}",
                status, detail
            )));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout
            } else {
                LlmError::Response(format!("Malformed Gemini response: {}", e))
            }
        })?;

        let Some(candidate) = parsed.candidates.first() else {
            tracing::debug!(model = %model, "Gemini response carried no candidates");
            return Ok(CompletionResponse {
                text: None,
                finish_reason: None,
                model,
            });
        };

        Ok(CompletionResponse {
            text: candidate_text(candidate),
            finish_reason: candidate.finish_reason.as_deref().map(FinishReason::parse),
            model,
        })
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}
