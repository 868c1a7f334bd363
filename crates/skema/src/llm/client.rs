//! LLM client capability and its OpenAI-compatible implementation.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

/// Maximum length for error bodies included in error messages, to keep
/// responses out of logs.
const MAX_ERROR_BODY_LENGTH: usize = 200;

/// Request timeout for completion calls. The pipeline has no timeout of its
/// own; this is the only bound on a hung LLM call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// A single chat message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A completion request: model, messages, sampling temperature, and whether
/// the response must be a single JSON object.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub json_response: bool,
}

/// Capability contract for the LLM collaborator.
pub trait LlmClient: Send + Sync {
    /// Performs one blocking completion call and returns the raw response
    /// text. No retries.
    fn complete(&self, request: &CompletionRequest) -> Result<String, ExtractError>;
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Blocking client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: SecretString,
}

impl OpenAiClient {
    pub fn new(base_url: impl Into<String>, api_key: SecretString) -> Result<Self, ExtractError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

impl LlmClient for OpenAiClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, ExtractError> {
        let _span = tracing::info_span!("llm.complete", model = %request.model).entered();

        let body = ChatCompletionBody {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            response_format: request.json_response.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ExtractError::Api {
                status: status.as_u16(),
                body: truncate_error_body(&body),
            });
        }

        let parsed: ChatCompletionResponse = response.json().map_err(|e| {
            ExtractError::MalformedResponse(format!("Failed to decode completion response: {}", e))
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        Ok(content)
    }
}

/// Truncates an API error body so error messages stay bounded.
fn truncate_error_body(body: &str) -> String {
    if body.chars().count() > MAX_ERROR_BODY_LENGTH {
        let truncated: String = body.chars().take(MAX_ERROR_BODY_LENGTH).collect();
        format!("{}... (truncated)", truncated)
    } else {
        body.to_string()
    }
}
