//! Structured extraction: turn raw text into a schema-shaped JSON object.

pub mod client;
pub mod fallback;
pub mod prompt;

use serde_json::{Map, Value};

pub use client::{ChatMessage, CompletionRequest, LlmClient, OpenAiClient};
pub use fallback::fallback_from_schema;

use crate::error::ExtractError;

/// Default character budget for LLM input text.
pub const DEFAULT_MAX_TEXT_CHARS: usize = 120_000;

/// Extracts a JSON object matching a schema's shape from raw document text.
///
/// With a configured client the LLM is asked for strict JSON; without one the
/// extractor runs in fallback mode and synthesizes a content-free object from
/// the schema. The returned object is not yet validated against the schema.
pub struct StructuredExtractor {
    llm: Option<Box<dyn LlmClient>>,
    model: String,
    max_text_chars: usize,
}

impl StructuredExtractor {
    /// Extractor backed by an LLM client.
    pub fn new(llm: Box<dyn LlmClient>, model: impl Into<String>, max_text_chars: usize) -> Self {
        Self {
            llm: Some(llm),
            model: model.into(),
            max_text_chars,
        }
    }

    /// Extractor with no LLM credential: every call uses fallback mode.
    pub fn offline() -> Self {
        Self {
            llm: None,
            model: String::new(),
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
        }
    }

    /// Whether an LLM client is configured.
    pub fn has_llm(&self) -> bool {
        self.llm.is_some()
    }

    pub fn extract(
        &self,
        text: &str,
        json_schema: &Value,
    ) -> Result<Map<String, Value>, ExtractError> {
        let _span = tracing::info_span!("llm.extract_structured").entered();

        let Some(llm) = &self.llm else {
            log::warn!("no LLM credential configured, using schema fallback output");
            return Ok(fallback_from_schema(json_schema));
        };

        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(prompt::SYSTEM_PROMPT),
                ChatMessage::user(prompt::build_user_prompt(
                    json_schema,
                    text,
                    self.max_text_chars,
                )),
            ],
            temperature: 0.0,
            json_response: true,
        };

        let content = llm.complete(&request)?;
        parse_llm_output(&content)
    }
}

/// Parses LLM output into a JSON object. Empty content, non-JSON content, and
/// JSON that is not an object are all fatal — no retry, no repair attempt.
fn parse_llm_output(content: &str) -> Result<Map<String, Value>, ExtractError> {
    if content.trim().is_empty() {
        return Err(ExtractError::EmptyContent);
    }

    let parsed: Value = serde_json::from_str(content).map_err(ExtractError::InvalidJson)?;

    match parsed {
        Value::Object(map) => Ok(map),
        _ => Err(ExtractError::NotAnObject),
    }
}
