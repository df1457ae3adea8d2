/// LLM Client: the single point of entry for all Gemini API calls in Pathway.
///
/// ARCHITECTURAL RULE: No other module may call the provider API directly.
/// All LLM interactions MUST go through the `LlmBackend` trait defined here.
///
/// Model: gemini-2.5-flash (hardcoded, not configurable)
///
/// Every call is attempted exactly once. Failures are reported to the caller,
/// never retried.
use async_trait::async_trait;
use bytes::Bytes;
use eventsource_stream::{EventStreamError, Eventsource};
use futures::future;
use futures::stream::{BoxStream, Stream, StreamExt, TryStreamExt};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::ChatMessage;

#[cfg(test)]
pub mod fake;
pub mod prompts;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for all LLM calls in Pathway.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gemini-2.5-flash";
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("malformed event stream: {0}")]
    Stream(String),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Incremental model output. Each item is one text fragment in arrival order.
pub type TextStream = BoxStream<'static, Result<String, LlmError>>;

/// The text-generation service used by every feature module.
///
/// `LlmClient` is the production implementation. Tests substitute a scripted
/// backend so no network is involved.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Free-text generation: one prompt in, the full response text out.
    async fn generate_text(&self, prompt: &str) -> Result<String, LlmError>;

    /// Schema-constrained generation. Returns the raw JSON text.
    async fn generate_json(&self, prompt: &str, schema: &Value) -> Result<String, LlmError>;

    /// One blocking turn of a conversation with persona `system`.
    async fn converse(
        &self,
        system: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, LlmError>;

    /// One streaming turn of a conversation with persona `system`.
    async fn converse_stream(
        &self,
        system: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<TextStream, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
}

impl<'a> GenerateContentRequest<'a> {
    fn prompt(prompt: &'a str) -> Self {
        Self {
            contents: vec![Content::user(prompt)],
            system_instruction: None,
            generation_config: None,
        }
    }

    fn conversation(system: &'a str, history: &'a [ChatMessage], message: &'a str) -> Self {
        let mut contents: Vec<Content<'a>> = history
            .iter()
            .map(|m| Content {
                role: m.role.as_str(),
                parts: vec![Part { text: &m.text }],
            })
            .collect();
        contents.push(Content::user(message));

        Self {
            contents,
            system_instruction: Some(SystemInstruction {
                parts: vec![Part { text: system }],
            }),
            generation_config: None,
        }
    }
}

impl<'a> Content<'a> {
    fn user(text: &'a str) -> Self {
        Self {
            role: "user",
            parts: vec![Part { text }],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl LlmResponse {
    fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }

    /// Concatenated text of all parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<u16>,
    message: String,
}

/// One server-sent event of a streaming call: either a partial response or an error.
#[derive(Debug, Deserialize)]
struct StreamPayload {
    #[serde(flatten)]
    response: LlmResponse,
    error: Option<ApiErrorBody>,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single LLM client used by all services in Pathway.
/// Wraps the Gemini `generateContent` REST endpoints.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, api_key })
    }

    /// Makes one call to `generateContent`, returning the full response object.
    async fn call(&self, request: &GenerateContentRequest<'_>) -> Result<LlmResponse, LlmError> {
        let response = self
            .client
            .post(format!("{GEMINI_API_BASE}/{MODEL}:generateContent"))
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let response = check_status(response).await?;
        let llm_response: LlmResponse = response.json().await?;

        if let Some(usage) = &llm_response.usage_metadata {
            debug!(
                "LLM call succeeded: prompt_tokens={}, output_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(llm_response)
    }

    async fn call_text(&self, request: &GenerateContentRequest<'_>) -> Result<String, LlmError> {
        let response = self.call(request).await?;
        response.text().ok_or_else(|| {
            warn!(
                "LLM returned no text (finish reason: {})",
                response.finish_reason().unwrap_or("none")
            );
            LlmError::EmptyContent
        })
    }

    /// Opens a `streamGenerateContent` call and yields non-empty text fragments.
    async fn call_stream(
        &self,
        request: &GenerateContentRequest<'_>,
    ) -> Result<TextStream, LlmError> {
        let response = self
            .client
            .post(format!("{GEMINI_API_BASE}/{MODEL}:streamGenerateContent"))
            .query(&[("alt", "sse")])
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(sse_text_stream(response.bytes_stream()))
    }
}

#[async_trait]
impl LlmBackend for LlmClient {
    async fn generate_text(&self, prompt: &str) -> Result<String, LlmError> {
        self.call_text(&GenerateContentRequest::prompt(prompt)).await
    }

    async fn generate_json(&self, prompt: &str, schema: &Value) -> Result<String, LlmError> {
        let mut request = GenerateContentRequest::prompt(prompt);
        request.generation_config = Some(GenerationConfig {
            response_mime_type: "application/json",
            response_schema: schema,
        });
        self.call_text(&request).await
    }

    async fn converse(
        &self,
        system: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, LlmError> {
        self.call_text(&GenerateContentRequest::conversation(system, history, message))
            .await
    }

    async fn converse_stream(
        &self,
        system: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<TextStream, LlmError> {
        self.call_stream(&GenerateContentRequest::conversation(system, history, message))
            .await
    }
}

/// Maps non-2xx responses to `LlmError::Api`, preferring the provider's error message.
async fn check_status(response: Response) -> Result<Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!("LLM API returned {}: {}", status, body);
    let message = serde_json::from_str::<ApiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    Err(LlmError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Turns an SSE response body into a stream of non-empty text fragments.
fn sse_text_stream<S>(body: S) -> TextStream
where
    S: Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
{
    body.eventsource()
        .map(|event| match event {
            Ok(event) if event.data.is_empty() => Ok(String::new()),
            Ok(event) => parse_stream_payload(&event.data),
            Err(EventStreamError::Transport(e)) => Err(LlmError::Http(e)),
            Err(e) => Err(LlmError::Stream(e.to_string())),
        })
        .try_filter(|fragment| future::ready(!fragment.is_empty()))
        .boxed()
}

/// Text carried by one streamed event. Empty when the event has no text parts.
fn parse_stream_payload(payload: &str) -> Result<String, LlmError> {
    let parsed: StreamPayload = serde_json::from_str(payload)?;
    if let Some(error) = parsed.error {
        return Err(LlmError::Api {
            status: error.code.unwrap_or(500),
            message: error.message,
        });
    }
    if let Some(reason) = parsed.response.finish_reason() {
        debug!("LLM stream finished: {reason}");
    }
    Ok(parsed.response.text().unwrap_or_default())
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
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
