//! Groq client implementation

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::debug;

use crate::llm::core::{
    error::LlmError,
    provider::{ChatProvider, EventStream},
    types::{ChatRequest, ChatResponse, StreamEvent, UsageMetadata},
};

use super::sse::{parse_sse_stream, GroqSseEvent};
use super::types::{ChatCompletionRequest, ChatCompletionResponse, ErrorEnvelope};

/// Groq's OpenAI-compatible API root
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Model used for every advisory request
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Groq connection settings
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// API key sent as a bearer token
    pub api_key: String,
    /// API root (no trailing slash)
    pub base_url: String,
    /// Fixed model identifier
    pub model: String,
}

impl GroqConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: GROQ_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Point at a different OpenAI-compatible endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Client for Groq chat completions
pub struct GroqClient {
    http_client: Client,
    config: GroqConfig,
}

impl GroqClient {
    /// Create a new Groq client
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or the HTTP client cannot be built.
    pub fn new(config: GroqConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::InvalidRequest("Groq API key is empty".to_string()));
        }

        let http_client = Client::builder()
            .build()
            .map_err(|e| LlmError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn endpoint_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Send a completion request and reject non-success statuses
    async fn send(&self, request: ChatRequest, stream: bool) -> Result<Response, LlmError> {
        if request.messages.is_empty() {
            return Err(LlmError::InvalidRequest("no messages to send".to_string()));
        }

        let body = ChatCompletionRequest::from_request(&self.config.model, request, stream);
        debug!(model = %body.model, messages = body.messages.len(), stream, "sending chat completion");

        let response = self
            .http_client
            .post(self.endpoint_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        let body = response.text().await.unwrap_or_default();

        Err(map_error_status(status, body, retry_after))
    }
}

/// Translate an error status into the matching [`LlmError`]
fn map_error_status(status: StatusCode, body: String, retry_after: Option<Duration>) -> LlmError {
    let (message, code) = match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => (envelope.error.message, envelope.error.code),
        Err(_) => (body, None),
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Authentication(message),
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited { retry_after },
        _ => LlmError::Api {
            status: status.as_u16(),
            message,
            code,
        },
    }
}

/// Pull the first choice out of a completed response
fn into_chat_response(response: ChatCompletionResponse) -> Result<ChatResponse, LlmError> {
    let usage = response.usage.map(UsageMetadata::from);
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(LlmError::EmptyCompletion)?;

    Ok(ChatResponse {
        text: choice.message.content.unwrap_or_default().trim().to_string(),
        finish_reason: choice.finish_reason,
        usage,
    })
}

/// Map one SSE frame onto zero or more abstract events
fn from_groq_event(event: GroqSseEvent, finished: &mut bool) -> Vec<StreamEvent> {
    let mut events = Vec::new();
    match event {
        GroqSseEvent::Chunk(chunk) => {
            let usage = chunk.x_groq.and_then(|x| x.usage).map(UsageMetadata::from);
            for choice in chunk.choices {
                if let Some(text) = choice.delta.content.filter(|t| !t.is_empty()) {
                    events.push(StreamEvent::TextDelta { text });
                }
                if choice.finish_reason.is_some() && !*finished {
                    *finished = true;
                    events.push(StreamEvent::Finished {
                        finish_reason: choice.finish_reason,
                        usage,
                    });
                }
            }
        }
        GroqSseEvent::Done => {
            if !*finished {
                *finished = true;
                events.push(StreamEvent::Finished {
                    finish_reason: None,
                    usage: None,
                });
            }
        }
    }
    events
}

#[async_trait]
impl ChatProvider for GroqClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        let response = self.send(request, false).await?;
        let completion: ChatCompletionResponse = response.json().await?;
        into_chat_response(completion)
    }

    async fn stream_complete(&self, request: ChatRequest) -> Result<EventStream, LlmError> {
        let response = self.send(request, true).await?;
        let sse_stream = parse_sse_stream(Box::pin(response.bytes_stream()));

        let mut finished = false;
        let event_stream = sse_stream.flat_map(move |result| match result {
            Ok(event) => futures::stream::iter(
                from_groq_event(event, &mut finished)
                    .into_iter()
                    .map(Ok)
                    .collect::<Vec<Result<StreamEvent, LlmError>>>(),
            ),
            Err(e) => futures::stream::iter(vec![Err(e)]),
        });

        Ok(Box::pin(event_stream))
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
