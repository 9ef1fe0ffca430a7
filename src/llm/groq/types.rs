//! Groq request and response types
//!
//! Groq exposes the OpenAI chat-completion schema; only the fields this
//! service reads or sends are modelled.

use serde::{Deserialize, Serialize};

use crate::llm::core::types::{ChatMessage, ChatRequest, UsageMetadata};

/// Body of `POST /chat/completions`
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
}

impl ChatCompletionRequest {
    /// Map an abstract request onto the wire format for the given model
    pub fn from_request(model: &str, request: ChatRequest, stream: bool) -> Self {
        Self {
            model: model.to_string(),
            messages: request.messages,
            stream,
        }
    }
}

/// Non-streaming response
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<CompletionUsage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub role: String,
    pub content: Option<String>,
}

/// Token accounting in OpenAI naming
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CompletionUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

impl From<CompletionUsage> for UsageMetadata {
    fn from(usage: CompletionUsage) -> Self {
        UsageMetadata::new(usage.prompt_tokens, usage.completion_tokens)
    }
}

/// One `data:` frame of a streaming response
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
    /// Groq reports usage on the final chunk under `x_groq`
    pub x_groq: Option<GroqExtension>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkDelta {
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroqExtension {
    pub usage: Option<CompletionUsage>,
}

/// Error envelope returned with non-2xx statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub code: Option<String>,
}
