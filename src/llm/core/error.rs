//! Failures of a chat-completion call
//!
//! Variants follow what the Groq endpoint can actually hand back: a rejected
//! key, a rate limit, an OpenAI-style error envelope on any other status, a
//! broken connection or SSE stream, or a body that doesn't fit the schema.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    /// API key rejected (401/403)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// 429, with the `retry-after` delay when Groq sends one
    #[error("Rate limited (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },

    /// Any other error status; `message` and `code` come from the error
    /// envelope when the body carries one, else `message` is the raw body
    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
    },

    /// No response at all: connect, TLS or timeout failures
    #[error("Transport error: {0}")]
    Transport(String),

    /// The SSE body broke off or held invalid UTF-8
    #[error("Stream error: {0}")]
    Stream(String),

    /// A response or stream frame that doesn't match the completion schema
    #[error("Decode error: {0}")]
    Decode(String),

    /// Rejected before sending: empty key or empty conversation
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A 200 completion without any choices
    #[error("completion contained no choices")]
    EmptyCompletion,
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LlmError::Decode(err.to_string())
        } else {
            LlmError::Transport(err.to_string())
        }
    }
}
