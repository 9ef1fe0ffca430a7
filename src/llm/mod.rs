//! LLM Abstraction Layer
//!
//! A small chat-completion interface plus the Groq client that backs the
//! advisory endpoints.

pub mod core;
pub mod groq;

// Re-export commonly used types
pub use core::{
    error::LlmError,
    provider::{ChatProvider, EventStream},
    types::{ChatMessage, ChatRequest, ChatResponse, ChatRole, StreamEvent, UsageMetadata},
};

pub use groq::{GroqClient, GroqConfig};
