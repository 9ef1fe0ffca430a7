//! Groq provider implementation
//!
//! Groq serves open models behind an OpenAI-compatible chat-completion API.

pub mod client;
pub mod sse;
pub mod types;

pub use client::{GroqClient, GroqConfig, DEFAULT_MODEL, GROQ_BASE_URL};
