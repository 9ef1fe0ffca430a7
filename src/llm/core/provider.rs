//! Provider trait for LLM implementations

use async_trait::async_trait;
use futures::stream::Stream;
use std::pin::Pin;

use super::{
    error::LlmError,
    types::{ChatRequest, ChatResponse, StreamEvent},
};

/// Boxed stream of generation events
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send>>;

/// Main interface that all chat-completion providers must satisfy
///
/// Implementations carry their own fixed model identifier and leave
/// sampling parameters at the provider's defaults; callers only supply
/// messages.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Generate a full completion in one round-trip
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError>;

    /// Generate a completion as a stream of incremental events
    ///
    /// The stream ends after a [`StreamEvent::Finished`] event or the first error.
    async fn stream_complete(&self, request: ChatRequest) -> Result<EventStream, LlmError>;

    /// Model identifier sent with every request
    fn model(&self) -> &str;
}
