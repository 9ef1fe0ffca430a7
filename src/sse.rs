use std::convert::Infallible;
use warp::sse::Event;

use crate::llm::{LlmError, StreamEvent};

/// Create an advice_chunk SSE event carrying a piece of the reply
pub fn create_advice_chunk_event(chunk: String) -> Result<Event, Infallible> {
    let payload = serde_json::json!({ "chunk": chunk });

    Ok(Event::default()
        .event("advice_chunk")
        .data(payload.to_string()))
}

/// Create a done SSE event to signal stream completion
pub fn create_done_event(finish_reason: Option<String>) -> Result<Event, Infallible> {
    let payload = match finish_reason {
        Some(reason) => serde_json::json!({ "finish_reason": reason }),
        None => serde_json::json!({}),
    };

    Ok(Event::default().event("done").data(payload.to_string()))
}

/// Create an error SSE event; the stream ends after it
pub fn create_error_event(message: String) -> Result<Event, Infallible> {
    let payload = serde_json::json!({ "error": message });

    Ok(Event::default().event("error").data(payload.to_string()))
}

/// Map one provider stream item onto the SSE event sent to the caller
pub fn to_sse_event(item: Result<StreamEvent, LlmError>) -> Result<Event, Infallible> {
    match item {
        Ok(StreamEvent::TextDelta { text }) => create_advice_chunk_event(text),
        Ok(StreamEvent::Finished { finish_reason, .. }) => create_done_event(finish_reason),
        Err(e) => create_error_event(e.to_string()),
    }
}
