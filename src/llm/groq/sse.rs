//! Server-Sent Events (SSE) parser for Groq streaming responses

use bytes::{Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;
use std::pin::Pin;

use crate::llm::core::error::LlmError;

use super::types::ChatCompletionChunk;

/// Sentinel payload closing an OpenAI-style stream
const DONE_SENTINEL: &str = "[DONE]";

/// A parsed frame of the completion stream
#[derive(Debug, Clone)]
pub enum GroqSseEvent {
    Chunk(ChatCompletionChunk),
    Done,
}

/// Parse a stream of bytes as Groq SSE frames
///
/// Groq's SSE format uses bare `data:` lines:
/// ```text
/// data: {"id":"chatcmpl-1","choices":[{"delta":{"content":"Hi"}}]}
///
/// data: [DONE]
///
/// ```
///
/// Raw bytes are buffered until a blank line closes a frame, and only whole
/// frames are decoded as UTF-8. A frame or a multi-byte character split
/// across network chunks is therefore reassembled.
pub fn parse_sse_stream(
    byte_stream: Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>,
) -> Pin<Box<dyn Stream<Item = Result<GroqSseEvent, LlmError>> + Send>> {
    let mut buffer = BytesMut::new();

    let event_stream = byte_stream.flat_map(move |chunk_result| {
        let chunk = match chunk_result {
            Ok(bytes) => bytes,
            Err(e) => {
                return futures::stream::iter(vec![Err(LlmError::Stream(e.to_string()))]);
            }
        };

        // CR never appears unescaped inside a JSON payload
        buffer.extend(chunk.iter().copied().filter(|b| *b != b'\r'));

        let mut events = Vec::new();
        while let Some(frame_end) = find_frame_end(&buffer) {
            let frame = buffer.split_to(frame_end + 2);
            let parsed = match std::str::from_utf8(&frame[..frame_end]) {
                Ok(text) => parse_event(text),
                Err(e) => Some(Err(LlmError::Stream(format!(
                    "Invalid UTF-8 in stream: {}",
                    e
                )))),
            };
            events.extend(parsed);
        }

        futures::stream::iter(events)
    });

    Box::pin(event_stream)
}

/// Offset of the blank line that closes the first buffered frame
fn find_frame_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|pair| pair == b"\n\n")
}

/// Parse a single SSE frame; comment-only frames yield nothing
fn parse_event(event_text: &str) -> Option<Result<GroqSseEvent, LlmError>> {
    let data: Vec<&str> = event_text
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(str::trim)
        .collect();

    if data.is_empty() {
        return None;
    }
    let data = data.join("\n");

    if data == DONE_SENTINEL {
        return Some(Ok(GroqSseEvent::Done));
    }

    match serde_json::from_str::<ChatCompletionChunk>(&data) {
        Ok(chunk) => Some(Ok(GroqSseEvent::Chunk(chunk))),
        Err(e) => Some(Err(LlmError::Decode(format!(
            "Failed to parse Groq SSE chunk: {}. Data: {}",
            e, data
        )))),
    }
}
