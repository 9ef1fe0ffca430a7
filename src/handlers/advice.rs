// POST /ai-advice and POST /ai-advice/stream handlers

use bytes::Bytes;
use futures::StreamExt;
use std::convert::Infallible;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, info};
use warp::http::StatusCode;
use warp::sse::Event;
use warp::Reply;

use crate::error::error_reply;
use crate::llm::EventStream;
use crate::models::{AdviceRequest, AdviceResponse};
use crate::sse::to_sse_event;
use crate::state::AppState;

const SSE_CHANNEL_CAPACITY: usize = 32;

/// Any failure here, including a malformed body, is a 500
fn internal_error(message: String) -> warp::reply::Response {
    error!("AI Error: {}", message);
    error_reply(StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}

/// Drain the provider stream on its own task and hand SSE events over a channel
///
/// The stream ends after the first error event, or when the client goes away.
fn forward_events(mut stream: EventStream) -> ReceiverStream<Result<Event, Infallible>> {
    let (tx, rx) = mpsc::channel(SSE_CHANNEL_CAPACITY);

    tokio::spawn(async move {
        while let Some(item) = stream.next().await {
            let failed = item.is_err();
            if tx.send(to_sse_event(item)).await.is_err() {
                debug!("advice stream client disconnected");
                break;
            }
            if failed {
                break;
            }
        }
    });

    ReceiverStream::new(rx)
}

pub async fn advice_handler(
    state: AppState,
    body: Bytes,
) -> Result<warp::reply::Response, Infallible> {
    let request = match serde_json::from_slice::<AdviceRequest>(&body) {
        Ok(request) => request,
        Err(e) => return Ok(internal_error(e.to_string())),
    };
    info!(user_id = ?request.resolved_user_id(), "POST /ai-advice");

    match state.advisory.advise(&request).await {
        Ok(advice) => Ok(warp::reply::json(&AdviceResponse { advice }).into_response()),
        Err(e) => Ok(internal_error(e.to_string())),
    }
}

pub async fn advice_stream_handler(
    state: AppState,
    body: Bytes,
) -> Result<warp::reply::Response, Infallible> {
    let request = match serde_json::from_slice::<AdviceRequest>(&body) {
        Ok(request) => request,
        Err(e) => return Ok(internal_error(e.to_string())),
    };
    info!(user_id = ?request.resolved_user_id(), "POST /ai-advice/stream");

    match state.advisory.advise_stream(&request).await {
        Ok(stream) => {
            let event_stream = forward_events(stream);
            Ok(warp::sse::reply(warp::sse::keep_alive().stream(event_stream)).into_response())
        }
        Err(e) => Ok(internal_error(e.to_string())),
    }
}
