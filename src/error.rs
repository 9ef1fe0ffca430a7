//! Gateway errors and their HTTP mapping

use thiserror::Error;
use warp::http::StatusCode;

use crate::llm::LlmError;
use crate::models::ErrorResponse;
use crate::store;

/// Errors raised by the expense and advisory gateways
///
/// Only [`GatewayError::Validation`] is the caller's fault; every other
/// variant is reported as an internal failure.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Required request fields are missing or have the wrong shape
    #[error("{0}")]
    Validation(String),

    /// Document store failure
    #[error(transparent)]
    Store(#[from] store::Error),

    /// Chat-completion failure
    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl GatewayError {
    /// Status code reported to the caller
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::Store(_) | GatewayError::Llm(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// `{error: <message>}` reply with the matching status
    pub fn into_reply(self) -> warp::reply::WithStatus<warp::reply::Json> {
        let status = self.status();
        error_reply(status, self.to_string())
    }
}

/// Build an `{error: <message>}` JSON reply
pub fn error_reply(
    status: StatusCode,
    message: impl Into<String>,
) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&ErrorResponse {
            error: message.into(),
        }),
        status,
    )
}
