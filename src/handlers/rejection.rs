// Turns unmatched routes into JSON errors

use std::convert::Infallible;
use tracing::error;
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::error::error_reply;

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large".to_string())
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Content-Length required".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else {
        error!("unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, format!("{:?}", err))
    };

    Ok(error_reply(status, message))
}
