// GET / and GET /test-db handlers

use chrono::Utc;
use serde_json::{json, Map, Value};
use std::convert::Infallible;
use tracing::{error, info};
use warp::http::StatusCode;
use warp::Reply;

use crate::error::error_reply;
use crate::models::{DiagnosticResponse, MessageResponse};
use crate::state::AppState;
use crate::store::DocumentStore;

const DIAGNOSTIC_COLLECTION: &str = "test";
const DIAGNOSTIC_DOCUMENT: &str = "sample";

pub async fn home_handler() -> Result<warp::reply::Response, Infallible> {
    Ok(warp::reply::json(&MessageResponse {
        message: "Gullak backend running!".to_string(),
    })
    .into_response())
}

pub async fn test_db_handler(state: AppState) -> Result<warp::reply::Response, Infallible> {
    info!("GET /test-db");

    match write_and_read_back(state.store.as_ref()).await {
        Ok(Some(document)) => Ok(warp::reply::json(&DiagnosticResponse {
            message: "Document store connected successfully!".to_string(),
            document,
        })
        .into_response()),
        Ok(None) => {
            error!("diagnostic document missing after write");
            Ok(error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                "diagnostic document missing after write",
            )
            .into_response())
        }
        Err(e) => {
            error!("Store diagnostic error: {}", e);
            Ok(error_reply(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response())
        }
    }
}

async fn write_and_read_back(
    store: &dyn DocumentStore,
) -> crate::store::Result<Option<crate::store::Document>> {
    let fields: Map<String, Value> = match json!({
        "name": "gullak",
        "status": "connected",
        "checkedAt": Utc::now().to_rfc3339(),
    }) {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    store
        .set(DIAGNOSTIC_COLLECTION, DIAGNOSTIC_DOCUMENT, fields)
        .await?;
    store.get(DIAGNOSTIC_COLLECTION, DIAGNOSTIC_DOCUMENT).await
}
