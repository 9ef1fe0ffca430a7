// GET /groq-influencers handler

use std::convert::Infallible;
use tracing::{error, info};
use warp::Reply;

use crate::models::InfluencersResponse;
use crate::state::AppState;

/// Always 200; an upstream failure is reported in the body
pub async fn influencers_handler(state: AppState) -> Result<warp::reply::Response, Infallible> {
    info!("GET /groq-influencers");

    let list = state.advisory.list_influencers().await;
    if let Some(e) = &list.error {
        error!("Groq influencers error: {}", e);
    }

    Ok(warp::reply::json(&InfluencersResponse {
        influencers: list.influencers,
        error: list.error,
    })
    .into_response())
}
