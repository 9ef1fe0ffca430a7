// /expenses handlers

use bytes::Bytes;
use serde_json::Value;
use std::convert::Infallible;
use tracing::{error, info, warn};
use warp::Reply;

use crate::error::GatewayError;
use crate::expenses::INVALID_DATA;
use crate::models::{AddExpenseRequest, ExpenseCreatedResponse, ListExpensesQuery, MessageResponse};
use crate::state::AppState;

/// Log and render a gateway failure
fn failure(context: &str, err: GatewayError) -> warp::reply::Response {
    match &err {
        GatewayError::Validation(message) => warn!("{}: {}", context, message),
        _ => error!("{}: {}", context, err),
    }
    err.into_reply().into_response()
}

/// Only a JSON object counts as an expense body
fn parse_expense_body(body: &[u8]) -> Option<AddExpenseRequest> {
    match serde_json::from_slice::<Value>(body).ok()? {
        object @ Value::Object(_) => serde_json::from_value(object).ok(),
        _ => None,
    }
}

// POST /expenses/add
pub async fn add_expense_handler(
    state: AppState,
    body: Bytes,
) -> Result<warp::reply::Response, Infallible> {
    info!("POST /expenses/add");

    let request = match parse_expense_body(&body) {
        Some(request) => request,
        None => {
            return Ok(failure(
                "add expense",
                GatewayError::Validation(INVALID_DATA.to_string()),
            ))
        }
    };

    match state.expenses.add(request).await {
        Ok(doc) => Ok(warp::reply::json(&ExpenseCreatedResponse {
            message: "Expense added successfully!".to_string(),
            id: doc.id,
        })
        .into_response()),
        Err(e) => Ok(failure("add expense", e)),
    }
}

// GET /expenses/all
pub async fn list_expenses_handler(
    query: ListExpensesQuery,
    state: AppState,
) -> Result<warp::reply::Response, Infallible> {
    info!("GET /expenses/all");

    match state.expenses.list(query.user_id.as_deref()).await {
        Ok(docs) => Ok(warp::reply::json(&docs).into_response()),
        Err(e) => Ok(failure("list expenses", e)),
    }
}

// DELETE /expenses/delete/{id}
pub async fn delete_expense_handler(
    id: String,
    state: AppState,
) -> Result<warp::reply::Response, Infallible> {
    info!("DELETE /expenses/delete/{}", id);

    match state.expenses.delete(&id).await {
        Ok(()) => Ok(warp::reply::json(&MessageResponse {
            message: "Expense deleted successfully!".to_string(),
        })
        .into_response()),
        Err(e) => Ok(failure("delete expense", e)),
    }
}
