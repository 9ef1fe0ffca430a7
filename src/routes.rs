// Route definitions

use std::convert::Infallible;
use warp::Filter;

use crate::handlers;
use crate::models::ListExpensesQuery;
use crate::state::AppState;

/// Largest request body accepted by any route
pub const MAX_BODY_BYTES: u64 = 64 * 1024;

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn raw_body() -> impl Filter<Extract = (bytes::Bytes,), Error = warp::Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::bytes())
}

pub fn configure_routes(
    state: AppState,
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
    // GET /
    let home = warp::path::end()
        .and(warp::get())
        .and_then(handlers::home_handler);

    // GET /test-db
    let test_db = warp::path("test-db")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::test_db_handler);

    let expenses = warp::path("expenses");

    // POST /expenses/add
    let add_expense = expenses
        .and(warp::path("add"))
        .and(warp::path::end())
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(raw_body())
        .and_then(handlers::add_expense_handler);

    // GET /expenses/all[?userId=]
    let list_expenses = expenses
        .and(warp::path("all"))
        .and(warp::path::end())
        .and(warp::get())
        .and(
            warp::query::<ListExpensesQuery>()
                .or(warp::any().map(ListExpensesQuery::default))
                .unify(),
        )
        .and(with_state(state.clone()))
        .and_then(handlers::list_expenses_handler);

    // DELETE /expenses/delete/{id}
    let delete_expense = expenses
        .and(warp::path("delete"))
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::delete())
        .and(with_state(state.clone()))
        .and_then(handlers::delete_expense_handler);

    let ai_advice = warp::path("ai-advice");

    // POST /ai-advice
    let advice = ai_advice
        .and(warp::path::end())
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(raw_body())
        .and_then(handlers::advice_handler);

    // POST /ai-advice/stream
    let advice_stream = ai_advice
        .and(warp::path("stream"))
        .and(warp::path::end())
        .and(warp::post())
        .and(with_state(state.clone()))
        .and(raw_body())
        .and_then(handlers::advice_stream_handler);

    // GET /groq-influencers
    let influencers = warp::path("groq-influencers")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state))
        .and_then(handlers::influencers_handler);

    // Combine routes
    home.or(test_db)
        .or(add_expense)
        .or(list_expenses)
        .or(delete_expense)
        .or(advice)
        .or(advice_stream)
        .or(influencers)
        .recover(handlers::handle_rejection)
}
