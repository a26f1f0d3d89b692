//! Application router configuration mapping the API routes to their handlers.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;

use crate::{
    AppState,
    balance::get_balance_endpoint,
    endpoints,
    relationship::{create_friend_endpoint, list_friends_endpoint},
    transaction::{list_transactions_endpoint, record_transaction_endpoint},
    user::{create_user_endpoint, list_users_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::USERS,
            post(create_user_endpoint).get(list_users_endpoint),
        )
        .route(endpoints::USER_FRIENDS, get(list_friends_endpoint))
        .route(endpoints::USER_FRIEND, post(create_friend_endpoint))
        .route(
            endpoints::USER_FRIEND_TRANSACTIONS,
            post(record_transaction_endpoint).get(list_transactions_endpoint),
        )
        .route(endpoints::USER_FRIEND_BALANCE, get(get_balance_endpoint))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The JSON body served for requests that match no route.
async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "The requested resource does not exist"})),
    )
        .into_response()
}
