//! This file defines the endpoint for reading the balance between two
//! friends.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    balance::core::compute_balance,
    money::{Currency, Money},
    relationship::find_relationship,
    user::UserId,
};

/// The state needed for the get balance endpoint.
#[derive(Debug, Clone)]
pub struct GetBalanceState {
    /// The currency the ledger keeps balances in.
    pub currency: Currency,
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetBalanceState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            currency: state.currency.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The balance between two friends, seen from one side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceResponse {
    /// The user the balance is computed for.
    pub perspective: UserId,
    /// The net amount. Positive means the friend owes `perspective`.
    pub balance: Money,
    /// The balance rendered for display, e.g. "-15.00 USD".
    pub formatted: String,
}

/// A route handler for reading the net balance between the two users in the
/// request path, from the first user's point of view.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn get_balance_endpoint(
    State(state): State<GetBalanceState>,
    Path((user_id, friend_id)): Path<(i64, i64)>,
) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    match balance_between(
        UserId::new(user_id),
        UserId::new(friend_id),
        &state.currency,
        &connection,
    ) {
        Ok(balance) => (StatusCode::OK, Json(balance)).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Compute the pair's balance from `user`'s perspective.
fn balance_between(
    user: UserId,
    friend: UserId,
    currency: &Currency,
    connection: &Connection,
) -> Result<BalanceResponse, Error> {
    let relationship = find_relationship(user, friend, connection)?;
    let balance = compute_balance(&relationship, user, currency, connection)?;

    Ok(BalanceResponse {
        perspective: user,
        formatted: balance.to_string(),
        balance,
    })
}
