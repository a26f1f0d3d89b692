//! This file defines the endpoint for listing the transactions between two
//! friends.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    relationship::find_relationship,
    transaction::core::{ExpandedTransaction, list_transactions},
    user::UserId,
};

/// The state needed for the list transactions endpoint.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for listing the transactions between the two users in the
/// request path, oldest first.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    Path((user_id, friend_id)): Path<(i64, i64)>,
) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    match transactions_between(UserId::new(user_id), UserId::new(friend_id), &connection) {
        Ok(transactions) => (StatusCode::OK, Json(transactions)).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Fetch the transaction history for the pair's relationship.
fn transactions_between(
    user: UserId,
    friend: UserId,
    connection: &Connection,
) -> Result<Vec<ExpandedTransaction>, Error> {
    let relationship = find_relationship(user, friend, connection)?;

    list_transactions(relationship.id, connection)
}
