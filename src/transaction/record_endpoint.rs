//! This file defines the endpoint for recording a transaction between two
//! friends.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    money::{Currency, Money},
    relationship::find_relationship,
    transaction::core::{Transaction, record_transaction},
    user::UserId,
};

/// The state needed for the record transaction endpoint.
#[derive(Debug, Clone)]
pub struct RecordTransactionState {
    /// The database connection for recording transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RecordTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The client supplied fields for recording a transaction.
#[derive(Debug, Deserialize)]
pub struct RecordTransactionBody {
    /// The ID of the user who owes the amount.
    pub debtor: i64,
    /// The ID of the user who is owed the amount.
    pub creditor: i64,
    /// The amount in minor units (e.g. cents). Must be positive.
    pub minor_units: i64,
    /// The ISO 4217 code for the currency of the amount.
    pub currency: String,
    /// When the underlying expense happened, e.g. "2025-10-05".
    pub date_transacted: Date,
    /// An optional note about what the debt was for.
    #[serde(default)]
    pub memo: Option<String>,
}

/// A route handler for recording a transaction against the friendship between
/// the two users in the request path.
///
/// The first user in the path is recorded as the poster.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn record_transaction_endpoint(
    State(state): State<RecordTransactionState>,
    Path((user_id, friend_id)): Path<(i64, i64)>,
    Json(body): Json<RecordTransactionBody>,
) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    match record(
        UserId::new(user_id),
        UserId::new(friend_id),
        body,
        &connection,
    ) {
        Ok(transaction) => (StatusCode::CREATED, Json(transaction)).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Validate the request body and record the transaction against the pair's
/// relationship.
fn record(
    poster: UserId,
    friend: UserId,
    body: RecordTransactionBody,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let relationship = find_relationship(poster, friend, connection)?;
    let currency = Currency::new(&body.currency)?;
    let amount = Money::new(body.minor_units, currency);

    let builder = Transaction::build(
        UserId::new(body.debtor),
        UserId::new(body.creditor),
        poster,
        amount,
        body.date_transacted,
    )
    .memo(body.memo);

    record_transaction(&relationship, builder, connection)
}
