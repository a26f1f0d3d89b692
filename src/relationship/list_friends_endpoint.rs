//! This file defines the endpoint for listing a user's friends.

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
    relationship::core::list_friends,
    user::{User, UserId, user_exists},
};

/// The state needed for the list friends endpoint.
#[derive(Debug, Clone)]
pub struct ListFriendsState {
    /// The database connection for reading relationships.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListFriendsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for listing the profiles of a user's friends.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn list_friends_endpoint(
    State(state): State<ListFriendsState>,
    Path(user_id): Path<i64>,
) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    match friends_of(UserId::new(user_id), &connection) {
        Ok(friends) => (StatusCode::OK, Json(friends)).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Fetch the friend profiles for `user_id`, requiring the user to exist.
fn friends_of(user_id: UserId, connection: &Connection) -> Result<Vec<User>, Error> {
    if !user_exists(user_id, connection)? {
        return Err(Error::NotFound);
    }

    list_friends(user_id, connection)
}
