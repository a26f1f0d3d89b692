//! This file defines the endpoint for friending one user to another.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rusqlite::Connection;

use crate::{AppState, relationship::core::create_relationship, user::UserId};

/// The state needed for the create friend endpoint.
#[derive(Debug, Clone)]
pub struct CreateFriendState {
    /// The database connection for creating relationships.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateFriendState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for recording a friendship between the two users in the
/// request path.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_friend_endpoint(
    State(state): State<CreateFriendState>,
    Path((user_id, friend_id)): Path<(i64, i64)>,
) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    match create_relationship(UserId::new(user_id), UserId::new(friend_id), &connection) {
        Ok(relationship) => (StatusCode::CREATED, Json(relationship)).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod create_friend_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        relationship::Relationship,
        user::{User, create_user},
    };

    use super::{CreateFriendState, create_friend_endpoint};

    fn get_test_state() -> CreateFriendState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        CreateFriendState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn create_test_users(state: &CreateFriendState) -> (User, User) {
        let connection = state.db_connection.lock().unwrap();
        let alice = create_user("Alice", "alice@example.com", None, &connection).unwrap();
        let bob = create_user("Bob", "bob@example.com", None, &connection).unwrap();

        (alice, bob)
    }

    #[tokio::test]
    async fn can_friend_two_users() {
        let state = get_test_state();
        let (alice, bob) = create_test_users(&state);

        let response = create_friend_endpoint(
            State(state),
            Path((alice.id.as_i64(), bob.id.as_i64())),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::CREATED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let relationship: Relationship =
            serde_json::from_slice(&body).expect("Could not parse response body");

        assert!(relationship.involves(alice.id));
        assert!(relationship.involves(bob.id));
    }

    #[tokio::test]
    async fn duplicate_friending_returns_conflict() {
        let state = get_test_state();
        let (alice, bob) = create_test_users(&state);

        let first = create_friend_endpoint(
            State(state.clone()),
            Path((alice.id.as_i64(), bob.id.as_i64())),
        )
        .await
        .into_response();
        // Flip the path order to check the pair is treated as unordered.
        let second = create_friend_endpoint(
            State(state),
            Path((bob.id.as_i64(), alice.id.as_i64())),
        )
        .await
        .into_response();

        assert_eq!(first.status(), StatusCode::CREATED);
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn friending_unknown_user_returns_not_found() {
        let state = get_test_state();
        let (alice, _) = create_test_users(&state);

        let response = create_friend_endpoint(State(state), Path((alice.id.as_i64(), 999)))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn friending_self_returns_bad_request() {
        let state = get_test_state();
        let (alice, _) = create_test_users(&state);

        let response = create_friend_endpoint(
            State(state),
            Path((alice.id.as_i64(), alice.id.as_i64())),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
