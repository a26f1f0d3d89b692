//! Defines the endpoint for listing all registered users.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::IntoResponse,
};
use rusqlite::Connection;

use crate::{AppState, user::core::list_users};

/// The state needed to list users.
#[derive(Debug, Clone)]
pub struct ListUsersState {
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListUsersState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for listing every registered user.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn list_users_endpoint(State(state): State<ListUsersState>) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    match list_users(&connection) {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        user::{
            User,
            core::create_user,
            list_endpoint::{ListUsersState, list_users_endpoint},
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    async fn get_listed_users(state: ListUsersState) -> Vec<User> {
        let response = list_users_endpoint(State(state)).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("could not read response body");

        serde_json::from_slice(&body_bytes).expect("could not parse response body as a user list")
    }

    #[tokio::test]
    async fn returns_empty_list_before_any_users() {
        let conn = get_test_connection();
        let state = ListUsersState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let users = get_listed_users(state).await;

        assert_eq!(users, vec![]);
    }

    #[tokio::test]
    async fn returns_all_users() {
        let conn = get_test_connection();
        let alice = create_user("Alice", "alice@example.com", None, &conn).unwrap();
        let bob = create_user("Bob", "bob@example.com", None, &conn).unwrap();
        let state = ListUsersState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let users = get_listed_users(state).await;

        assert_eq!(users, vec![alice, bob]);
    }
}
