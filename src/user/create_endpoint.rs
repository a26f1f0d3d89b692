//! Defines the endpoint for registering a new user.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{AppState, user::core::create_user};

/// The state needed to create a user.
#[derive(Debug, Clone)]
pub struct CreateUserState {
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateUserState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserBody {
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
    /// The user's phone number.
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// A route handler for registering a new user, returns the created record.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_user_endpoint(
    State(state): State<CreateUserState>,
    Json(body): Json<CreateUserBody>,
) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    match create_user(
        &body.name,
        &body.email,
        body.phone_number.as_deref(),
        &connection,
    ) {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(error) => error.into_response(),
    }
}
