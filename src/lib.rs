//! Tally is a web service for keeping a running ledger of the debts between
//! friends.
//!
//! This library provides a JSON REST API for registering users, friending
//! them to each other, and recording who paid for what. Balances are computed
//! from the transaction history on every read, never stored.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod balance;
mod db;
mod endpoints;
mod money;
mod relationship;
mod routing;
mod transaction;
mod user;

pub use app_state::AppState;
pub use money::{Currency, Money};
pub use routing::build_router;
pub use user::{User, UserId};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows. Two
    /// users who are simply not friends yet also land here, which is an
    /// ordinary outcome rather than a bug.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The two users are already friends.
    ///
    /// At most one relationship may connect a pair of users, in either order.
    #[error("the two users are already friends")]
    DuplicateRelationship,

    /// A user tried to friend themselves.
    #[error("a user cannot friend themselves")]
    SelfFriendship,

    /// A transaction named the same user as both debtor and creditor.
    #[error("the debtor and creditor must be different users")]
    DebtorIsCreditor,

    /// A transaction named a debtor or creditor who is not a party of the
    /// relationship it was posted against.
    #[error("user {0} is not a party of the relationship")]
    NotInRelationship(UserId),

    /// A transaction amount was zero or negative.
    ///
    /// Amounts are always positive, the debtor/creditor roles carry the
    /// direction of the debt.
    #[error("transaction amounts must be positive")]
    NonPositiveAmount,

    /// Arithmetic was attempted across two different currencies.
    #[error("expected an amount in {expected} but got {actual}")]
    CurrencyMismatch {
        /// The currency the ledger operates in.
        expected: Currency,
        /// The currency that was supplied.
        actual: Currency,
    },

    /// A string could not be parsed as an ISO 4217 currency code.
    #[error("\"{0}\" is not a valid ISO 4217 currency code")]
    InvalidCurrency(String),

    /// A required user field was blank.
    #[error("{0} must not be blank")]
    MissingUserField(&'static str),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("relationship.party_a") =>
            {
                Error::DuplicateRelationship
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::DuplicateRelationship => StatusCode::CONFLICT,
            Error::SelfFriendship
            | Error::DebtorIsCreditor
            | Error::NotInRelationship(_)
            | Error::NonPositiveAmount
            | Error::CurrencyMismatch { .. }
            | Error::InvalidCurrency(_)
            | Error::MissingUserField(_) => StatusCode::BAD_REQUEST,
            Error::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // SQL errors are not intended to be shown to the client.
        let message = match self {
            Error::SqlError(error) => {
                tracing::error!("An unexpected error occurred: {}", error);
                "An internal error occurred, check the server logs for more details".to_owned()
            }
            error => error.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::{Currency, Error, UserId};

    fn status_of(error: Error) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn maps_errors_to_client_statuses() {
        assert_eq!(status_of(Error::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(Error::DuplicateRelationship),
            StatusCode::CONFLICT
        );
        assert_eq!(status_of(Error::SelfFriendship), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(Error::DebtorIsCreditor), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(Error::NotInRelationship(UserId::new(1))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(Error::NonPositiveAmount), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(Error::CurrencyMismatch {
                expected: Currency::new_unchecked("USD"),
                actual: Currency::new_unchecked("NZD"),
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(Error::InvalidCurrency("DOLLARS".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(Error::MissingUserField("name")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(Error::SqlError(rusqlite::Error::InvalidQuery)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn converts_missing_rows_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }
}
