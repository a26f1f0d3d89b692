//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize, money::Currency};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The currency the ledger keeps balances in.
    pub currency: Currency,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the
    /// domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, currency: Currency) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            currency,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}

#[cfg(test)]
mod app_state_tests {
    use rusqlite::Connection;

    use crate::{money::Currency, user::count_users};

    use super::AppState;

    #[test]
    fn new_initialises_the_database() {
        let connection = Connection::open_in_memory().unwrap();

        let state = AppState::new(connection, Currency::new_unchecked("USD"))
            .expect("Could not create app state");

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_users(&connection), Ok(0));
    }
}
