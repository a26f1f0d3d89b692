//! Database initialisation for the ledger.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, relationship::create_relationship_table, transaction::create_transaction_table,
    user::create_user_table,
};

/// Create the application's tables if they do not already exist.
///
/// Runs in an exclusive transaction so that two processes pointed at the same
/// database file cannot interleave their schema setup.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_relationship_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
