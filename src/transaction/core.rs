//! Defines the core data models and database queries for ledger transactions.
//!
//! A transaction records a single debt inside a relationship: the debtor owes
//! the creditor the amount. Rows are append only, the ledger is the history.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    money::{Currency, Money},
    relationship::{Relationship, RelationshipId},
    user::{User, UserId, map_user_row_at, user_exists},
};

// ============================================================================
// MODELS
// ============================================================================

/// Alias for the integer type used for transaction IDs.
pub type TransactionId = i64;

/// A single debt recorded between the two parties of a relationship.
///
/// The amount is always positive, the debtor/creditor roles carry the
/// direction. To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The ID of the relationship this transaction belongs to.
    pub relationship_id: RelationshipId,
    /// The user who owes the amount.
    pub debtor: UserId,
    /// The user who is owed the amount.
    pub creditor: UserId,
    /// The user who recorded the transaction.
    pub poster: UserId,
    /// How much the debtor owes the creditor.
    pub amount: Money,
    /// When the underlying expense happened.
    pub date_transacted: Date,
    /// When the transaction was recorded in the ledger.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the transaction was last modified. Equal to `created_at` until an
    /// edit happens.
    #[serde(with = "time::serde::rfc3339")]
    pub last_edited_at: OffsetDateTime,
    /// A free-form note about what the debt was for.
    pub memo: Option<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        debtor: UserId,
        creditor: UserId,
        poster: UserId,
        amount: Money,
        date_transacted: Date,
    ) -> TransactionBuilder {
        TransactionBuilder {
            debtor,
            creditor,
            poster,
            amount,
            date_transacted,
            memo: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The builder holds everything the client supplies. The ID and the record
/// keeping timestamps are filled in by [record_transaction].
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The user who owes the amount.
    pub debtor: UserId,
    /// The user who is owed the amount.
    pub creditor: UserId,
    /// The user recording the transaction.
    pub poster: UserId,
    /// How much the debtor owes the creditor. Must be positive.
    pub amount: Money,
    /// When the underlying expense happened.
    pub date_transacted: Date,
    /// A free-form note about what the debt was for.
    pub memo: Option<String>,
}

impl TransactionBuilder {
    /// Set the memo for the transaction.
    pub fn memo(mut self, memo: Option<String>) -> Self {
        self.memo = memo;
        self
    }
}

/// A transaction paired with the profiles of the users it references.
///
/// This is the shape returned by transaction listings so that clients do not
/// need a second round trip to resolve user IDs to names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpandedTransaction {
    /// The transaction itself.
    pub transaction: Transaction,
    /// The profile of the user who owes the amount.
    pub debtor: User,
    /// The profile of the user who is owed the amount.
    pub creditor: User,
    /// The profile of the user who recorded the transaction.
    pub poster: User,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Record a new transaction against `relationship`.
///
/// Both the debtor and the creditor must be parties of the relationship. The
/// poster must be an existing user but does not have to be a party. On
/// success the stored row has `created_at` equal to `last_edited_at`.
///
/// Nothing is persisted when any validation fails.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] if the amount is zero or negative,
/// - or [Error::DebtorIsCreditor] if the debtor and creditor are the same
///   user,
/// - or [Error::NotInRelationship] if the debtor or creditor is not a party
///   of `relationship`,
/// - or [Error::NotFound] if the poster does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn record_transaction(
    relationship: &Relationship,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if !builder.amount.is_positive() {
        return Err(Error::NonPositiveAmount);
    }

    if builder.debtor == builder.creditor {
        return Err(Error::DebtorIsCreditor);
    }

    for user in [builder.debtor, builder.creditor] {
        if !relationship.involves(user) {
            return Err(Error::NotInRelationship(user));
        }
    }

    if !user_exists(builder.poster, connection)? {
        return Err(Error::NotFound);
    }

    let now = OffsetDateTime::now_utc();

    connection
        .prepare(
            "INSERT INTO \"transaction\" (relationship_id, debtor, creditor, poster, amount,
                 currency, date_transacted, created_at, last_edited_at, memo)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             RETURNING id, relationship_id, debtor, creditor, poster, amount, currency,
                 date_transacted, created_at, last_edited_at, memo",
        )?
        .query_row(
            (
                relationship.id,
                builder.debtor.as_i64(),
                builder.creditor.as_i64(),
                builder.poster.as_i64(),
                builder.amount.minor_units,
                builder.amount.currency.as_str(),
                builder.date_transacted,
                now,
                now,
                builder.memo,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::NotFound,
            error => error.into(),
        })
}

/// Get every transaction recorded against the relationship with
/// `relationship_id`, oldest first, with the referenced users expanded to
/// their profiles.
///
/// Listing is a pure read, calling it repeatedly returns the same rows.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn list_transactions(
    relationship_id: RelationshipId,
    connection: &Connection,
) -> Result<Vec<ExpandedTransaction>, Error> {
    connection
        .prepare(
            "SELECT t.id, t.relationship_id, t.debtor, t.creditor, t.poster, t.amount,
                 t.currency, t.date_transacted, t.created_at, t.last_edited_at, t.memo,
                 d.id, d.name, d.email, d.phone_number,
                 c.id, c.name, c.email, c.phone_number,
                 p.id, p.name, p.email, p.phone_number
             FROM \"transaction\" t
             INNER JOIN user d ON d.id = t.debtor
             INNER JOIN user c ON c.id = t.creditor
             INNER JOIN user p ON p.id = t.poster
             WHERE t.relationship_id = :id
             ORDER BY t.id",
        )?
        .query_map(&[(":id", &relationship_id)], |row| {
            Ok(ExpandedTransaction {
                transaction: map_transaction_row(row)?,
                debtor: map_user_row_at(row, 11)?,
                creditor: map_user_row_at(row, 15)?,
                poster: map_user_row_at(row, 19)?,
            })
        })?
        .map(|maybe_expanded| maybe_expanded.map_err(Error::SqlError))
        .collect()
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                relationship_id INTEGER NOT NULL,
                debtor INTEGER NOT NULL,
                creditor INTEGER NOT NULL,
                poster INTEGER NOT NULL,
                amount INTEGER NOT NULL,
                currency TEXT NOT NULL,
                date_transacted TEXT NOT NULL,
                created_at TEXT NOT NULL,
                last_edited_at TEXT NOT NULL,
                memo TEXT,
                FOREIGN KEY(relationship_id) REFERENCES relationship(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(debtor) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(creditor) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(poster) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Listings and balances always filter by relationship.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_relationship
             ON \"transaction\"(relationship_id);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let relationship_id = row.get(1)?;
    let debtor = UserId::new(row.get(2)?);
    let creditor = UserId::new(row.get(3)?);
    let poster = UserId::new(row.get(4)?);
    let amount = Money::new(
        row.get(5)?,
        Currency::new_unchecked(&row.get::<_, String>(6)?),
    );
    let date_transacted = row.get(7)?;
    let created_at = row.get(8)?;
    let last_edited_at = row.get(9)?;
    let memo = row.get(10)?;

    Ok(Transaction {
        id,
        relationship_id,
        debtor,
        creditor,
        poster,
        amount,
        date_transacted,
        created_at,
        last_edited_at,
        memo,
    })
}

// ============================================================================
// TESTS
// ============================================================================
