//! Defines the core data model and database queries for users.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::Error;

// ============================================================================
// MODELS
// ============================================================================

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from the other ID types in the schema,
/// leading to better compile time errors when, say, a debtor is passed where a
/// relationship ID is expected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserId(i64);

impl UserId {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A person who can friend other users and record transactions with them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserId,
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
    /// The user's phone number, if they provided one.
    pub phone_number: Option<String>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the user table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                phone_number TEXT
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
/// This function will return a:
/// - [Error::MissingUserField] if `name` or `email` is blank,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_user(
    name: &str,
    email: &str,
    phone_number: Option<&str>,
    connection: &Connection,
) -> Result<User, Error> {
    if name.trim().is_empty() {
        return Err(Error::MissingUserField("name"));
    }

    if email.trim().is_empty() {
        return Err(Error::MissingUserField("email"));
    }

    let user = connection
        .prepare(
            "INSERT INTO user (name, email, phone_number)
             VALUES (?1, ?2, ?3)
             RETURNING id, name, email, phone_number",
        )?
        .query_row((name, email, phone_number), map_user_row)?;

    Ok(user)
}

/// Get the user from the database with an ID equal to `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not belong to a registered user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_user(id: UserId, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, name, email, phone_number FROM user WHERE id = :id")?
        .query_row(&[(":id", &id.as_i64())], map_user_row)
        .map_err(|error| error.into())
}

/// Check whether a user with `id` exists in the database.
///
/// # Errors
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn user_exists(id: UserId, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS (SELECT 1 FROM user WHERE id = :id)",
            &[(":id", &id.as_i64())],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Get every user in the database in insertion order.
///
/// # Errors
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn list_users(connection: &Connection) -> Result<Vec<User>, Error> {
    connection
        .prepare("SELECT id, name, email, phone_number FROM user ORDER BY id")?
        .query_map([], map_user_row)?
        .map(|maybe_user| maybe_user.map_err(Error::SqlError))
        .collect()
}

/// Get the number of users in the database.
///
/// # Errors
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn count_users(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM user;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Map a database row to a User.
pub fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    map_user_row_at(row, 0)
}

/// Map a database row to a User, reading columns starting at `offset`.
///
/// The offset variant is for queries that join the user table onto another
/// table, where the user columns do not start at the first column.
pub fn map_user_row_at(row: &Row, offset: usize) -> Result<User, rusqlite::Error> {
    let id = UserId::new(row.get(offset)?);
    let name = row.get(offset + 1)?;
    let email = row.get(offset + 2)?;
    let phone_number = row.get(offset + 3)?;

    Ok(User {
        id,
        name,
        email,
        phone_number,
    })
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod user_database_tests {
    use rusqlite::Connection;

    use crate::Error;

    use super::{
        UserId, count_users, create_user, create_user_table, get_user, list_users, user_exists,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_user_table(&conn).unwrap();
        conn
    }

    #[test]
    fn create_user_succeeds() {
        let conn = get_test_connection();

        let user = create_user("Alice", "alice@example.com", Some("021 555 0123"), &conn)
            .expect("Could not create user");

        assert!(user.id.as_i64() > 0);
        assert_eq!(user.name, "Alice");
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.phone_number.as_deref(), Some("021 555 0123"));
    }

    #[test]
    fn create_user_fails_with_blank_name() {
        let conn = get_test_connection();

        let result = create_user("  ", "alice@example.com", None, &conn);

        assert_eq!(result, Err(Error::MissingUserField("name")));
        assert_eq!(count_users(&conn), Ok(0));
    }

    #[test]
    fn create_user_fails_with_blank_email() {
        let conn = get_test_connection();

        let result = create_user("Alice", "", None, &conn);

        assert_eq!(result, Err(Error::MissingUserField("email")));
        assert_eq!(count_users(&conn), Ok(0));
    }

    #[test]
    fn get_user_fails_with_non_existent_id() {
        let conn = get_test_connection();

        let result = get_user(UserId::new(42), &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn get_user_succeeds_with_existing_id() {
        let conn = get_test_connection();
        let created = create_user("Bob", "bob@example.com", None, &conn).unwrap();

        let fetched = get_user(created.id, &conn).expect("Could not get user");

        assert_eq!(fetched, created);
    }

    #[test]
    fn user_exists_reflects_database() {
        let conn = get_test_connection();

        assert_eq!(user_exists(UserId::new(1), &conn), Ok(false));

        let user = create_user("Alice", "alice@example.com", None, &conn).unwrap();

        assert_eq!(user_exists(user.id, &conn), Ok(true));
    }

    #[test]
    fn list_users_returns_insertion_order() {
        let conn = get_test_connection();
        let alice = create_user("Alice", "alice@example.com", None, &conn).unwrap();
        let bob = create_user("Bob", "bob@example.com", None, &conn).unwrap();
        let carol = create_user("Carol", "carol@example.com", None, &conn).unwrap();

        let users = list_users(&conn).expect("Could not list users");

        assert_eq!(users, vec![alice, bob, carol]);
    }

    #[test]
    fn returns_correct_count() {
        let conn = get_test_connection();

        let count = count_users(&conn).expect("Could not get user count");
        assert_eq!(0, count, "Want zero users before insertion, got {count}");

        create_user("Alice", "alice@example.com", None, &conn).unwrap();

        let count = count_users(&conn).expect("Could not get user count");
        assert_eq!(1, count, "Want one user after insertion, got {count}");
    }
}
