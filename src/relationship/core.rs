//! Defines the core data model and database queries for friend relationships.
//!
//! A relationship is an unordered pair of users. Storage is ordered, so rows
//! keep the smaller user ID in `party_a` and lookups match both orientations.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    user::{User, UserId, map_user_row, user_exists},
};

// ============================================================================
// MODELS
// ============================================================================

/// Alias for the integer type used for relationship IDs.
pub type RelationshipId = i64;

/// A friendship between two users and the ledger scope for the transactions
/// between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// The ID of the relationship.
    pub id: RelationshipId,
    /// The party with the smaller user ID.
    pub party_a: UserId,
    /// The party with the larger user ID.
    pub party_b: UserId,
    /// When the friendship was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Relationship {
    /// Whether `user` is one of the two parties of this relationship.
    pub fn involves(&self, user: UserId) -> bool {
        self.party_a == user || self.party_b == user
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the relationship table in the database.
///
/// The unique index over the party pair relies on rows being stored in
/// canonical order, which [create_relationship] guarantees.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_relationship_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS relationship (
                id INTEGER PRIMARY KEY,
                party_a INTEGER NOT NULL,
                party_b INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY(party_a) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(party_b) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                UNIQUE(party_a, party_b)
                )",
        (),
    )?;

    Ok(())
}

/// Find the relationship connecting `user_a` and `user_b`.
///
/// The order of the two arguments does not matter. Two users who are not
/// friends is a normal outcome that callers are expected to handle, not a
/// programming error.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if no relationship connects the pair in either
///   orientation,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn find_relationship(
    user_a: UserId,
    user_b: UserId,
    connection: &Connection,
) -> Result<Relationship, Error> {
    connection
        .prepare(
            "SELECT id, party_a, party_b, created_at FROM relationship
             WHERE (party_a = :a AND party_b = :b) OR (party_a = :b AND party_b = :a)",
        )?
        .query_row(
            &[(":a", &user_a.as_i64()), (":b", &user_b.as_i64())],
            map_relationship_row,
        )
        .map_err(|error| error.into())
}

/// Record a friendship between two users with `created_at` set to now.
///
/// At most one relationship may connect any two users, regardless of
/// argument order.
///
/// # Errors
/// This function will return a:
/// - [Error::SelfFriendship] if both arguments are the same user,
/// - or [Error::NotFound] if either user does not exist,
/// - or [Error::DuplicateRelationship] if the pair is already connected,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_relationship(
    user_a: UserId,
    user_b: UserId,
    connection: &Connection,
) -> Result<Relationship, Error> {
    if user_a == user_b {
        return Err(Error::SelfFriendship);
    }

    for user in [user_a, user_b] {
        if !user_exists(user, connection)? {
            return Err(Error::NotFound);
        }
    }

    // Store the smaller ID first so each pair has exactly one canonical row
    // for the unique index to catch.
    let (party_a, party_b) = if user_a.as_i64() < user_b.as_i64() {
        (user_a, user_b)
    } else {
        (user_b, user_a)
    };

    connection
        .prepare(
            "INSERT INTO relationship (party_a, party_b, created_at)
             VALUES (?1, ?2, ?3)
             RETURNING id, party_a, party_b, created_at",
        )?
        .query_row(
            (
                party_a.as_i64(),
                party_b.as_i64(),
                OffsetDateTime::now_utc(),
            ),
            map_relationship_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateRelationship,
            error => error.into(),
        })
}

/// Get the profiles of every user that `user` is friends with, in friending
/// order.
///
/// # Errors
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn list_friends(user: UserId, connection: &Connection) -> Result<Vec<User>, Error> {
    connection
        .prepare(
            "SELECT u.id, u.name, u.email, u.phone_number
             FROM relationship r
             INNER JOIN user u
                ON (r.party_a = :id AND u.id = r.party_b)
                OR (r.party_b = :id AND u.id = r.party_a)
             ORDER BY r.id",
        )?
        .query_map(&[(":id", &user.as_i64())], map_user_row)?
        .map(|maybe_user| maybe_user.map_err(Error::SqlError))
        .collect()
}

/// Map a database row to a Relationship.
pub fn map_relationship_row(row: &Row) -> Result<Relationship, rusqlite::Error> {
    let id = row.get(0)?;
    let party_a = UserId::new(row.get(1)?);
    let party_b = UserId::new(row.get(2)?);
    let created_at = row.get(3)?;

    Ok(Relationship {
        id,
        party_a,
        party_b,
        created_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod create_table_tests {
    use rusqlite::Connection;

    use super::create_relationship_table;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), create_relationship_table(&connection));
    }
}


#[cfg(test)]
mod list_friends_tests {
    use rusqlite::Connection;

    use crate::{db::initialize, user::create_user};

    use super::{create_relationship, list_friends};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn returns_empty_list_for_no_friends() {
        let conn = get_test_connection();
        let alice = create_user("Alice", "alice@example.com", None, &conn).unwrap();

        let friends = list_friends(alice.id, &conn).expect("Could not list friends");

        assert_eq!(friends, vec![]);
    }

    #[test]
    fn returns_friends_from_both_orientations() {
        let conn = get_test_connection();
        let alice = create_user("Alice", "alice@example.com", None, &conn).unwrap();
        let bob = create_user("Bob", "bob@example.com", None, &conn).unwrap();
        let carol = create_user("Carol", "carol@example.com", None, &conn).unwrap();

        // Bob sits in party_b for the first pair and party_a for the second.
        create_relationship(alice.id, bob.id, &conn).unwrap();
        create_relationship(bob.id, carol.id, &conn).unwrap();

        let friends = list_friends(bob.id, &conn).expect("Could not list friends");

        assert_eq!(friends, vec![alice, carol]);
    }

    #[test]
    fn does_not_include_other_pairs() {
        let conn = get_test_connection();
        let alice = create_user("Alice", "alice@example.com", None, &conn).unwrap();
        let bob = create_user("Bob", "bob@example.com", None, &conn).unwrap();
        let carol = create_user("Carol", "carol@example.com", None, &conn).unwrap();

        create_relationship(alice.id, bob.id, &conn).unwrap();

        let friends = list_friends(carol.id, &conn).expect("Could not list friends");

        assert_eq!(friends, vec![]);
    }
}
