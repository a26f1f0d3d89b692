//! Defines the balance computation for a relationship.
//!
//! Balances are never stored. Every request folds over the relationship's
//! transaction history from scratch, so a balance cannot drift out of sync
//! with the ledger.

use rusqlite::Connection;

use crate::{
    Error,
    money::{Currency, Money},
    relationship::{Relationship, RelationshipId},
    user::UserId,
};

/// The fields of a transaction that contribute to a balance.
struct LedgerEntry {
    debtor: UserId,
    creditor: UserId,
    amount: Money,
}

/// Compute the net balance of `relationship` as seen by `perspective`.
///
/// The result is positive when the other party owes `perspective` money and
/// negative when `perspective` owes them, so swapping the perspective to the
/// other party negates the result. A relationship with no transactions has a
/// zero balance in `ledger_currency`.
///
/// # Errors
/// This function will return a:
/// - [Error::CurrencyMismatch] if any transaction is in a different currency
///   to `ledger_currency`,
/// - or [Error::SqlError] if there is some SQL error.
pub fn compute_balance(
    relationship: &Relationship,
    perspective: UserId,
    ledger_currency: &Currency,
    connection: &Connection,
) -> Result<Money, Error> {
    let mut balance = Money::zero(ledger_currency.clone());

    for entry in get_ledger_entries(relationship.id, connection)? {
        if entry.creditor == perspective {
            balance = balance.add(&entry.amount)?;
        } else if entry.debtor == perspective {
            balance = balance.subtract(&entry.amount)?;
        }
    }

    Ok(balance)
}

fn get_ledger_entries(
    relationship_id: RelationshipId,
    connection: &Connection,
) -> Result<Vec<LedgerEntry>, Error> {
    connection
        .prepare(
            "SELECT debtor, creditor, amount, currency FROM \"transaction\"
             WHERE relationship_id = :id
             ORDER BY id",
        )?
        .query_map(&[(":id", &relationship_id)], |row| {
            Ok(LedgerEntry {
                debtor: UserId::new(row.get(0)?),
                creditor: UserId::new(row.get(1)?),
                amount: Money::new(
                    row.get(2)?,
                    Currency::new_unchecked(&row.get::<_, String>(3)?),
                ),
            })
        })?
        .map(|maybe_entry| maybe_entry.map_err(Error::SqlError))
        .collect()
}
