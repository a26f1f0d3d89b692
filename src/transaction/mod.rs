//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for recording and listing the debts between two friends
//! - HTTP endpoints for posting and reading a pair's transaction history

mod core;
mod list_endpoint;
mod record_endpoint;

pub use core::{
    ExpandedTransaction, Transaction, TransactionBuilder, TransactionId, create_transaction_table,
    list_transactions, record_transaction,
};
pub use list_endpoint::list_transactions_endpoint;
pub use record_endpoint::{RecordTransactionBody, record_transaction_endpoint};

#[cfg(test)]
pub use core::count_transactions;
