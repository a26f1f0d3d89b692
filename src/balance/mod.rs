//! Balance computation for the ledger.
//!
//! This module contains everything related to balances:
//! - The perspective-signed fold over a relationship's transactions
//! - The HTTP endpoint for reading the balance between two friends

mod core;
mod get_endpoint;

pub use core::compute_balance;
pub use get_endpoint::{BalanceResponse, get_balance_endpoint};
