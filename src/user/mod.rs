//! User accounts for the ledger.
//!
//! This module contains everything related to users:
//! - The `User` model and `UserId` newtype
//! - Database functions for creating, fetching, and listing users
//! - HTTP endpoints for registering and listing users

mod core;
mod create_endpoint;
mod list_endpoint;

pub use core::{
    User, UserId, create_user, create_user_table, get_user, list_users, map_user_row,
    map_user_row_at, user_exists,
};
pub use create_endpoint::create_user_endpoint;
pub use list_endpoint::list_users_endpoint;

#[cfg(test)]
pub use core::count_users;
