//! Friend relationships between users.
//!
//! This module contains everything related to relationships:
//! - The `Relationship` model, an unordered pair of users
//! - Database functions for friending users and looking up the pair
//! - HTTP endpoints for friending and listing a user's friends

mod core;
mod create_friend_endpoint;
mod list_friends_endpoint;

pub use core::{
    Relationship, RelationshipId, create_relationship, create_relationship_table,
    find_relationship, list_friends,
};
pub use create_friend_endpoint::create_friend_endpoint;
pub use list_friends_endpoint::list_friends_endpoint;
