//! The API endpoints URIs.
//!
//! For endpoints that take parameters, e.g. '/api/users/{user_id}/friends',
//! use [format_endpoint].

/// The route to register a user or list all users.
pub const USERS: &str = "/api/users";
/// The route to list a user's friends.
pub const USER_FRIENDS: &str = "/api/users/{user_id}/friends";
/// The route to friend one user to another.
pub const USER_FRIEND: &str = "/api/users/{user_id}/friends/{friend_id}";
/// The route to record or list the transactions between two friends.
pub const USER_FRIEND_TRANSACTIONS: &str =
    "/api/users/{user_id}/friends/{friend_id}/transactions";
/// The route to read the balance between two friends.
pub const USER_FRIEND_BALANCE: &str = "/api/users/{user_id}/friends/{friend_id}/balance";

/// Replace the parameters in `endpoint_path` with `ids`, in order.
///
/// A parameter is a path segment that starts with a left brace and ends with
/// a right brace. For example, in the endpoint path
/// '/api/users/{user_id}/friends/{friend_id}', '{user_id}' and '{friend_id}'
/// are the parameters.
///
/// Parameters left over once `ids` runs out are kept as-is, and IDs left over
/// once the parameters run out are ignored.
pub fn format_endpoint(endpoint_path: &str, ids: &[i64]) -> String {
    let mut ids = ids.iter();

    endpoint_path
        .split('/')
        .map(|segment| {
            if segment.starts_with('{') && segment.ends_with('}') {
                match ids.next() {
                    Some(id) => id.to_string(),
                    None => segment.to_string(),
                }
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
