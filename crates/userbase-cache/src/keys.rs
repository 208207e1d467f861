//! Cache key builders.
//!
//! The key layout is shared with every other deployment that reads the same
//! Redis instance, so the formats here must not change.

use uuid::Uuid;

/// Cache key for the cached profile of a user.
pub fn user_profile(user_id: Uuid) -> String {
    format!("Cache:User:{user_id}")
}

/// Key of the set holding every registered refresh token of a user.
pub fn refresh_tokens(user_id: Uuid) -> String {
    format!("RefreshToken:{user_id}")
}
