//! Key layout for rating input and recommendation output.
//!
//! Ratings are flat string values under `rating.<namespace>.<userID>,<itemID>`;
//! recommendation output is a list under `recommend.<namespace>.<userID>`.

use model::UserId;

/// Namespace the production deployment historically used.
pub const DEFAULT_NAMESPACE: &str = "vod.bulsat";

/// Wildcard pattern matching every rating record in `namespace`.
pub fn rating_pattern(namespace: &str) -> String {
    format!("rating.{namespace}.*")
}

/// Key of the recommendation list for one user in `namespace`.
pub fn recommend_key(namespace: &str, user_id: UserId) -> String {
    format!("recommend.{namespace}.{user_id}")
}
