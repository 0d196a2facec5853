//! Error types for the model crate.

use thiserror::Error;

/// Errors raised while turning flat store records into preference data.
///
/// Every variant is scoped to a single record: a malformed key or value
/// never aborts the surrounding scan, the caller skips the record and
/// moves on.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The key's id suffix doesn't have the expected `userID,itemID` shape
    #[error("malformed rating key '{key}': {reason}")]
    MalformedKey { key: String, reason: String },

    /// The stored payload is not a finite numeric rating
    #[error("invalid rating value '{value}' for key '{key}'")]
    InvalidValue { key: String, value: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ModelError>;
