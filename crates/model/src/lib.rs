//! # Model Crate
//!
//! This crate holds the sparse user-item preference model and the logic for
//! building it out of flat key-value store records.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (RatingRecord, UserPreferenceProfile, PreferenceModel)
//! - **parser**: Decode `rating.<namespace>.<userID>,<itemID>` records
//! - **ingest**: Assemble a model from a scanned batch of records
//! - **error**: Per-record error types
//!
//! ## Example Usage
//!
//! ```
//! use model::PreferenceModel;
//!
//! let pairs = vec![
//!     ("rating.vod.bulsat.1,10".to_string(), "5".to_string()),
//!     ("rating.vod.bulsat.1,20".to_string(), "3".to_string()),
//! ];
//!
//! let (model, skipped) = PreferenceModel::ingest(pairs);
//! assert_eq!(skipped, 0);
//! assert_eq!(model.profile(1).unwrap().len(), 2);
//! ```
//!
//! The model is rebuilt fresh on every pipeline run and never persisted in
//! model form; the store only ever sees flat rating records and flat
//! recommendation lists.

// Public modules
pub mod error;
pub mod ingest;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{ModelError, Result};
pub use types::{
    // Type aliases
    ItemId,
    // Core types
    PreferenceEntry,
    PreferenceModel,
    RatingRecord,
    UserId,
    UserPreferenceProfile,
};
