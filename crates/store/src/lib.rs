//! # Store Crate
//!
//! Key-value store access for the recommendation pipeline. The pipeline
//! consumes exactly four store capabilities: pattern key enumeration, batch
//! multi-get, single-key delete and append-to-list; nothing else.
//!
//! ## Components
//!
//! - [`RecommendationStore`]: the capability trait the engine runs against
//! - [`StoreClient`]: the Redis implementation
//! - [`keys`]: the `rating.<ns>.*` / `recommend.<ns>.<user>` key layout
//!
//! The trait keeps the engine and its tests independent of a live server;
//! an in-memory fake lives with the engine's tests.

use anyhow::Result;
use model::UserId;

pub mod client;
pub mod keys;

pub use client::StoreClient;
pub use keys::{recommend_key, rating_pattern, DEFAULT_NAMESPACE};

/// Store operations the pipeline requires.
#[allow(async_fn_in_trait)]
pub trait RecommendationStore {
    /// Scan the rating namespace and return raw `(key, value)` pairs.
    async fn fetch_ratings(&self) -> Result<Vec<(String, String)>>;

    /// Fully replace one user's stored recommendation list, in ranked order.
    async fn replace_recommendations(&self, user_id: UserId, items: &[String]) -> Result<()>;
}
