//! Capability traits for pluggable recommendation strategies.
//!
//! The pipeline core never knows which algorithm it is running: it trains
//! and queries strategies only through these two traits. New strategies
//! register with the [`StrategyRegistry`](crate::StrategyRegistry) without
//! touching the evaluation loop.

use anyhow::Result;
use model::{ItemId, PreferenceModel, UserId};
use serde::{Deserialize, Serialize};

/// One ranked prediction: an item and its predicted rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub item_id: ItemId,
    pub value: f64,
}

/// A trained recommender produced by [`RecommendationStrategy::build`].
///
/// `Send + Sync` allows recommenders to be shared across parallel per-user
/// generation workers; the model they were trained on is read-only.
pub trait Recommender: Send + Sync {
    /// Predict the rating `user_id` would give `item_id`.
    ///
    /// This is the per-pair capability the evaluation protocol scores
    /// against held-out ratings. May fail per call, e.g. for a user or item
    /// absent from the training data.
    fn estimate(&self, user_id: UserId, item_id: ItemId) -> Result<f64>;

    /// Produce up to `count` ranked predictions for `user_id`, descending
    /// by predicted value, excluding items the user has already rated.
    ///
    /// May fail per call; a failure for one user never poisons another.
    fn recommend(&self, user_id: UserId, count: usize) -> Result<Vec<ScoredItem>>;
}

/// An untrained candidate strategy.
pub trait RecommendationStrategy: Send + Sync {
    /// Returns the name of this strategy (for scoring reports and logging)
    fn name(&self) -> &str;

    /// Train a recommender on `model`.
    ///
    /// A failed build marks this strategy unscorable for the current run;
    /// it is never a reason to abort evaluating the others.
    fn build(&self, model: &PreferenceModel) -> Result<Box<dyn Recommender>>;
}
