//! Final recommendation generation with the selected strategy.
//!
//! The winner is retrained on the *full* model (the holdout split was only
//! for scoring) and then asked for the top predictions of every known
//! user. Users are independent: one user's failure is logged and skipped,
//! the rest proceed.

use anyhow::{Context, Result};
use model::{PreferenceModel, UserId};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use strategies::RecommendationStrategy;
use tracing::{debug, warn};

/// How many ranked predictions are requested per user.
pub const TOP_RECOMMENDATIONS: usize = 10;

/// Final output unit: one user's ranked item identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub user_id: UserId,
    pub item_ids: Vec<String>,
}

/// Produce recommendations for every user the trained recommender can
/// score.
///
/// Predictions with a non-positive value are dropped; a user whose list
/// ends up empty is skipped without an error. Per-user work runs in
/// parallel over the shared read-only model; output order follows
/// ascending user id.
pub fn generate(
    model: &PreferenceModel,
    strategy: &dyn RecommendationStrategy,
) -> Result<Vec<Recommendation>> {
    let recommender = strategy.build(model).with_context(|| {
        format!(
            "failed to train selected strategy '{}' on the full model",
            strategy.name()
        )
    })?;

    let user_ids = model.sorted_user_ids();
    let recommendations: Vec<Recommendation> = user_ids
        .par_iter()
        .filter_map(|&user_id| {
            let ranked = match recommender.recommend(user_id, TOP_RECOMMENDATIONS) {
                Ok(ranked) => ranked,
                Err(err) => {
                    warn!("skipping user {user_id}: {err:#}");
                    return None;
                }
            };

            let item_ids: Vec<String> = ranked
                .into_iter()
                .filter(|scored| scored.value > 0.0)
                .map(|scored| scored.item_id.to_string())
                .collect();

            if item_ids.is_empty() {
                debug!("user {user_id} has no positive-valued predictions");
                return None;
            }

            Some(Recommendation { user_id, item_ids })
        })
        .collect();

    Ok(recommendations)
}
