//! Item-average baseline strategy.
//!
//! Predicts that a user will rate an item at the item's mean rating across
//! all users. Crude, but cheap to train and a solid floor for the model
//! selection harness: anything fancier has to beat it on held-out error.

use crate::traits::{RecommendationStrategy, Recommender, ScoredItem};
use anyhow::{Result, anyhow, bail};
use model::{ItemId, PreferenceModel, UserId};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// Builds [`ItemAverageRecommender`]s.
pub struct ItemAverageStrategy;

impl RecommendationStrategy for ItemAverageStrategy {
    fn name(&self) -> &str {
        "item-average"
    }

    #[instrument(skip_all, fields(users = model.user_count()))]
    fn build(&self, model: &PreferenceModel) -> Result<Box<dyn Recommender>> {
        if model.is_empty() {
            bail!("cannot train item-average on an empty preference model");
        }

        let mut sums: HashMap<ItemId, (f64, usize)> = HashMap::new();
        let mut rated_by_user: HashMap<UserId, HashSet<ItemId>> = HashMap::new();

        for (user_id, profile) in model.iter() {
            let rated = rated_by_user.entry(user_id).or_default();
            for entry in profile.entries() {
                let slot = sums.entry(entry.item_id).or_insert((0.0, 0));
                slot.0 += entry.value;
                slot.1 += 1;
                rated.insert(entry.item_id);
            }
        }

        let item_averages: HashMap<ItemId, f64> = sums
            .into_iter()
            .map(|(item_id, (sum, count))| (item_id, sum / count as f64))
            .collect();

        debug!("trained item-average over {} items", item_averages.len());

        Ok(Box::new(ItemAverageRecommender {
            item_averages,
            rated_by_user,
        }))
    }
}

/// Trained form: per-item means plus each user's rated-item set.
pub struct ItemAverageRecommender {
    item_averages: HashMap<ItemId, f64>,
    rated_by_user: HashMap<UserId, HashSet<ItemId>>,
}

impl Recommender for ItemAverageRecommender {
    fn estimate(&self, _user_id: UserId, item_id: ItemId) -> Result<f64> {
        self.item_averages
            .get(&item_id)
            .copied()
            .ok_or_else(|| anyhow!("item {item_id} not present in training data"))
    }

    fn recommend(&self, user_id: UserId, count: usize) -> Result<Vec<ScoredItem>> {
        let rated = self
            .rated_by_user
            .get(&user_id)
            .ok_or_else(|| anyhow!("user {user_id} not present in training data"))?;

        let mut ranked: Vec<ScoredItem> = self
            .item_averages
            .iter()
            .filter(|(item_id, _)| !rated.contains(item_id))
            .map(|(&item_id, &value)| ScoredItem { item_id, value })
            .collect();

        ranked.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.item_id.cmp(&b.item_id))
        });
        ranked.truncate(count);

        Ok(ranked)
    }
}
