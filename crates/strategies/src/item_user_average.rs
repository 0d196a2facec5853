//! Item-user-average baseline strategy.
//!
//! Refines the plain item mean with the user's own bias: the prediction is
//! `item_avg + (user_avg - global_avg)`, so a user who rates everything a
//! point above the crowd gets every item shifted up a point.

use crate::traits::{RecommendationStrategy, Recommender, ScoredItem};
use anyhow::{Result, anyhow, bail};
use model::{ItemId, PreferenceModel, UserId};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// Builds [`ItemUserAverageRecommender`]s.
pub struct ItemUserAverageStrategy;

impl RecommendationStrategy for ItemUserAverageStrategy {
    fn name(&self) -> &str {
        "item-user-average"
    }

    #[instrument(skip_all, fields(users = model.user_count()))]
    fn build(&self, model: &PreferenceModel) -> Result<Box<dyn Recommender>> {
        if model.is_empty() {
            bail!("cannot train item-user-average on an empty preference model");
        }

        let mut item_sums: HashMap<ItemId, (f64, usize)> = HashMap::new();
        let mut user_averages: HashMap<UserId, f64> = HashMap::new();
        let mut rated_by_user: HashMap<UserId, HashSet<ItemId>> = HashMap::new();
        let mut global_sum = 0.0;
        let mut global_count = 0usize;

        for (user_id, profile) in model.iter() {
            let rated = rated_by_user.entry(user_id).or_default();
            let mut user_sum = 0.0;
            for entry in profile.entries() {
                let slot = item_sums.entry(entry.item_id).or_insert((0.0, 0));
                slot.0 += entry.value;
                slot.1 += 1;
                user_sum += entry.value;
                rated.insert(entry.item_id);
            }
            // Model invariant: every known user has at least one entry
            user_averages.insert(user_id, user_sum / profile.len() as f64);
            global_sum += user_sum;
            global_count += profile.len();
        }

        let item_averages: HashMap<ItemId, f64> = item_sums
            .into_iter()
            .map(|(item_id, (sum, count))| (item_id, sum / count as f64))
            .collect();
        let global_average = global_sum / global_count as f64;

        debug!(
            "trained item-user-average over {} items, global mean {:.3}",
            item_averages.len(),
            global_average
        );

        Ok(Box::new(ItemUserAverageRecommender {
            item_averages,
            user_averages,
            global_average,
            rated_by_user,
        }))
    }
}

/// Trained form: item means, user means and the global mean.
pub struct ItemUserAverageRecommender {
    item_averages: HashMap<ItemId, f64>,
    user_averages: HashMap<UserId, f64>,
    global_average: f64,
    rated_by_user: HashMap<UserId, HashSet<ItemId>>,
}

impl Recommender for ItemUserAverageRecommender {
    fn estimate(&self, user_id: UserId, item_id: ItemId) -> Result<f64> {
        let item_avg = self
            .item_averages
            .get(&item_id)
            .ok_or_else(|| anyhow!("item {item_id} not present in training data"))?;
        let user_avg = self
            .user_averages
            .get(&user_id)
            .ok_or_else(|| anyhow!("user {user_id} not present in training data"))?;

        Ok(item_avg + (user_avg - self.global_average))
    }

    fn recommend(&self, user_id: UserId, count: usize) -> Result<Vec<ScoredItem>> {
        let rated = self
            .rated_by_user
            .get(&user_id)
            .ok_or_else(|| anyhow!("user {user_id} not present in training data"))?;

        let mut ranked: Vec<ScoredItem> = Vec::new();
        for &item_id in self.item_averages.keys() {
            if rated.contains(&item_id) {
                continue;
            }
            let value = self.estimate(user_id, item_id)?;
            ranked.push(ScoredItem { item_id, value });
        }

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

#[cfg(test)]
mod tests {
    use super::*;
    use model::RatingRecord;

    fn create_test_model() -> PreferenceModel {
        let mut model = PreferenceModel::new();
        // Item averages: 10 -> 4.5, 20 -> 3.0, 30 -> 1.0
        // User averages: 1 -> 4.0, 2 -> 2.5; global average 3.25
        for (user_id, item_id, value) in [(1u64, 10u64, 5.0), (1, 20, 3.0), (2, 10, 4.0), (2, 30, 1.0)]
        {
            model.merge(RatingRecord {
                user_id,
                item_id,
                value,
            });
        }
        model
    }

    #[test]
    fn estimate_applies_the_user_bias() {
        let recommender = ItemUserAverageStrategy
            .build(&create_test_model())
            .unwrap();

        // item 30 avg 1.0, user 1 avg 4.0, global 3.25 -> 1.75
        assert!((recommender.estimate(1, 30).unwrap() - 1.75).abs() < 1e-9);
        // item 20 avg 3.0, user 2 avg 2.5, global 3.25 -> 2.25
        assert!((recommender.estimate(2, 20).unwrap() - 2.25).abs() < 1e-9);
    }

    #[test]
    fn estimate_fails_for_unknown_user_or_item() {
        let recommender = ItemUserAverageStrategy
            .build(&create_test_model())
            .unwrap();
        assert!(recommender.estimate(999, 10).is_err());
        assert!(recommender.estimate(1, 999).is_err());
    }

    #[test]
    fn recommend_ranks_unrated_items_by_biased_estimate() {
        let recommender = ItemUserAverageStrategy
            .build(&create_test_model())
            .unwrap();

        let ranked = recommender.recommend(2, 10).unwrap();
        let items: Vec<u64> = ranked.iter().map(|s| s.item_id).collect();
        assert_eq!(items, vec![20]);
        assert!((ranked[0].value - 2.25).abs() < 1e-9);
    }

    #[test]
    fn build_fails_on_empty_model() {
        assert!(
            ItemUserAverageStrategy
                .build(&PreferenceModel::new())
                .is_err()
        );
    }
}
