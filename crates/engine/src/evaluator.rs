//! Strategy evaluation under a fixed holdout protocol.
//!
//! Every candidate strategy is scored the same way: each user's profile is
//! partitioned probabilistically into train/test subsets, the strategy is
//! trained on the train subset only, and the mean absolute error of its
//! predictions over the held-out entries is the score. Lower is better.
//!
//! A strategy that cannot be scored (its build failed, or the split left
//! nothing to predict) gets an undefined score instead of aborting the
//! evaluation run. An undefined score is always an explicit `None`, never
//! NaN and never a division by zero.

use model::{ItemId, PreferenceModel, UserId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use strategies::{RecommendationStrategy, StrategyRegistry};
use tracing::{debug, warn};

/// Parameters of the evaluation protocol.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationProtocol {
    /// Probability that a profile entry lands in the training subset
    pub train_fraction: f64,
    /// Fixed split seed; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for EvaluationProtocol {
    fn default() -> Self {
        Self {
            train_fraction: 0.95,
            seed: None,
        }
    }
}

/// Outcome of scoring one strategy. `score` is `None` when the strategy
/// could not be scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub strategy: String,
    pub score: Option<f64>,
}

/// Score every registered strategy against `model`, in registry order.
pub fn evaluate_all(
    model: &PreferenceModel,
    registry: &StrategyRegistry,
    protocol: &EvaluationProtocol,
) -> Vec<EvaluationResult> {
    registry
        .iter()
        .map(|strategy| EvaluationResult {
            strategy: strategy.name().to_string(),
            score: evaluate_strategy(model, strategy, protocol),
        })
        .collect()
}

/// Score one strategy; `None` means it could not be scored this run.
pub fn evaluate_strategy(
    model: &PreferenceModel,
    strategy: &dyn RecommendationStrategy,
    protocol: &EvaluationProtocol,
) -> Option<f64> {
    let mut rng = match protocol.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let (train, test) = split(model, protocol.train_fraction, &mut rng);
    if test.is_empty() {
        debug!(
            "holdout split left nothing to score for '{}'",
            strategy.name()
        );
        return None;
    }

    let recommender = match strategy.build(&train) {
        Ok(recommender) => recommender,
        Err(err) => {
            warn!("strategy '{}' failed to build: {err:#}", strategy.name());
            return None;
        }
    };

    let mut total_error = 0.0;
    let mut scored = 0usize;
    for (user_id, item_id, actual) in test {
        match recommender.estimate(user_id, item_id) {
            Ok(predicted) if predicted.is_finite() => {
                total_error += (predicted - actual).abs();
                scored += 1;
            }
            Ok(predicted) => {
                debug!("non-finite estimate {predicted} for ({user_id}, {item_id}), skipped");
            }
            Err(err) => {
                debug!("no estimate for ({user_id}, {item_id}): {err:#}");
            }
        }
    }

    if scored == 0 {
        debug!("'{}' produced no scorable estimates", strategy.name());
        return None;
    }

    let score = total_error / scored as f64;
    score.is_finite().then_some(score)
}

/// Partition the model entry-wise: each preference entry stays in the train
/// model with probability `train_fraction`, otherwise it becomes a held-out
/// `(user, item, actual)` triple. Users whose every entry was held out are
/// absent from the train model.
fn split(
    model: &PreferenceModel,
    train_fraction: f64,
    rng: &mut StdRng,
) -> (PreferenceModel, Vec<(UserId, ItemId, f64)>) {
    let fraction = train_fraction.clamp(0.0, 1.0);
    let mut train = PreferenceModel::new();
    let mut test = Vec::new();

    // Users are visited in id order so a fixed seed yields a fixed split
    for user_id in model.sorted_user_ids() {
        let Some(profile) = model.profile(user_id) else {
            continue;
        };
        for entry in profile.entries() {
            if rng.random_bool(fraction) {
                train.merge(model::RatingRecord {
                    user_id,
                    item_id: entry.item_id,
                    value: entry.value,
                });
            } else {
                test.push((user_id, entry.item_id, entry.value));
            }
        }
    }

    (train, test)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow, bail};
    use model::RatingRecord;
    use strategies::{Recommender, ScoredItem};

    /// Estimates every pair at a fixed constant.
    struct ConstantStrategy {
        name: &'static str,
        estimate: f64,
    }

    struct ConstantRecommender {
        estimate: f64,
    }

    impl Recommender for ConstantRecommender {
        fn estimate(&self, _user_id: UserId, _item_id: ItemId) -> Result<f64> {
            Ok(self.estimate)
        }

        fn recommend(&self, _user_id: UserId, _count: usize) -> Result<Vec<ScoredItem>> {
            Ok(Vec::new())
        }
    }

    impl RecommendationStrategy for ConstantStrategy {
        fn name(&self) -> &str {
            self.name
        }

        fn build(&self, _model: &PreferenceModel) -> Result<Box<dyn Recommender>> {
            Ok(Box::new(ConstantRecommender {
                estimate: self.estimate,
            }))
        }
    }

    /// Never builds.
    struct BrokenStrategy;

    impl RecommendationStrategy for BrokenStrategy {
        fn name(&self) -> &str {
            "broken"
        }

        fn build(&self, _model: &PreferenceModel) -> Result<Box<dyn Recommender>> {
            bail!("simulated training failure")
        }
    }

    /// Estimates nothing.
    struct UnestimableStrategy;

    struct UnestimableRecommender;

    impl Recommender for UnestimableRecommender {
        fn estimate(&self, _user_id: UserId, _item_id: ItemId) -> Result<f64> {
            Err(anyhow!("nothing is estimable"))
        }

        fn recommend(&self, _user_id: UserId, _count: usize) -> Result<Vec<ScoredItem>> {
            Ok(Vec::new())
        }
    }

    impl RecommendationStrategy for UnestimableStrategy {
        fn name(&self) -> &str {
            "unestimable"
        }

        fn build(&self, _model: &PreferenceModel) -> Result<Box<dyn Recommender>> {
            Ok(Box::new(UnestimableRecommender))
        }
    }

    /// Twenty ratings, all 3.0, so a constant estimator's error is exact
    /// whatever the split looks like.
    fn flat_model() -> PreferenceModel {
        let mut model = PreferenceModel::new();
        for user_id in 1..=4u64 {
            for item_id in 1..=5u64 {
                model.merge(RatingRecord {
                    user_id,
                    item_id,
                    value: 3.0,
                });
            }
        }
        model
    }

    /// Mixes entries between train and test.
    fn mixed_protocol() -> EvaluationProtocol {
        EvaluationProtocol {
            train_fraction: 0.5,
            seed: Some(7),
        }
    }

    /// Holds out every entry, so exact scores don't depend on the draw.
    fn full_holdout() -> EvaluationProtocol {
        EvaluationProtocol {
            train_fraction: 0.0,
            seed: Some(7),
        }
    }

    #[test]
    fn constant_estimator_scores_its_offset() {
        let model = flat_model();
        let strategy = ConstantStrategy {
            name: "offset",
            estimate: 3.2,
        };

        let score = evaluate_strategy(&model, &strategy, &full_holdout()).unwrap();
        assert!((score - 0.2).abs() < 1e-9);
    }

    #[test]
    fn score_is_non_negative() {
        let model = flat_model();
        let strategy = ConstantStrategy {
            name: "below",
            estimate: 1.0,
        };

        let score = evaluate_strategy(&model, &strategy, &full_holdout()).unwrap();
        assert!(score >= 0.0);
    }

    #[test]
    fn same_seed_same_score() {
        let model = flat_model();
        let strategy = ConstantStrategy {
            name: "repeatable",
            estimate: 2.5,
        };
        let protocol = mixed_protocol();

        let first = evaluate_strategy(&model, &strategy, &protocol);
        let second = evaluate_strategy(&model, &strategy, &protocol);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_model_is_unscorable() {
        let model = PreferenceModel::new();
        let strategy = ConstantStrategy {
            name: "anything",
            estimate: 3.0,
        };

        assert_eq!(evaluate_strategy(&model, &strategy, &mixed_protocol()), None);
    }

    #[test]
    fn degenerate_split_is_unscorable_not_a_division() {
        // train_fraction 1.0 keeps every entry in train: zero test pairs
        let model = flat_model();
        let protocol = EvaluationProtocol {
            train_fraction: 1.0,
            seed: Some(7),
        };
        let strategy = ConstantStrategy {
            name: "all-train",
            estimate: 3.0,
        };

        assert_eq!(evaluate_strategy(&model, &strategy, &protocol), None);
    }

    #[test]
    fn build_failure_is_unscorable_only_for_that_strategy() {
        let model = flat_model();
        let registry = StrategyRegistry::new()
            .register(BrokenStrategy)
            .register(ConstantStrategy {
                name: "fine",
                estimate: 3.0,
            });

        let results = evaluate_all(&model, &registry, &full_holdout());
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].strategy, "broken");
        assert_eq!(results[0].score, None);
        assert!(results[1].score.is_some());
    }

    #[test]
    fn per_pair_estimate_failures_yield_undefined_score() {
        let model = flat_model();
        let score = evaluate_strategy(&model, &UnestimableStrategy, &mixed_protocol());
        assert_eq!(score, None);
    }

    #[test]
    fn results_come_back_in_registry_order() {
        let model = flat_model();
        let registry = StrategyRegistry::new()
            .register(ConstantStrategy {
                name: "first",
                estimate: 3.0,
            })
            .register(ConstantStrategy {
                name: "second",
                estimate: 3.0,
            });

        let names: Vec<String> = evaluate_all(&model, &registry, &mixed_protocol())
            .into_iter()
            .map(|r| r.strategy)
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }
}
