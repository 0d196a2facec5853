//! # Pipeline Orchestrator
//!
//! Sequences the whole batch pass:
//! 1. Scan the store for rating records
//! 2. Build the preference model
//! 3. Evaluate every registered strategy under the holdout protocol
//! 4. Select the strategy with the lowest usable score
//! 5. Retrain the winner on the full model and generate per-user
//!    recommendations
//! 6. Replace each user's stored recommendation list
//!
//! Nothing here is transactional. A failed rating scan degrades to an empty
//! model (and from there to the "no usable strategy" outcome); a failed
//! per-user write is logged and the remaining users are still written. The
//! recovery path for any partial run is simply a rerun.

use crate::evaluator::{EvaluationProtocol, EvaluationResult, evaluate_all};
use crate::generator::generate;
use crate::selector::select_best;
use anyhow::{Context, Result};
use model::PreferenceModel;
use std::time::Instant;
use store::RecommendationStore;
use strategies::StrategyRegistry;
use tracing::{info, warn};

/// Terminal state of one batch pass.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// A strategy was selected and recommendations were persisted.
    Completed {
        selected: String,
        evaluations: Vec<EvaluationResult>,
        /// Users whose list was fully replaced
        written: usize,
        /// Users whose write was abandoned on a store error
        write_failures: usize,
    },
    /// No strategy produced a usable score; the writer never ran. A normal
    /// outcome, not a fault.
    NoUsableStrategy {
        evaluations: Vec<EvaluationResult>,
    },
}

/// Run one full batch pass against `store` with the strategies in
/// `registry`.
pub async fn run_pipeline<S: RecommendationStore>(
    store: &S,
    registry: &StrategyRegistry,
    protocol: &EvaluationProtocol,
) -> Result<PipelineOutcome> {
    let started = Instant::now();

    // Ingestion: a failed scan means an empty model, not a crash; the
    // empty model flows into "no usable strategy" below.
    let pairs = match store.fetch_ratings().await {
        Ok(pairs) => pairs,
        Err(err) => {
            warn!("rating scan failed, continuing with an empty model: {err:#}");
            Vec::new()
        }
    };
    let (model, skipped_records) = PreferenceModel::ingest(pairs);
    if skipped_records > 0 {
        warn!("skipped {skipped_records} malformed rating records");
    }
    info!(
        "built preference model: {} users, {} ratings",
        model.user_count(),
        model.rating_count()
    );

    // Evaluation: one score per strategy, undefined scores included so the
    // report shows every candidate.
    let evaluations = evaluate_all(&model, registry, protocol);
    for result in &evaluations {
        match result.score {
            Some(score) => info!("evaluated strategy '{}' with score {score}", result.strategy),
            None => info!("strategy '{}' produced no usable score", result.strategy),
        }
    }

    // Selection
    let Some(best) = select_best(&evaluations) else {
        info!("no usable strategy, nothing to recommend");
        return Ok(PipelineOutcome::NoUsableStrategy { evaluations });
    };
    let selected = best.strategy.clone();
    info!("selected strategy '{selected}'");

    // Generation on the full model
    let strategy = registry
        .iter()
        .find(|s| s.name() == selected)
        .context("selected strategy missing from registry")?;
    let recommendations = generate(&model, strategy)?;
    info!(
        "generated recommendations for {} of {} users",
        recommendations.len(),
        model.user_count()
    );

    // Persistence: users are independent, a failed write is abandoned and
    // the loop continues.
    let mut written = 0usize;
    let mut write_failures = 0usize;
    for recommendation in &recommendations {
        match store
            .replace_recommendations(recommendation.user_id, &recommendation.item_ids)
            .await
        {
            Ok(()) => written += 1,
            Err(err) => {
                write_failures += 1;
                warn!(
                    "abandoning recommendation write for user {}: {err:#}",
                    recommendation.user_id
                );
            }
        }
    }

    info!(
        "batch pass finished in {:.2?}: {written} lists written, {write_failures} failed",
        started.elapsed()
    );

    Ok(PipelineOutcome::Completed {
        selected,
        evaluations,
        written,
        write_failures,
    })
}
