//! Picking the winning strategy from the evaluation results.

use crate::evaluator::EvaluationResult;

/// Pick the result with the numerically smallest usable score.
///
/// A score is usable when it is defined and not NaN; an undefined score
/// excludes the strategy from consideration, it does not disqualify the
/// run. Ties go to the earliest entry (registry order), enforced by the
/// strictly-smaller comparison in the fold. `None` means no strategy was
/// usable, which is a normal terminal outcome for the pipeline.
pub fn select_best(results: &[EvaluationResult]) -> Option<&EvaluationResult> {
    results
        .iter()
        .filter_map(|result| {
            result
                .score
                .filter(|score| !score.is_nan())
                .map(|score| (result, score))
        })
        .fold(
            None::<(&EvaluationResult, f64)>,
            |best, (candidate, score)| match best {
                Some((_, best_score)) if score < best_score => Some((candidate, score)),
                Some(_) => best,
                None => Some((candidate, score)),
            },
        )
        .map(|(result, _)| result)
}
