use crate::regressors::conditional_tests::AttributeSplitSuggestion;
use std::cmp::Ordering;

pub fn compute_hoeffding_bound(range: f64, confidence: f64, n: f64) -> f64 {
    ((range * range) * (1.0 / confidence).ln() / (2.0 * n)).sqrt()
}

#[derive(Debug)]
pub enum SplitDecision {
    NoSplit,
    Split(AttributeSplitSuggestion),
    /// Not confident yet; observers may drop candidates dominated by `best_merit`.
    Prune {
        merit_ratio: f64,
        best_merit: f64,
        hoeffding_bound: f64,
    },
}

/// Hoeffding-bound split test over the best suggestion of every attribute.
/// Suggestions with a non-finite merit never compete.
pub fn evaluate_split(
    mut suggestions: Vec<AttributeSplitSuggestion>,
    examples_seen: f64,
    split_confidence: f64,
    tie_threshold: f64,
) -> SplitDecision {
    suggestions.retain(|s| s.merit.is_finite());
    suggestions.sort_by(|a, b| a.merit.partial_cmp(&b.merit).unwrap_or(Ordering::Equal));

    match suggestions.len() {
        0 => SplitDecision::NoSplit,
        1 => SplitDecision::Split(suggestions.remove(0)),
        len => {
            let best_merit = suggestions[len - 1].merit;
            let merit_ratio = suggestions[len - 2].merit / best_merit;
            let hoeffding_bound = compute_hoeffding_bound(1.0, split_confidence, examples_seen);

            if merit_ratio < 1.0 - hoeffding_bound || hoeffding_bound < tie_threshold {
                suggestions
                    .pop()
                    .map_or(SplitDecision::NoSplit, SplitDecision::Split)
            } else {
                SplitDecision::Prune {
                    merit_ratio,
                    best_merit,
                    hoeffding_bound,
                }
            }
        }
    }
}
