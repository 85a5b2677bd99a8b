use crate::regressors::split_criteria::SplitCriterion;
use crate::utils::memory::MemorySized;
use std::any::Any;

/// Standard deviation reduction.
#[derive(Clone, Copy, Debug, Default)]
pub struct VarianceReductionSplitCriterion;

impl VarianceReductionSplitCriterion {
    /// Every branch needs at least this much weight for the split to score.
    pub const MIN_BRANCH_WEIGHT: f64 = 5.0;

    pub fn new() -> Self {
        Self
    }

    pub fn compute_sd(distribution: &[f64]) -> f64 {
        let (n, sum, sum_sq) = match distribution {
            [n, sum, sum_sq, ..] => (*n, *sum, *sum_sq),
            _ => return 0.0,
        };
        if n <= 0.0 {
            return 0.0;
        }
        let variance = (sum_sq - sum * sum / n) / n;
        variance.max(0.0).sqrt()
    }
}

impl SplitCriterion for VarianceReductionSplitCriterion {
    fn get_range_of_merit(&self, _pre_split_distribution: &[f64]) -> f64 {
        1.0
    }

    fn get_merit_of_split(
        &self,
        pre_split_distribution: &[f64],
        post_split_dists: &[Vec<f64>],
    ) -> f64 {
        let all_branches_filled = post_split_dists
            .iter()
            .all(|d| d.first().is_some_and(|&w| w >= Self::MIN_BRANCH_WEIGHT));
        if !all_branches_filled {
            return 0.0;
        }

        let n = pre_split_distribution.first().copied().unwrap_or(0.0);
        if n <= 0.0 {
            return 0.0;
        }

        let mut sdr = Self::compute_sd(pre_split_distribution);
        for dist in post_split_dists {
            sdr -= dist[0] / n * Self::compute_sd(dist);
        }
        sdr
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl MemorySized for VarianceReductionSplitCriterion {}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(values: &[f64]) -> Vec<f64> {
        let n = values.len() as f64;
        let sum: f64 = values.iter().sum();
        let sum_sq: f64 = values.iter().map(|v| v * v).sum();
        vec![n, sum, sum_sq]
    }

    #[test]
    fn test_compute_sd_matches_population_sd() {
        let d = dist(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((VarianceReductionSplitCriterion::compute_sd(&d) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_compute_sd_clamps_negative_variance() {
        let d = vec![3.0, 3.0, 2.999_999_999_999];
        assert_eq!(VarianceReductionSplitCriterion::compute_sd(&d), 0.0);
    }

    #[test]
    fn test_perfect_split_reduces_all_spread() {
        let left = dist(&[0.0; 5]);
        let right = dist(&[10.0; 5]);
        let pre = vec![10.0, 50.0, 500.0];
        let merit = VarianceReductionSplitCriterion::new().get_merit_of_split(&pre, &[left, right]);
        assert!((merit - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_merit_is_zero_when_a_branch_is_too_small() {
        let left = dist(&[0.0; 4]);
        let right = dist(&[10.0; 6]);
        let pre = vec![10.0, 60.0, 600.0];
        let merit = VarianceReductionSplitCriterion::new().get_merit_of_split(&pre, &[left, right]);
        assert_eq!(merit, 0.0);
    }

    #[test]
    fn test_range_of_merit_is_one() {
        assert_eq!(
            VarianceReductionSplitCriterion::new().get_range_of_merit(&[1.0, 1.0, 1.0]),
            1.0
        );
    }
}
