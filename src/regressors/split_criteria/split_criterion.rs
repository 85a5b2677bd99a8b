use crate::regressors::split_criteria::VarianceReductionSplitCriterion;
use crate::utils::memory::{MemoryMeter, MemorySized};
use std::any::Any;

/// Scores a candidate split. Distributions are `[weight, sum, sum_of_squares]`
/// of the target; a higher merit is better.
pub trait SplitCriterion: Any {
    fn get_range_of_merit(&self, pre_split_distribution: &[f64]) -> f64;
    fn get_merit_of_split(
        &self,
        pre_split_distribution: &[f64],
        post_split_dists: &[Vec<f64>],
    ) -> f64;
    fn as_any(&self) -> &dyn Any;
}

impl MemorySized for dyn SplitCriterion {
    fn inline_size(&self) -> usize {
        std::mem::size_of_val(self)
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        if let Some(vr) = self
            .as_any()
            .downcast_ref::<VarianceReductionSplitCriterion>()
        {
            vr.extra_heap_size(meter)
        } else {
            0
        }
    }
}
