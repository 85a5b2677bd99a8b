use crate::regressors::attribute_observers::EbstNumericAttributeObserver;
use crate::regressors::conditional_tests::AttributeSplitSuggestion;
use crate::regressors::split_criteria::SplitCriterion;
use crate::utils::memory::{MemoryMeter, MemorySized};
use std::any::Any;

/// Per-leaf, per-attribute store of target statistics used to propose splits.
pub trait AttributeTargetObserver: Any {
    fn observe_attribute_target(&mut self, att_val: f64, target: f64, weight: f64);

    fn get_best_evaluated_split_suggestion(
        &self,
        criterion: &dyn SplitCriterion,
        pre_split_dist: &[f64],
        att_index: usize,
    ) -> Option<AttributeSplitSuggestion>;

    /// Drops stored candidates that cannot beat the current best split.
    fn remove_bad_splits(
        &mut self,
        criterion: &dyn SplitCriterion,
        pre_split_dist: &[f64],
        last_check_ratio: f64,
        last_check_merit: f64,
        last_check_bound: f64,
    );

    fn calc_memory_size(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
}

impl MemorySized for dyn AttributeTargetObserver {
    fn inline_size(&self) -> usize {
        std::mem::size_of_val(self)
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        if let Some(ebst) = self.as_any().downcast_ref::<EbstNumericAttributeObserver>() {
            ebst.extra_heap_size(meter)
        } else {
            0
        }
    }
}
