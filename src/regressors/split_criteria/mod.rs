mod split_criterion;
mod variance_reduction_split_criterion;

pub use split_criterion::SplitCriterion;
pub use variance_reduction_split_criterion::VarianceReductionSplitCriterion;
