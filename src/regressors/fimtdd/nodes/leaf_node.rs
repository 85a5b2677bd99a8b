use crate::core::instances::Instance;
use crate::regressors::attribute_observers::{AttributeTargetObserver, EbstNumericAttributeObserver};
use crate::regressors::conditional_tests::AttributeSplitSuggestion;
use crate::regressors::fimtdd::normalization::GlobalStatistics;
use crate::regressors::fimtdd::nodes::NodeStatistics;
use crate::regressors::fimtdd::perceptron::Perceptron;
use crate::regressors::split_criteria::SplitCriterion;
use crate::utils::memory::{MemoryMeter, MemorySized};

pub struct LeafNode {
    /// Indexed by attribute index; `None` for the target, nominal attributes
    /// and attributes not seen yet.
    attribute_observers: Vec<Option<Box<dyn AttributeTargetObserver>>>,
    learning_model: Option<Perceptron>,
    pub examples_seen_at_last_split_evaluation: f64,
}

impl LeafNode {
    pub fn new(learning_model: Option<Perceptron>) -> Self {
        Self {
            attribute_observers: Vec::new(),
            learning_model,
            examples_seen_at_last_split_evaluation: 0.0,
        }
    }

    pub fn learning_model(&self) -> Option<&Perceptron> {
        self.learning_model.as_ref()
    }

    pub fn learning_model_mut(&mut self) -> Option<&mut Perceptron> {
        self.learning_model.as_mut()
    }

    pub fn predict(
        &self,
        stats: &NodeStatistics,
        instance: &dyn Instance,
        globals: &GlobalStatistics,
    ) -> f64 {
        match &self.learning_model {
            Some(model) => model.predict(instance, globals),
            None => stats.mean(),
        }
    }

    /// Feeds every numeric input attribute to its observer, creating
    /// observers on first sight.
    pub fn observe_attributes(
        &mut self,
        instance: &dyn Instance,
        target: f64,
        weight: f64,
        globals: &GlobalStatistics,
    ) {
        let n = instance.number_of_attributes();
        if self.attribute_observers.len() < n {
            self.attribute_observers.resize_with(n, || None);
        }

        for (i, slot) in self.attribute_observers.iter_mut().enumerate().take(n) {
            if !globals.is_numeric_input(i) {
                continue;
            }
            let Some(value) = instance.value_at_index(i) else {
                continue;
            };
            slot.get_or_insert_with(|| Box::new(EbstNumericAttributeObserver::new()))
                .observe_attribute_target(value, target, weight);
        }
    }

    pub fn best_split_suggestions(
        &self,
        criterion: &dyn SplitCriterion,
        pre_split_dist: &[f64],
    ) -> Vec<AttributeSplitSuggestion> {
        self.attribute_observers
            .iter()
            .enumerate()
            .filter_map(|(i, obs)| {
                obs.as_ref()?
                    .get_best_evaluated_split_suggestion(criterion, pre_split_dist, i)
            })
            .collect()
    }

    pub fn remove_bad_splits(
        &mut self,
        criterion: &dyn SplitCriterion,
        pre_split_dist: &[f64],
        merit_ratio: f64,
        best_merit: f64,
        hoeffding_bound: f64,
    ) {
        for obs in self.attribute_observers.iter_mut().flatten() {
            obs.remove_bad_splits(
                criterion,
                pre_split_dist,
                merit_ratio,
                best_merit,
                hoeffding_bound,
            );
        }
    }

    pub fn num_observers(&self) -> usize {
        self.attribute_observers.iter().flatten().count()
    }
}

impl MemorySized for LeafNode {
    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        meter.measure_field(&self.attribute_observers) + meter.measure_field(&self.learning_model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
    use crate::core::instance_header::InstanceHeader;
    use crate::core::instances::DenseInstance;
    use crate::regressors::split_criteria::VarianceReductionSplitCriterion;
    use std::sync::Arc;

    fn mixed_header() -> Arc<InstanceHeader> {
        let attrs: Vec<AttributeRef> = vec![
            Arc::new(NumericAttribute::new("x")),
            Arc::new(NominalAttribute::with_values("c", vec!["a".into(), "b".into()])),
            Arc::new(NumericAttribute::new("y")),
        ];
        Arc::new(InstanceHeader::new("mixed".into(), attrs, 2))
    }

    #[test]
    fn test_nominal_and_target_attributes_get_no_observer() {
        let header = mixed_header();
        let globals = GlobalStatistics::for_header(&header);
        let mut leaf = LeafNode::new(None);

        for i in 0..20 {
            let x = i as f64;
            let inst = DenseInstance::new(header.clone(), vec![x, (i % 2) as f64, x], 1.0);
            leaf.observe_attributes(&inst, x, 1.0, &globals);
        }
        assert_eq!(leaf.num_observers(), 1);
    }

    #[test]
    fn test_best_split_suggestions_reports_numeric_attribute() {
        let header = mixed_header();
        let globals = GlobalStatistics::for_header(&header);
        let mut leaf = LeafNode::new(None);
        let mut stats = NodeStatistics::default();

        for i in 0..40 {
            let x = i as f64;
            let y = if i < 20 { 0.0 } else { 10.0 };
            let inst = DenseInstance::new(header.clone(), vec![x, 0.0, y], 1.0);
            stats.add_target(y, 1.0);
            leaf.observe_attributes(&inst, y, 1.0, &globals);
        }

        let criterion = VarianceReductionSplitCriterion::new();
        let suggestions = leaf.best_split_suggestions(&criterion, &stats.distribution());
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].split_test.get_atts_test_depends_on(), vec![0]);
        assert!((suggestions[0].merit - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_regression_leaf_predicts_mean() {
        let header = mixed_header();
        let globals = GlobalStatistics::for_header(&header);
        let leaf = LeafNode::new(None);
        let mut stats = NodeStatistics::default();
        let inst = DenseInstance::new(header, vec![0.0, 0.0, 0.0], 1.0);
        assert_eq!(leaf.predict(&stats, &inst, &globals), 0.0);

        stats.add_target(3.0, 1.0);
        stats.add_target(5.0, 1.0);
        assert_eq!(leaf.predict(&stats, &inst, &globals), 4.0);
    }
}
