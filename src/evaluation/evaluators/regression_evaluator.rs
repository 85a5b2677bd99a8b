use crate::core::instances::Instance;
use crate::evaluation::estimators::Estimator;
use crate::evaluation::{Measurement, PerformanceEvaluator};

/// Weighted MAE, RMSE and mean target, each tracked by its own estimator.
///
/// Instances with a missing target, a non-positive weight or a non-finite
/// prediction are not counted.
#[derive(Clone, Debug)]
pub struct RegressionEvaluator<E: Estimator + Clone> {
    prototype: E,
    absolute_error: E,
    squared_error: E,
    target: E,
}

impl<E: Estimator + Clone> RegressionEvaluator<E> {
    pub fn new(prototype: E) -> Self {
        Self {
            absolute_error: prototype.clone(),
            squared_error: prototype.clone(),
            target: prototype.clone(),
            prototype,
        }
    }

    pub fn mae(&self) -> f64 {
        self.absolute_error.estimation()
    }

    pub fn rmse(&self) -> f64 {
        self.squared_error.estimation().sqrt()
    }

    pub fn mean_target(&self) -> f64 {
        self.target.estimation()
    }

    pub fn weight_seen(&self) -> f64 {
        self.target.total_weight()
    }
}

impl<E: Estimator + Clone> PerformanceEvaluator for RegressionEvaluator<E> {
    fn reset(&mut self) {
        *self = Self::new(self.prototype.clone());
    }

    fn add_result(&mut self, instance: &dyn Instance, prediction: f64) {
        let weight = instance.weight();
        let Some(target) = instance.target_value() else {
            return;
        };
        if !prediction.is_finite() || weight.is_nan() || weight <= 0.0 {
            return;
        }
        let error = target - prediction;
        self.absolute_error.add(error.abs(), weight);
        self.squared_error.add(error * error, weight);
        self.target.add(target, weight);
    }

    fn performance(&self) -> Vec<Measurement> {
        vec![
            Measurement::new("mae", self.mae()),
            Measurement::new("rmse", self.rmse()),
            Measurement::new("mean_target", self.mean_target()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{BasicEstimator, WindowEstimator};
    use crate::testing::instances::{numeric_header, numeric_instance};

    #[test]
    fn reports_weighted_mae_and_rmse() {
        let header = numeric_header(1);
        let mut eval = RegressionEvaluator::new(BasicEstimator::default());
        eval.add_result(&numeric_instance(&header, &[0.0], 1.0), 2.0);
        let mut heavy = numeric_instance(&header, &[0.0], 5.0);
        heavy.set_weight(3.0).unwrap();
        eval.add_result(&heavy, 2.0);

        assert!((eval.mae() - (1.0 + 3.0 * 3.0) / 4.0).abs() < 1e-12);
        assert!((eval.rmse() - ((1.0 + 3.0 * 9.0) / 4.0_f64).sqrt()).abs() < 1e-12);
        assert!((eval.mean_target() - (1.0 + 15.0) / 4.0).abs() < 1e-12);

        let names: Vec<String> = eval.performance().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["mae", "rmse", "mean_target"]);
    }

    #[test]
    fn skips_unusable_results() {
        let header = numeric_header(1);
        let mut eval = RegressionEvaluator::new(BasicEstimator::default());
        eval.add_result(&numeric_instance(&header, &[0.0], f64::NAN), 1.0);
        eval.add_result(&numeric_instance(&header, &[0.0], 1.0), f64::NAN);
        let mut weightless = numeric_instance(&header, &[0.0], 1.0);
        weightless.set_weight(0.0).unwrap();
        eval.add_result(&weightless, 0.0);

        assert_eq!(eval.weight_seen(), 0.0);
        assert!(eval.mae().is_nan());
        assert!(eval.rmse().is_nan());
    }

    #[test]
    fn window_variant_forgets_old_errors_and_reset_clears() {
        let header = numeric_header(1);
        let mut eval = RegressionEvaluator::new(WindowEstimator::new(2));
        for prediction in [100.0, 1.0, 1.0] {
            eval.add_result(&numeric_instance(&header, &[0.0], 0.0), prediction);
        }
        assert_eq!(eval.mae(), 1.0);

        eval.reset();
        assert!(eval.mae().is_nan());
        eval.add_result(&numeric_instance(&header, &[0.0], 0.0), 4.0);
        assert_eq!(eval.mae(), 4.0);
    }
}
