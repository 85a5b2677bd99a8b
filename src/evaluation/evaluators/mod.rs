mod performance_evaluator;
mod regression_evaluator;

pub use performance_evaluator::PerformanceEvaluator;
pub use regression_evaluator::RegressionEvaluator;
