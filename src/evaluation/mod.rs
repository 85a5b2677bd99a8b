mod estimators;
mod evaluators;
mod measurement;
mod preview;

pub use estimators::{BasicEstimator, Estimator, WindowEstimator};
pub use evaluators::{PerformanceEvaluator, RegressionEvaluator};
pub use measurement::Measurement;
pub use preview::learning_curve::{CurveFormat, LearningCurve};
pub use preview::snapshot::Snapshot;
