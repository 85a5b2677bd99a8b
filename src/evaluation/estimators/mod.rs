mod basic_estimator;
mod window_estimator;

pub use basic_estimator::BasicEstimator;
pub use window_estimator::WindowEstimator;

/// Weighted running mean of a stream of values.
pub trait Estimator {
    fn add(&mut self, value: f64, weight: f64);
    /// NaN until something with positive weight was added.
    fn estimation(&self) -> f64;
    fn total_weight(&self) -> f64;
    fn reset(&mut self);
}
