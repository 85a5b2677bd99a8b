use crate::core::instances::Instance;
use crate::evaluation::Measurement;

/// Accumulates (instance, prediction) pairs and reports performance figures.
pub trait PerformanceEvaluator {
    fn reset(&mut self);
    fn add_result(&mut self, instance: &dyn Instance, prediction: f64);
    fn performance(&self) -> Vec<Measurement>;
}
