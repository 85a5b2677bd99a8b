use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::evaluation::Measurement;
use std::sync::Arc;

pub trait Regressor {
    fn predict(&self, instance: &dyn Instance) -> f64;
    fn set_model_context(&mut self, header: Arc<InstanceHeader>);
    fn train_on_instance(&mut self, instance: &dyn Instance);
    fn calc_memory_size(&self) -> usize;

    /// Model-specific figures reported next to the evaluator's.
    fn model_measurements(&self) -> Vec<Measurement> {
        Vec::new()
    }
}
