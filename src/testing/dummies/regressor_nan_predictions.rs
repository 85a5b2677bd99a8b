use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::regressors::Regressor;
use std::sync::Arc;

#[derive(Default)]
pub struct RegressorNanPredictions;

impl Regressor for RegressorNanPredictions {
    fn predict(&self, _instance: &dyn Instance) -> f64 {
        f64::NAN
    }

    fn set_model_context(&mut self, _header: Arc<InstanceHeader>) {}

    fn train_on_instance(&mut self, _instance: &dyn Instance) {}

    fn calc_memory_size(&self) -> usize {
        size_of::<Self>()
    }
}
