use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::regressors::Regressor;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

pub struct TrainSpyHandle(Arc<AtomicU64>);

impl TrainSpyHandle {
    pub fn count(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Predicts the target exactly and counts `train_on_instance` calls.
pub struct TrainSpyRegressor {
    count: Arc<AtomicU64>,
}

impl TrainSpyRegressor {
    pub fn new() -> (Self, TrainSpyHandle) {
        let counter = Arc::new(AtomicU64::new(0));
        (
            Self {
                count: counter.clone(),
            },
            TrainSpyHandle(counter),
        )
    }
}

impl Regressor for TrainSpyRegressor {
    fn predict(&self, instance: &dyn Instance) -> f64 {
        instance.target_value().unwrap_or_default()
    }

    fn set_model_context(&mut self, _header: Arc<InstanceHeader>) {}

    fn train_on_instance(&mut self, _instance: &dyn Instance) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    fn calc_memory_size(&self) -> usize {
        size_of::<Self>()
    }
}
