use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{DenseInstance, Instance};
use crate::streams::Stream;
use crate::testing::instances::numeric_header;
use std::io::Error;
use std::sync::Arc;

/// Replays a fixed list of targets; the single input is the position.
pub struct VecStream {
    header: Arc<InstanceHeader>,
    targets: Vec<f64>,
    position: usize,
}

impl VecStream {
    pub fn new(targets: Vec<f64>) -> Self {
        Self {
            header: numeric_header(1),
            targets,
            position: 0,
        }
    }
}

impl Stream for VecStream {
    fn header(&self) -> Arc<InstanceHeader> {
        Arc::clone(&self.header)
    }

    fn has_more_instances(&self) -> bool {
        self.position < self.targets.len()
    }

    fn next_instance(&mut self) -> Option<Box<dyn Instance>> {
        let target = *self.targets.get(self.position)?;
        let x = self.position as f64;
        self.position += 1;
        Some(Box::new(DenseInstance::new(
            Arc::clone(&self.header),
            vec![x, target],
            1.0,
        )))
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.position = 0;
        Ok(())
    }
}
