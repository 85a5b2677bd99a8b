use crate::core::attributes::{AttributeRef, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{DenseInstance, Instance};
use crate::streams::Stream;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Error;
use std::sync::Arc;

/// Synthetic regression stream `y = Σ wᵢ·xᵢ + b + ε` with `xᵢ ~ U[0, 1)` and
/// uniform noise `ε ∈ [-noise, noise]`.
///
/// Every `drift_every` instances the intercept jumps by `drift_magnitude`,
/// which gives abrupt concept shifts at known positions.
pub struct DriftingLinearGenerator {
    header: Arc<InstanceHeader>,
    weights: Vec<f64>,
    intercept: f64,
    noise: f64,
    drift_magnitude: f64,
    drift_every: Option<u64>,
    seed: u64,
    max_instances: Option<u64>,
    rng: StdRng,
    produced: u64,
}

impl DriftingLinearGenerator {
    pub fn new(
        weights: Vec<f64>,
        intercept: f64,
        noise: f64,
        drift_magnitude: f64,
        drift_every: Option<u64>,
        seed: u64,
        max_instances: Option<u64>,
    ) -> Self {
        let mut attributes: Vec<AttributeRef> = (0..weights.len())
            .map(|i| Arc::new(NumericAttribute::new(format!("x{i}"))) as AttributeRef)
            .collect();
        attributes.push(Arc::new(NumericAttribute::new("y")));
        let target_index = weights.len();

        Self {
            header: Arc::new(InstanceHeader::new(
                "drifting-linear".into(),
                attributes,
                target_index,
            )),
            weights,
            intercept,
            noise: noise.abs(),
            drift_magnitude,
            drift_every: drift_every.filter(|&n| n > 0),
            seed,
            max_instances,
            rng: StdRng::seed_from_u64(seed),
            produced: 0,
        }
    }

    /// Intercept in force for the instance at position `index` (0-based).
    pub fn intercept_at(&self, index: u64) -> f64 {
        let shifts = self.drift_every.map_or(0, |every| index / every);
        self.intercept + self.drift_magnitude * shifts as f64
    }

    pub fn instances_produced(&self) -> u64 {
        self.produced
    }
}

impl Stream for DriftingLinearGenerator {
    fn header(&self) -> Arc<InstanceHeader> {
        Arc::clone(&self.header)
    }

    fn has_more_instances(&self) -> bool {
        self.max_instances.is_none_or(|max| self.produced < max)
    }

    fn next_instance(&mut self) -> Option<Box<dyn Instance>> {
        if !self.has_more_instances() {
            return None;
        }

        let mut values: Vec<f64> = Vec::with_capacity(self.weights.len() + 1);
        let mut y = self.intercept_at(self.produced);
        for &w in &self.weights {
            let x: f64 = self.rng.random();
            y += w * x;
            values.push(x);
        }
        if self.noise > 0.0 {
            y += self.rng.random_range(-self.noise..=self.noise);
        }
        values.push(y);

        self.produced += 1;
        Some(Box::new(DenseInstance::new(
            Arc::clone(&self.header),
            values,
            1.0,
        )))
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.produced = 0;
        Ok(())
    }
}
