use crate::core::instances::Instance;
use crate::regressors::fimtdd::normalization::GlobalStatistics;
use crate::utils::memory::{MemoryMeter, MemorySized};
use rand::Rng;

/// Linear model of a leaf, trained with the delta rule in normalized space.
#[derive(Clone, Debug)]
pub struct Perceptron {
    /// One weight per input attribute; the last one is the bias.
    weights: Vec<f64>,
    instances_seen: f64,
    reset: bool,
    learning_ratio: f64,
    learning_rate_decay: f64,
    learning_rate_constant: bool,
}

impl Perceptron {
    pub fn new(learning_ratio: f64, learning_rate_decay: f64, learning_rate_constant: bool) -> Self {
        Self {
            weights: Vec::new(),
            instances_seen: 0.0,
            reset: true,
            learning_ratio,
            learning_rate_decay,
            learning_rate_constant,
        }
    }

    /// Copy handed to the children of a split: same weights, fresh counter.
    pub fn warm_copy(&self) -> Self {
        Self {
            weights: self.weights.clone(),
            instances_seen: 0.0,
            reset: false,
            ..*self
        }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn instances_seen(&self) -> f64 {
        self.instances_seen
    }

    pub fn learning_rate(&self) -> f64 {
        if self.learning_rate_constant {
            self.learning_ratio
        } else {
            self.learning_ratio / (1.0 + self.instances_seen * self.learning_rate_decay)
        }
    }

    pub fn train<R: Rng>(
        &mut self,
        instance: &dyn Instance,
        target: f64,
        globals: &GlobalStatistics,
        rng: &mut R,
    ) {
        if self.reset || self.weights.is_empty() {
            self.reset = false;
            self.instances_seen = 0.0;
            self.weights = (0..=globals.number_of_inputs())
                .map(|_| 2.0 * rng.random::<f64>() - 1.0)
                .collect();
        }

        let weight = instance.weight();
        self.instances_seen += weight;
        let rate = self.learning_rate();

        for _ in 0..weight.round() as u64 {
            let input = globals.normalize_instance(instance);
            let delta = globals.normalize_target(target) - dot(&self.weights, &input);
            for (w, x) in self.weights.iter_mut().zip(&input) {
                *w += rate * delta * x;
            }
        }
    }

    pub fn predict(&self, instance: &dyn Instance, globals: &GlobalStatistics) -> f64 {
        predict_with_weights(&self.weights, instance, globals)
    }

    /// `labels[j]` names input `j`, or is `None` when the input is not numeric.
    pub fn describe(&self, labels: &[Option<String>]) -> String {
        describe_weights(&self.weights, labels)
    }
}

pub(crate) fn dot(weights: &[f64], input: &[f64]) -> f64 {
    weights.iter().zip(input).map(|(w, x)| w * x).sum()
}

pub(crate) fn predict_with_weights(
    weights: &[f64],
    instance: &dyn Instance,
    globals: &GlobalStatistics,
) -> f64 {
    if globals.examples_seen <= 1.0 {
        return 0.0;
    }
    let input = globals.normalize_instance(instance);
    globals.denormalize_target(dot(weights, &input))
}

pub(crate) fn describe_weights(weights: &[f64], labels: &[Option<String>]) -> String {
    let mut out = String::new();
    for (j, label) in labels.iter().enumerate() {
        let (Some(label), Some(&w)) = (label, weights.get(j)) else {
            continue;
        };
        if out.is_empty() {
            out.push_str(&format!("{w:.4} * {label}"));
        } else if w < 0.0 {
            out.push_str(&format!(" - {:.4} * {label}", -w));
        } else {
            out.push_str(&format!(" + {w:.4} * {label}"));
        }
    }
    let bias = weights.get(labels.len()).copied().unwrap_or(0.0);
    if out.is_empty() {
        format!("{bias:.4}")
    } else if bias < 0.0 {
        format!("{out} - {:.4}", -bias)
    } else {
        format!("{out} + {bias:.4}")
    }
}

impl MemorySized for Perceptron {
    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        meter.measure_field(&self.weights)
    }
}
