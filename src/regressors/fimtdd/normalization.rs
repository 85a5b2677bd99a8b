use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::utils::memory::{MemoryMeter, MemorySized};
use serde::{Deserialize, Serialize};

fn standard_deviation(sum_of_squares: f64, sum: f64, n: f64) -> f64 {
    if n <= 1.0 {
        return 0.0;
    }
    ((sum_of_squares - sum * sum / n) / n).max(0.0).sqrt()
}

/// Running target and attribute statistics over everything the tree has been
/// trained on. Leaves and perceptrons read it to move values into the
/// normalized space `(v - mean) / (3 * sd)`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalStatistics {
    pub examples_seen: f64,
    pub sum_of_values: f64,
    pub sum_of_squares: f64,
    target_index: usize,
    numeric: Vec<bool>,
    attribute_weights: Vec<f64>,
    attribute_sums: Vec<f64>,
    attribute_squares: Vec<f64>,
}

impl GlobalStatistics {
    pub fn for_header(header: &InstanceHeader) -> Self {
        let n = header.number_of_attributes();
        Self {
            target_index: header.target_index(),
            numeric: (0..n).map(|i| header.is_numeric(i)).collect(),
            attribute_weights: vec![0.0; n],
            attribute_sums: vec![0.0; n],
            attribute_squares: vec![0.0; n],
            ..Self::default()
        }
    }

    pub fn is_initialized(&self) -> bool {
        !self.numeric.is_empty()
    }

    pub fn target_index(&self) -> usize {
        self.target_index
    }

    pub fn number_of_inputs(&self) -> usize {
        self.numeric.len().saturating_sub(1)
    }

    pub fn input_to_attribute_index(&self, input_index: usize) -> usize {
        if input_index < self.target_index {
            input_index
        } else {
            input_index + 1
        }
    }

    /// True for numeric input attributes; the target and nominal attributes
    /// are not.
    pub fn is_numeric_input(&self, attribute_index: usize) -> bool {
        attribute_index != self.target_index
            && self.numeric.get(attribute_index).copied().unwrap_or(false)
    }

    pub fn update(&mut self, instance: &dyn Instance, target: f64, weight: f64) {
        self.examples_seen += weight;
        self.sum_of_values += weight * target;
        self.sum_of_squares += weight * target * target;

        for i in 0..self.numeric.len() {
            if !self.is_numeric_input(i) {
                continue;
            }
            let Some(value) = instance.value_at_index(i).filter(|v| !v.is_nan()) else {
                continue;
            };
            self.attribute_weights[i] += weight;
            self.attribute_sums[i] += weight * value;
            self.attribute_squares[i] += weight * value * value;
        }
    }

    pub fn target_mean(&self) -> f64 {
        if self.examples_seen > 0.0 {
            self.sum_of_values / self.examples_seen
        } else {
            0.0
        }
    }

    pub fn target_sd(&self) -> f64 {
        standard_deviation(self.sum_of_squares, self.sum_of_values, self.examples_seen)
    }

    pub fn normalize_target(&self, value: f64) -> f64 {
        if self.examples_seen <= 1.0 {
            return 0.0;
        }
        let sd = self.target_sd();
        if sd > 0.0 {
            (value - self.target_mean()) / (3.0 * sd)
        } else {
            0.0
        }
    }

    pub fn denormalize_target(&self, normalized: f64) -> f64 {
        if self.examples_seen <= 1.0 {
            return 0.0;
        }
        normalized * 3.0 * self.target_sd() + self.target_mean()
    }

    /// Distance between target and prediction, both in normalized space.
    pub fn normalized_error(&self, target: f64, prediction: f64) -> f64 {
        (self.normalize_target(target) - self.normalize_target(prediction)).abs()
    }

    /// One entry per input attribute followed by the bias input.
    pub fn normalize_instance(&self, instance: &dyn Instance) -> Vec<f64> {
        let inputs = self.number_of_inputs();
        let mut normalized = Vec::with_capacity(inputs + 1);

        for j in 0..inputs {
            let i = self.input_to_attribute_index(j);
            normalized.push(self.normalize_attribute(i, instance.value_at_index(i)));
        }
        normalized.push(if self.examples_seen > 1.0 { 1.0 } else { 0.0 });
        normalized
    }

    fn normalize_attribute(&self, attribute_index: usize, value: Option<f64>) -> f64 {
        let Some(value) = value.filter(|v| !v.is_nan()) else {
            return 0.0;
        };
        if !self.is_numeric_input(attribute_index) || self.examples_seen <= 1.0 {
            return 0.0;
        }
        let n = self.attribute_weights[attribute_index];
        let sum = self.attribute_sums[attribute_index];
        let sd = standard_deviation(self.attribute_squares[attribute_index], sum, n);
        if sd > 0.0 {
            (value - sum / n) / (3.0 * sd)
        } else {
            0.0
        }
    }
}

impl MemorySized for GlobalStatistics {
    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        meter.measure_field(&self.numeric)
            + meter.measure_field(&self.attribute_weights)
            + meter.measure_field(&self.attribute_sums)
            + meter.measure_field(&self.attribute_squares)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::instances::{numeric_header, numeric_instance};

    #[test]
    fn test_normalize_target_is_zero_until_two_examples() {
        let header = numeric_header(1);
        let mut g = GlobalStatistics::for_header(&header);
        assert_eq!(g.normalize_target(5.0), 0.0);

        g.update(&numeric_instance(&header, &[0.0], 3.0), 3.0, 1.0);
        assert_eq!(g.normalize_target(5.0), 0.0);
        assert_eq!(g.denormalize_target(1.0), 0.0);
    }

    #[test]
    fn test_normalize_target_uses_three_sigma() {
        let header = numeric_header(1);
        let mut g = GlobalStatistics::for_header(&header);
        for y in [1.0, 3.0] {
            g.update(&numeric_instance(&header, &[0.0], y), y, 1.0);
        }
        // mean 2, sd 1
        assert!((g.normalize_target(5.0) - 1.0).abs() < 1e-12);
        assert!((g.denormalize_target(1.0) - 5.0).abs() < 1e-12);
        assert_eq!(g.normalize_target(5.0), g.normalize_target(5.0));
    }

    #[test]
    fn test_zero_variance_target_normalizes_to_zero() {
        let header = numeric_header(1);
        let mut g = GlobalStatistics::for_header(&header);
        for _ in 0..10 {
            g.update(&numeric_instance(&header, &[1.0], 4.0), 4.0, 1.0);
        }
        assert_eq!(g.normalize_target(100.0), 0.0);
        assert_eq!(g.normalized_error(4.0, 100.0), 0.0);
    }

    #[test]
    fn test_normalize_instance_appends_bias_and_skips_constant_attributes() {
        let header = numeric_header(2);
        let mut g = GlobalStatistics::for_header(&header);
        for (x0, y) in [(0.0, 1.0), (2.0, 2.0)] {
            g.update(&numeric_instance(&header, &[x0, 7.0], y), y, 1.0);
        }
        let v = g.normalize_instance(&numeric_instance(&header, &[4.0, 7.0], 0.0));
        // x0: mean 1, sd 1 -> (4 - 1) / 3
        assert_eq!(v.len(), 3);
        assert!((v[0] - 1.0).abs() < 1e-12);
        assert_eq!(v[1], 0.0);
        assert_eq!(v[2], 1.0);
    }

    #[test]
    fn test_missing_attribute_values_do_not_poison_sums() {
        let header = numeric_header(1);
        let mut g = GlobalStatistics::for_header(&header);
        g.update(&numeric_instance(&header, &[f64::NAN], 1.0), 1.0, 1.0);
        g.update(&numeric_instance(&header, &[1.0], 2.0), 2.0, 1.0);
        g.update(&numeric_instance(&header, &[3.0], 3.0), 3.0, 1.0);
        let v = g.normalize_instance(&numeric_instance(&header, &[f64::NAN], 0.0));
        assert_eq!(v[0], 0.0);
        let v = g.normalize_instance(&numeric_instance(&header, &[5.0], 0.0));
        assert!(v[0].is_finite());
        assert!((v[0] - 1.0).abs() < 1e-12);
    }
}
