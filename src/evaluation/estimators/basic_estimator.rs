use super::Estimator;

/// Mean over everything seen since the last reset.
#[derive(Clone, Debug, Default)]
pub struct BasicEstimator {
    sum: f64,
    weight: f64,
}

impl Estimator for BasicEstimator {
    fn add(&mut self, value: f64, weight: f64) {
        self.sum += value * weight;
        self.weight += weight;
    }

    fn estimation(&self) -> f64 {
        if self.weight > 0.0 {
            self.sum / self.weight
        } else {
            f64::NAN
        }
    }

    fn total_weight(&self) -> f64 {
        self.weight
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
