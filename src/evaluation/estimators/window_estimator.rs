use super::Estimator;
use std::collections::VecDeque;

/// Mean over the most recent `window` observations.
#[derive(Clone, Debug)]
pub struct WindowEstimator {
    window: usize,
    entries: VecDeque<(f64, f64)>,
    sum: f64,
    weight: f64,
}

impl WindowEstimator {
    /// A window of zero is treated as one.
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            entries: VecDeque::with_capacity(window),
            sum: 0.0,
            weight: 0.0,
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Estimator for WindowEstimator {
    fn add(&mut self, value: f64, weight: f64) {
        if self.entries.len() == self.window {
            if let Some((old_value, old_weight)) = self.entries.pop_front() {
                self.sum -= old_value * old_weight;
                self.weight -= old_weight;
            }
        }
        self.entries.push_back((value, weight));
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
        self.entries.clear();
        self.sum = 0.0;
        self.weight = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn old_values_leave_the_window() {
        let mut e = WindowEstimator::new(2);
        e.add(10.0, 1.0);
        e.add(2.0, 1.0);
        e.add(4.0, 1.0);
        assert!((e.estimation() - 3.0).abs() < 1e-12);
        assert_eq!(e.total_weight(), 2.0);
    }

    #[test]
    fn zero_window_keeps_last_value() {
        let mut e = WindowEstimator::new(0);
        assert_eq!(e.window(), 1);
        e.add(1.0, 1.0);
        e.add(5.0, 1.0);
        assert_eq!(e.estimation(), 5.0);
        e.reset();
        assert!(e.estimation().is_nan());
    }
}
