/// Page-Hinckley test on a stream of error deviations: signals when the
/// cumulative sum climbs more than `threshold` above its running minimum.
#[derive(Clone, Debug, PartialEq)]
pub struct PageHinckley {
    sum: f64,
    min: f64,
}

impl Default for PageHinckley {
    fn default() -> Self {
        Self {
            sum: 0.0,
            min: f64::MAX,
        }
    }
}

impl PageHinckley {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn observe(&mut self, error: f64, threshold: f64) -> bool {
        self.sum += error;
        if self.sum < self.min {
            self.min = self.sum;
        }
        self.sum - self.min > threshold
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_positive_error_eventually_signals() {
        let mut ph = PageHinckley::new();
        let signalled_at = (1..=1000).find(|_| ph.observe(1.0, 50.0));
        // the first observation sets the minimum, so 51 steps are needed
        assert_eq!(signalled_at, Some(52));
    }

    #[test]
    fn test_zero_mean_noise_never_signals() {
        let mut ph = PageHinckley::new();
        for i in 0..100_000 {
            let e = if i % 2 == 0 { 0.5 } else { -0.5 };
            assert!(!ph.observe(e, 50.0));
        }
    }

    #[test]
    fn test_negative_trend_only_lowers_the_minimum() {
        let mut ph = PageHinckley::new();
        for _ in 0..1000 {
            assert!(!ph.observe(-1.0, 5.0));
        }
        assert_eq!(ph.sum(), -1000.0);
    }

    #[test]
    fn test_reset_forgets_history() {
        let mut ph = PageHinckley::new();
        for _ in 0..10 {
            ph.observe(1.0, 100.0);
        }
        ph.reset();
        assert_eq!(ph, PageHinckley::new());
    }
}
