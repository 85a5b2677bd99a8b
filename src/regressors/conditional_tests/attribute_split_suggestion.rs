use crate::regressors::conditional_tests::InstanceConditionalTest;

/// A candidate split: the test it would install, the target distributions
/// `[weight, sum, sum_of_squares]` of each resulting branch and its merit.
pub struct AttributeSplitSuggestion {
    pub split_test: Box<dyn InstanceConditionalTest>,
    pub resulting_distributions: Vec<Vec<f64>>,
    pub merit: f64,
}

impl AttributeSplitSuggestion {
    pub fn new(
        split_test: Box<dyn InstanceConditionalTest>,
        resulting_distributions: Vec<Vec<f64>>,
        merit: f64,
    ) -> Self {
        Self {
            split_test,
            resulting_distributions,
            merit,
        }
    }

    pub fn get_merit(&self) -> f64 {
        self.merit
    }

    pub fn number_of_splits(&self) -> usize {
        self.resulting_distributions.len()
    }

    pub fn resulting_distribution_from_split(&self, split_index: usize) -> Option<&[f64]> {
        self.resulting_distributions
            .get(split_index)
            .map(Vec::as_slice)
    }
}

impl Clone for AttributeSplitSuggestion {
    fn clone(&self) -> Self {
        Self {
            split_test: self.split_test.clone_box(),
            resulting_distributions: self.resulting_distributions.clone(),
            merit: self.merit,
        }
    }
}

impl std::fmt::Debug for AttributeSplitSuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeSplitSuggestion")
            .field("depends_on", &self.split_test.get_atts_test_depends_on())
            .field("resulting_distributions", &self.resulting_distributions)
            .field("merit", &self.merit)
            .finish()
    }
}
