use crate::error::FimtDdError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_grace_period() -> u64 {
    200
}
fn default_split_confidence() -> f64 {
    1e-7
}
fn default_tie_threshold() -> f64 {
    0.05
}
fn default_page_hinckley_alpha() -> f64 {
    0.005
}
fn default_page_hinckley_threshold() -> u64 {
    50
}
fn default_alternate_tree_fading_factor() -> f64 {
    0.995
}
fn default_alternate_tree_t_min() -> u64 {
    150
}
fn default_alternate_tree_max_lifetime() -> u64 {
    1500
}
fn default_build_model_tree() -> bool {
    true
}
fn default_learning_ratio() -> f64 {
    0.02
}
fn default_learning_rate_decay() -> f64 {
    0.001
}
fn default_random_seed() -> u64 {
    1
}

/// Tuning knobs of the tree. Every field has a default; the camelCase
/// option names are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FimtDdParameters {
    #[serde(default = "default_grace_period", alias = "gracePeriod")]
    #[schemars(
        title = "Grace Period",
        description = "Weight a leaf must observe between split attempts",
        default = "default_grace_period"
    )]
    pub grace_period: u64,

    #[serde(default = "default_split_confidence", alias = "splitConfidence")]
    #[schemars(
        title = "Split Confidence",
        description = "Allowable error in split decision (delta)",
        range(min = 0.0, max = 1.0),
        default = "default_split_confidence"
    )]
    pub split_confidence: f64,

    #[serde(default = "default_tie_threshold", alias = "tieThreshold")]
    #[schemars(
        title = "Tie Threshold",
        description = "Hoeffding bound below which ties are broken",
        range(min = 0.0, max = 1.0),
        default = "default_tie_threshold"
    )]
    pub tie_threshold: f64,

    #[serde(default = "default_page_hinckley_alpha", alias = "PageHinckleyAlpha")]
    #[schemars(
        title = "Page-Hinckley Alpha",
        description = "Tolerated error deviation of the drift test",
        range(min = 0.0, max = 1.0),
        default = "default_page_hinckley_alpha"
    )]
    pub page_hinckley_alpha: f64,

    #[serde(
        default = "default_page_hinckley_threshold",
        alias = "PageHinckleyThreshold"
    )]
    #[schemars(
        title = "Page-Hinckley Threshold",
        description = "Cumulative deviation that signals drift",
        default = "default_page_hinckley_threshold"
    )]
    pub page_hinckley_threshold: u64,

    #[serde(
        default = "default_alternate_tree_fading_factor",
        alias = "alternateTreeFadingFactor"
    )]
    #[schemars(
        title = "Alternate Tree Fading Factor",
        description = "Fading factor of the losses compared between original and alternate",
        range(min = 0.0, max = 1.0),
        default = "default_alternate_tree_fading_factor"
    )]
    pub alternate_tree_fading_factor: f64,

    #[serde(default = "default_alternate_tree_t_min", alias = "alternateTreeTMin")]
    #[schemars(
        title = "Alternate Tree T-min",
        description = "Instances between two comparisons of an alternate tree",
        default = "default_alternate_tree_t_min"
    )]
    pub alternate_tree_t_min: u64,

    #[serde(
        default = "default_alternate_tree_max_lifetime",
        alias = "alternateTreeTime",
        alias = "alternateTreeMaxLifetime"
    )]
    #[schemars(
        title = "Alternate Tree Lifetime",
        description = "Instances after which an unpromoted alternate tree is discarded",
        default = "default_alternate_tree_max_lifetime"
    )]
    pub alternate_tree_max_lifetime: u64,

    #[serde(default = "default_build_model_tree", alias = "buildModelTree")]
    #[schemars(
        title = "Model Tree",
        description = "Leaves predict with a perceptron; false = leaf mean (regression tree)",
        default = "default_build_model_tree"
    )]
    pub build_model_tree: bool,

    #[serde(default = "default_learning_ratio", alias = "learningRatio")]
    #[schemars(
        title = "Learning Ratio",
        description = "Base learning rate of the leaf perceptrons",
        range(min = 0.0, max = 1.0),
        default = "default_learning_ratio"
    )]
    pub learning_ratio: f64,

    #[serde(
        default = "default_learning_rate_decay",
        alias = "learningRatioDecayFactor",
        alias = "learningRateDecay"
    )]
    #[schemars(
        title = "Learning Rate Decay",
        description = "Decay factor of the perceptron learning rate",
        range(min = 0.0, max = 1.0),
        default = "default_learning_rate_decay"
    )]
    pub learning_rate_decay: f64,

    #[serde(
        default,
        alias = "learningRatioConst",
        alias = "learningRateConstant"
    )]
    #[schemars(
        title = "Constant Learning Rate",
        description = "Keep the learning rate fixed instead of decaying it"
    )]
    pub learning_rate_constant: bool,

    #[serde(default = "default_random_seed", alias = "randomSeed")]
    #[schemars(
        title = "Seed",
        description = "Seed of the perceptron weight initialisation",
        default = "default_random_seed"
    )]
    pub random_seed: u64,
}

impl Default for FimtDdParameters {
    fn default() -> Self {
        Self {
            grace_period: default_grace_period(),
            split_confidence: default_split_confidence(),
            tie_threshold: default_tie_threshold(),
            page_hinckley_alpha: default_page_hinckley_alpha(),
            page_hinckley_threshold: default_page_hinckley_threshold(),
            alternate_tree_fading_factor: default_alternate_tree_fading_factor(),
            alternate_tree_t_min: default_alternate_tree_t_min(),
            alternate_tree_max_lifetime: default_alternate_tree_max_lifetime(),
            build_model_tree: default_build_model_tree(),
            learning_ratio: default_learning_ratio(),
            learning_rate_decay: default_learning_rate_decay(),
            learning_rate_constant: false,
            random_seed: default_random_seed(),
        }
    }
}

fn check_unit_interval(name: &'static str, value: f64) -> Result<(), FimtDdError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(FimtDdError::invalid_parameter(
            name,
            format!("expected a value in [0, 1], got {value}"),
        ))
    }
}

impl FimtDdParameters {
    pub fn validate(&self) -> Result<(), FimtDdError> {
        check_unit_interval("split_confidence", self.split_confidence)?;
        if self.split_confidence <= 0.0 {
            return Err(FimtDdError::invalid_parameter(
                "split_confidence",
                "must be greater than 0",
            ));
        }
        check_unit_interval("tie_threshold", self.tie_threshold)?;
        check_unit_interval("page_hinckley_alpha", self.page_hinckley_alpha)?;
        check_unit_interval(
            "alternate_tree_fading_factor",
            self.alternate_tree_fading_factor,
        )?;
        check_unit_interval("learning_ratio", self.learning_ratio)?;
        check_unit_interval("learning_rate_decay", self.learning_rate_decay)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_match_documented_values() {
        let p = FimtDdParameters::default();
        assert_eq!(p.grace_period, 200);
        assert_eq!(p.split_confidence, 1e-7);
        assert_eq!(p.tie_threshold, 0.05);
        assert_eq!(p.page_hinckley_alpha, 0.005);
        assert_eq!(p.page_hinckley_threshold, 50);
        assert_eq!(p.alternate_tree_fading_factor, 0.995);
        assert_eq!(p.alternate_tree_t_min, 150);
        assert_eq!(p.alternate_tree_max_lifetime, 1500);
        assert!(p.build_model_tree);
        assert_eq!(p.learning_ratio, 0.02);
        assert_eq!(p.learning_rate_decay, 0.001);
        assert!(!p.learning_rate_constant);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_empty_object_deserializes_to_defaults() {
        let p: FimtDdParameters = serde_json::from_value(json!({})).unwrap();
        assert_eq!(p, FimtDdParameters::default());
    }

    #[test]
    fn test_camel_case_option_names_are_accepted() {
        let p: FimtDdParameters = serde_json::from_value(json!({
            "gracePeriod": 50,
            "PageHinckleyThreshold": 10,
            "alternateTreeTime": 900,
            "buildModelTree": false,
            "learningRatioConst": true
        }))
        .unwrap();
        assert_eq!(p.grace_period, 50);
        assert_eq!(p.page_hinckley_threshold, 10);
        assert_eq!(p.alternate_tree_max_lifetime, 900);
        assert!(!p.build_model_tree);
        assert!(p.learning_rate_constant);
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let mut p = FimtDdParameters::default();
        p.tie_threshold = 1.5;
        assert!(matches!(
            p.validate(),
            Err(FimtDdError::InvalidParameter {
                name: "tie_threshold",
                ..
            })
        ));

        let mut p = FimtDdParameters::default();
        p.split_confidence = 0.0;
        assert!(p.validate().is_err());
    }
}
