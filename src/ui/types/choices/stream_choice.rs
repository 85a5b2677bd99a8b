use crate::ui::types::choices::UIChoice;
use anyhow::Result;
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

const DEFAULT_SEED: u64 = 42;
fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_weights() -> Vec<f64> {
    vec![3.0, -2.0, 1.0]
}

fn default_noise() -> f64 {
    0.1
}

fn default_drift_magnitude() -> f64 {
    5.0
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
pub struct ArffParameters {
    #[schemars(
        with = "String",
        title = "ARFF Path",
        description = "Path to .arff file",
        extend(
            "format" = "path",
            "x-file" = true,
            "x-must-exist" = true,
            "x-extensions" = ["arff"]
        )
    )]
    pub path: PathBuf,

    #[serde(default)]
    #[schemars(
        title = "Target Index",
        description = "0-based index of the numeric target column (None = last attribute)"
    )]
    pub target_index: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DriftingLinearParameters {
    #[serde(default = "default_weights")]
    #[schemars(
        title = "Weights",
        description = "One coefficient per generated input",
        default = "default_weights"
    )]
    pub weights: Vec<f64>,

    #[serde(default)]
    #[schemars(title = "Intercept", description = "Intercept before the first shift")]
    pub intercept: f64,

    #[serde(default = "default_noise")]
    #[schemars(
        title = "Noise",
        description = "Half-width of the uniform target noise",
        range(min = 0.0),
        default = "default_noise"
    )]
    pub noise: f64,

    #[serde(default = "default_drift_magnitude")]
    #[schemars(
        title = "Drift Magnitude",
        description = "Intercept change applied at every drift point",
        default = "default_drift_magnitude"
    )]
    pub drift_magnitude: f64,

    #[serde(default)]
    #[schemars(
        title = "Drift Every",
        description = "Instances between intercept shifts (None = stationary)",
        range(min = 1)
    )]
    pub drift_every: Option<u64>,

    #[serde(default)]
    #[schemars(
        title = "Max Instances",
        description = "Upper bound on instances; empty = infinite"
    )]
    pub max_instances: Option<u64>,

    #[serde(default = "default_seed")]
    #[schemars(title = "Seed", description = "PRNG seed", default = "default_seed")]
    pub seed: u64,
}

impl Default for DriftingLinearParameters {
    fn default() -> Self {
        Self {
            weights: default_weights(),
            intercept: 0.0,
            noise: default_noise(),
            drift_magnitude: default_drift_magnitude(),
            drift_every: None,
            max_instances: None,
            seed: DEFAULT_SEED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(StreamKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum StreamChoice {
    #[strum_discriminants(strum(
        message = "Arff File Stream",
        detailed_message = "A regression stream read from an ARFF file."
    ))]
    ArffFile(ArffParameters),

    #[strum_discriminants(strum(
        message = "Drifting Linear Generator",
        detailed_message = "Linear target with uniform noise and abrupt intercept shifts."
    ))]
    DriftingLinear(DriftingLinearParameters),
}

impl UIChoice for StreamChoice {
    type Kind = StreamKind;

    fn schema() -> Schema {
        schema_for!(StreamChoice)
    }

    fn default_params(kind: Self::Kind) -> Result<Value> {
        Ok(match kind {
            StreamKind::ArffFile => serde_json::to_value(ArffParameters::default())?,
            StreamKind::DriftingLinear => {
                serde_json::to_value(DriftingLinearParameters::default())?
            }
        })
    }
}
