use crate::ui::types::choices::{NoParams, UIChoice};
use anyhow::Result;
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

fn default_window_size() -> usize {
    1000
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct WindowParameters {
    #[serde(default = "default_window_size")]
    #[schemars(
        title = "Window Size",
        description = "Number of most recent instances the metrics cover",
        range(min = 1),
        default = "default_window_size"
    )]
    pub window_size: usize,
}

impl Default for WindowParameters {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(EvaluatorKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum EvaluatorChoice {
    #[strum_discriminants(strum(
        message = "Basic Regression",
        detailed_message = "MAE, RMSE and mean target over the whole stream."
    ))]
    BasicRegression(NoParams),

    #[strum_discriminants(strum(
        message = "Window Regression",
        detailed_message = "MAE, RMSE and mean target over a sliding window."
    ))]
    WindowRegression(WindowParameters),
}

impl UIChoice for EvaluatorChoice {
    type Kind = EvaluatorKind;

    fn schema() -> Schema {
        schema_for!(EvaluatorChoice)
    }

    fn default_params(kind: Self::Kind) -> Result<Value> {
        Ok(match kind {
            EvaluatorKind::BasicRegression => serde_json::to_value(NoParams::default())?,
            EvaluatorKind::WindowRegression => serde_json::to_value(WindowParameters::default())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_kind_builds_from_its_defaults() {
        use strum::IntoEnumIterator;
        for kind in EvaluatorKind::iter() {
            let params = EvaluatorChoice::default_params(kind).unwrap();
            EvaluatorChoice::from_parts(kind, params).unwrap();
        }
    }

    #[test]
    fn window_size_override_and_tag() {
        let choice =
            EvaluatorChoice::from_parts(EvaluatorKind::WindowRegression, json!({"window_size": 50}))
                .unwrap();
        match &choice {
            EvaluatorChoice::WindowRegression(p) => assert_eq!(p.window_size, 50),
            other => panic!("unexpected {other:?}"),
        }
        let v = serde_json::to_value(choice).unwrap();
        assert_eq!(v["type"], "window-regression");
    }
}
