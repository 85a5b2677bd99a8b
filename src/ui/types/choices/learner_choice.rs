use crate::regressors::fimtdd::FimtDdParameters;
use crate::ui::types::choices::UIChoice;
use anyhow::Result;
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(LearnerKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum LearnerChoice {
    #[strum_discriminants(strum(
        message = "FIMT-DD",
        detailed_message = "Incremental regression or model tree with drift adaptation."
    ))]
    Fimtdd(FimtDdParameters),
}

impl UIChoice for LearnerChoice {
    type Kind = LearnerKind;

    fn schema() -> Schema {
        schema_for!(LearnerChoice)
    }

    fn default_params(kind: Self::Kind) -> Result<Value> {
        Ok(match kind {
            LearnerKind::Fimtdd => serde_json::to_value(FimtDdParameters::default())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strum::EnumMessage;

    #[test]
    fn camel_case_aliases_are_accepted() {
        let choice = LearnerChoice::from_parts(
            LearnerKind::Fimtdd,
            json!({ "gracePeriod": 50, "buildModelTree": false }),
        )
        .unwrap();
        let LearnerChoice::Fimtdd(params) = choice;
        assert_eq!(params.grace_period, 50);
        assert!(!params.build_model_tree);
        assert_eq!(params.tie_threshold, FimtDdParameters::default().tie_threshold);
    }

    #[test]
    fn defaults_round_trip_through_from_parts() {
        let params = LearnerChoice::default_params(LearnerKind::Fimtdd).unwrap();
        let LearnerChoice::Fimtdd(p) = LearnerChoice::from_parts(LearnerKind::Fimtdd, params).unwrap();
        assert_eq!(p, FimtDdParameters::default());
    }

    #[test]
    fn kind_parses_and_has_message() {
        assert_eq!("fimtdd".parse::<LearnerKind>().unwrap(), LearnerKind::Fimtdd);
        assert_eq!(LearnerKind::Fimtdd.get_message(), Some("FIMT-DD"));
        let v = serde_json::to_value(LearnerChoice::Fimtdd(FimtDdParameters::default())).unwrap();
        assert_eq!(v["type"], "fimtdd");
    }
}
