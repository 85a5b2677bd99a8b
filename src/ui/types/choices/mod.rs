mod evaluator_choice;
mod learner_choice;
pub mod param_table;
mod stream_choice;
mod task_choice;

pub use evaluator_choice::{EvaluatorChoice, EvaluatorKind, WindowParameters};
pub use learner_choice::{LearnerChoice, LearnerKind};
pub use stream_choice::{ArffParameters, DriftingLinearParameters, StreamChoice, StreamKind};
pub use task_choice::{DumpFormat, PrequentialParams, TaskChoice, TaskKind};

use anyhow::{Context, Result};
use schemars::{JsonSchema, Schema};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt::Display;
use std::str::FromStr;
use strum::IntoEnumIterator;

/// Parameter block for choices that take no parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NoParams {}

/// A tagged `{ "type": <kind>, "params": {...} }` choice selectable from the
/// command line.
pub trait UIChoice: Sized + Serialize + DeserializeOwned {
    type Kind: Copy + Display + FromStr + IntoEnumIterator + Into<&'static str>;

    fn schema() -> Schema;

    fn default_params(kind: Self::Kind) -> Result<Value>;

    fn from_parts(kind: Self::Kind, params: Value) -> Result<Self> {
        let tag: &'static str = kind.into();
        serde_json::from_value(json!({ "type": tag, "params": params }))
            .with_context(|| format!("invalid parameters for '{tag}'"))
    }

    fn parameter_lines(kind: Self::Kind) -> Result<Vec<param_table::ParamLine>> {
        param_table::parameter_lines(&Self::schema(), kind.into())
    }
}
