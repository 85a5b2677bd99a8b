mod alternate_competition;
#[allow(clippy::module_inception)]
mod fimtdd;
pub mod nodes;
mod normalization;
mod page_hinckley;
mod parameters;
mod perceptron;
mod snapshot;
mod split_evaluator;

pub use alternate_competition::{AlternateCompetition, CompetitionOutcome, CompetitionRules};
pub use fimtdd::{FimtDd, TreeMeasurements};
pub use normalization::GlobalStatistics;
pub use page_hinckley::PageHinckley;
pub use parameters::FimtDdParameters;
pub use perceptron::Perceptron;
pub use snapshot::{SnapshotNode, TreeSnapshot};
pub use split_evaluator::{SplitDecision, compute_hoeffding_bound, evaluate_split};
