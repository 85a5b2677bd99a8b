mod dummies;
pub mod instances;
mod spies;
mod streams;
mod stubs;

pub use dummies::RegressorNanPredictions;
pub use spies::{TrainSpyHandle, TrainSpyRegressor};
pub use streams::VecStream;
pub use stubs::OracleRegressor;
