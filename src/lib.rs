pub mod core;
pub mod error;
pub mod evaluation;
pub mod regressors;
pub mod streams;
pub mod tasks;
pub mod ui;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::FimtDdError;
pub use regressors::fimtdd::{FimtDd, FimtDdParameters, TreeSnapshot};
pub use regressors::Regressor;
