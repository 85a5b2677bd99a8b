mod train_spy_regressor;

pub use train_spy_regressor::{TrainSpyHandle, TrainSpyRegressor};
