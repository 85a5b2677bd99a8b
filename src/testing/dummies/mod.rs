mod regressor_nan_predictions;

pub use regressor_nan_predictions::RegressorNanPredictions;
