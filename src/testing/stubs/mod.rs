mod oracle_regressor;

pub use oracle_regressor::OracleRegressor;
