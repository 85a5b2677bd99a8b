pub mod attribute_observers;
pub mod conditional_tests;
pub mod fimtdd;
mod regressor;
pub mod split_criteria;

pub use regressor::Regressor;
