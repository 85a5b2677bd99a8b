use crate::core::instance_header::InstanceHeader;
use std::io::Error;

/// A weighted, labeled example. Attribute values are stored as `f64`
/// (nominal values by label index, missing values as NaN).
pub trait Instance {
    fn weight(&self) -> f64;
    fn set_weight(&mut self, new_value: f64) -> Result<(), Error>;
    fn value_at_index(&self, index: usize) -> Option<f64>;
    fn set_value_at_index(&mut self, index: usize, new_value: f64) -> Result<(), Error>;
    fn is_missing_at_index(&self, index: usize) -> Result<bool, Error>;
    fn number_of_attributes(&self) -> usize;
    fn target_index(&self) -> usize;
    fn target_value(&self) -> Option<f64>;
    fn set_target_value(&mut self, new_value: f64) -> Result<(), Error>;
    fn is_target_missing(&self) -> bool;
    fn to_vec(&self) -> Vec<f64>;
    fn header(&self) -> &InstanceHeader;
}
