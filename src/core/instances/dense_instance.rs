use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use std::io::{Error, ErrorKind};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct DenseInstance {
    header: Arc<InstanceHeader>,
    values: Vec<f64>,
    weight: f64,
}

impl DenseInstance {
    pub fn new(header: Arc<InstanceHeader>, values: Vec<f64>, weight: f64) -> Self {
        Self {
            header,
            values,
            weight,
        }
    }

    fn check_index(&self, index: usize) -> Result<(), Error> {
        if index < self.values.len() {
            Ok(())
        } else {
            Err(Error::new(
                ErrorKind::InvalidInput,
                format!(
                    "attribute index {index} out of range for {} values",
                    self.values.len()
                ),
            ))
        }
    }
}

impl Instance for DenseInstance {
    fn weight(&self) -> f64 {
        self.weight
    }

    fn set_weight(&mut self, new_value: f64) -> Result<(), Error> {
        if !new_value.is_finite() || new_value < 0.0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("instance weight must be finite and non-negative, got {new_value}"),
            ));
        }
        self.weight = new_value;
        Ok(())
    }

    fn value_at_index(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    fn set_value_at_index(&mut self, index: usize, new_value: f64) -> Result<(), Error> {
        self.check_index(index)?;
        self.values[index] = new_value;
        Ok(())
    }

    fn is_missing_at_index(&self, index: usize) -> Result<bool, Error> {
        self.check_index(index)?;
        Ok(self.values[index].is_nan())
    }

    fn number_of_attributes(&self) -> usize {
        self.values.len()
    }

    fn target_index(&self) -> usize {
        self.header.target_index()
    }

    fn target_value(&self) -> Option<f64> {
        self.values
            .get(self.target_index())
            .copied()
            .filter(|v| !v.is_nan())
    }

    fn set_target_value(&mut self, new_value: f64) -> Result<(), Error> {
        let index = self.target_index();
        self.set_value_at_index(index, new_value)
    }

    fn is_target_missing(&self) -> bool {
        self.target_value().is_none()
    }

    fn to_vec(&self) -> Vec<f64> {
        self.values.clone()
    }

    fn header(&self) -> &InstanceHeader {
        &self.header
    }
}
