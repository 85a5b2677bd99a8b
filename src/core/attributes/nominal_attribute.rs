use crate::core::attributes::Attribute;
use crate::utils::memory::{MemoryMeter, MemorySized};
use std::any::Any;
use std::collections::HashMap;

/// A categorical attribute. Its values are stored as label indices; the tree
/// never splits on it.
#[derive(Clone, Debug)]
pub struct NominalAttribute {
    pub name: String,
    pub values: Vec<String>,
    label_to_index: HashMap<String, usize>,
}

impl NominalAttribute {
    pub fn with_values(name: impl Into<String>, values: Vec<String>) -> NominalAttribute {
        let label_to_index = values
            .iter()
            .enumerate()
            .map(|(i, v)| (v.clone(), i))
            .collect();
        NominalAttribute {
            name: name.into(),
            values,
            label_to_index,
        }
    }

    pub fn index_of_value(&self, label: &str) -> Option<usize> {
        self.label_to_index.get(label).copied()
    }
}

impl Attribute for NominalAttribute {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_numeric(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn arff_representation(&self) -> String {
        format!("@attribute {} {{{}}}", self.name, self.values.join(","))
    }
}

impl MemorySized for NominalAttribute {
    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        let map_keys: usize = self.label_to_index.keys().map(|k| k.capacity()).sum();
        meter.measure_field(&self.name)
            + meter.measure_field(&self.values)
            + self.label_to_index.capacity() * size_of::<(String, usize)>()
            + map_keys
    }
}
