use crate::core::attributes::{Attribute, AttributeRef};
use crate::utils::memory::{MemoryMeter, MemorySized};
use std::fmt;

/// Schema of a stream: the ordered attributes and which of them is the
/// numeric target.
pub struct InstanceHeader {
    relation_name: String,
    pub attributes: Vec<AttributeRef>,
    target_index: usize,
}

impl InstanceHeader {
    pub fn new(
        relation_name: String,
        attributes: Vec<AttributeRef>,
        target_index: usize,
    ) -> InstanceHeader {
        InstanceHeader {
            relation_name,
            attributes,
            target_index,
        }
    }

    pub fn number_of_attributes(&self) -> usize {
        self.attributes.len()
    }

    /// Number of input attributes, i.e. all attributes but the target.
    pub fn number_of_input_attributes(&self) -> usize {
        self.attributes.len().saturating_sub(1)
    }

    pub fn relation_name(&self) -> &str {
        &self.relation_name
    }

    pub fn attribute_at_index(&self, index: usize) -> Option<&dyn Attribute> {
        self.attributes.get(index).map(|a| a.as_ref() as &dyn Attribute)
    }

    pub fn index_of_attribute(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|attr| attr.name() == name)
    }

    pub fn target_index(&self) -> usize {
        self.target_index
    }

    pub fn target_attribute(&self) -> Option<&dyn Attribute> {
        self.attribute_at_index(self.target_index)
    }

    pub fn is_numeric(&self, index: usize) -> bool {
        self.attributes
            .get(index)
            .is_some_and(|attr| attr.is_numeric())
    }

    /// Maps the position of an input attribute (target skipped) to its index
    /// in the full attribute list.
    pub fn input_to_attribute_index(&self, input_index: usize) -> usize {
        if input_index < self.target_index {
            input_index
        } else {
            input_index + 1
        }
    }

    pub fn calc_memory_size(&self) -> usize {
        MemoryMeter::measure_root(self)
    }
}

impl MemorySized for InstanceHeader {
    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        meter.measure_field(&self.relation_name) + meter.measure_field(&self.attributes)
    }
}

impl fmt::Debug for InstanceHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceHeader")
            .field("relation_name", &self.relation_name)
            .field("target_index", &self.target_index)
            .field("n_attributes", &self.attributes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attributes::{NominalAttribute, NumericAttribute};
    use std::sync::Arc;

    fn header() -> InstanceHeader {
        let attrs: Vec<AttributeRef> = vec![
            Arc::new(NumericAttribute::new("x0")),
            Arc::new(NumericAttribute::new("y")),
            Arc::new(NominalAttribute::with_values("c", vec!["a".into(), "b".into()])),
        ];
        InstanceHeader::new("rel".into(), attrs, 1)
    }

    #[test]
    fn test_input_indices_skip_the_target() {
        let h = header();
        assert_eq!(h.number_of_input_attributes(), 2);
        assert_eq!(h.input_to_attribute_index(0), 0);
        assert_eq!(h.input_to_attribute_index(1), 2);
    }

    #[test]
    fn test_numeric_tags_and_lookup() {
        let h = header();
        assert!(h.is_numeric(0));
        assert!(!h.is_numeric(2));
        assert!(!h.is_numeric(9));
        assert_eq!(h.index_of_attribute("c"), Some(2));
        assert_eq!(h.target_attribute().map(|a| a.name().to_string()), Some("y".into()));
    }
}
