use crate::core::attributes::{AttributeRef, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::DenseInstance;
use std::sync::Arc;

/// Header with numeric inputs `x0..x{n-1}` followed by the numeric target `y`.
pub fn numeric_header(n_inputs: usize) -> Arc<InstanceHeader> {
    let mut attributes: Vec<AttributeRef> = (0..n_inputs)
        .map(|i| Arc::new(NumericAttribute::new(format!("x{i}"))) as AttributeRef)
        .collect();
    attributes.push(Arc::new(NumericAttribute::new("y")));
    Arc::new(InstanceHeader::new("synthetic".into(), attributes, n_inputs))
}

/// Unit-weight instance; `inputs` must match the header's input count.
pub fn numeric_instance(header: &Arc<InstanceHeader>, inputs: &[f64], target: f64) -> DenseInstance {
    let mut values = inputs.to_vec();
    values.push(target);
    DenseInstance::new(Arc::clone(header), values, 1.0)
}
