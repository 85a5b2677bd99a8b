mod attribute_target_observer;
mod ebst_numeric_attribute_observer;

pub use attribute_target_observer::AttributeTargetObserver;
pub use ebst_numeric_attribute_observer::EbstNumericAttributeObserver;
