use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::regressors::conditional_tests::NumericAttributeBinaryTest;
use crate::utils::memory::{MemoryMeter, MemorySized};
use std::any::Any;

/// Routes an instance to one of a fixed number of branches.
pub trait InstanceConditionalTest: Any {
    /// `None` when the outcome is unknown, e.g. the tested value is missing.
    fn branch_for_instance(&self, instance: &dyn Instance) -> Option<usize>;
    fn max_branches(&self) -> usize;
    fn describe_condition_for_branch(
        &self,
        branch: usize,
        header: Option<&InstanceHeader>,
    ) -> String;
    fn get_atts_test_depends_on(&self) -> Vec<usize>;
    fn calc_memory_size(&self) -> usize;
    fn clone_box(&self) -> Box<dyn InstanceConditionalTest>;
    fn as_any(&self) -> &dyn Any;
}

impl Clone for Box<dyn InstanceConditionalTest> {
    fn clone(&self) -> Box<dyn InstanceConditionalTest> {
        self.clone_box()
    }
}

impl MemorySized for dyn InstanceConditionalTest {
    fn inline_size(&self) -> usize {
        std::mem::size_of_val(self)
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        if let Some(num_bin) = self.as_any().downcast_ref::<NumericAttributeBinaryTest>() {
            num_bin.extra_heap_size(meter)
        } else {
            0
        }
    }
}
