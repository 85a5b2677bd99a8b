use crate::core::instances::Instance;
use crate::regressors::conditional_tests::InstanceConditionalTest;
use crate::regressors::fimtdd::alternate_competition::AlternateCompetition;
use crate::regressors::fimtdd::nodes::NodeId;
use crate::regressors::fimtdd::page_hinckley::PageHinckley;
use crate::utils::memory::{MemoryMeter, MemorySized};

pub struct SplitNode {
    split_test: Box<dyn InstanceConditionalTest>,
    children: Vec<Option<NodeId>>,
    pub page_hinckley: PageHinckley,
    pub competition: AlternateCompetition,
}

impl SplitNode {
    pub fn new(split_test: Box<dyn InstanceConditionalTest>, children: Vec<Option<NodeId>>) -> Self {
        Self {
            split_test,
            children,
            page_hinckley: PageHinckley::new(),
            competition: AlternateCompetition::default(),
        }
    }

    pub fn split_test(&self) -> &dyn InstanceConditionalTest {
        self.split_test.as_ref()
    }

    pub fn set_child(&mut self, index: usize, child: NodeId) {
        if index >= self.children.len() {
            self.children.resize_with(index + 1, || None);
        }
        self.children[index] = Some(child);
    }

    pub fn get_child(&self, index: usize) -> Option<NodeId> {
        self.children.get(index).copied().flatten()
    }

    pub fn child_index(&self, child: NodeId) -> Option<usize> {
        self.children.iter().position(|c| *c == Some(child))
    }

    pub fn children(&self) -> &[Option<NodeId>] {
        &self.children
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    pub fn instance_child_index(&self, instance: &dyn Instance) -> Option<usize> {
        self.split_test.branch_for_instance(instance)
    }

    /// Child the instance is routed to, `None` when the branch is unknown.
    pub fn descend_one_step(&self, instance: &dyn Instance) -> Option<NodeId> {
        self.instance_child_index(instance)
            .and_then(|branch| self.get_child(branch))
    }
}

impl MemorySized for SplitNode {
    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        meter.measure_field(&self.split_test) + meter.measure_field(&self.children)
    }
}

impl MemorySized for NodeId {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regressors::conditional_tests::NumericAttributeBinaryTest;
    use crate::regressors::fimtdd::nodes::{LeafNode, Node, NodeArena};
    use crate::testing::instances::{numeric_header, numeric_instance};

    #[test]
    fn test_descend_one_step_follows_split_test() {
        let mut arena = NodeArena::new();
        let left = arena.insert(Node::new_leaf(2, None, LeafNode::new(None)));
        let right = arena.insert(Node::new_leaf(3, None, LeafNode::new(None)));
        let split = SplitNode::new(
            Box::new(NumericAttributeBinaryTest::new(0, 1.0, true)),
            vec![Some(left), Some(right)],
        );

        let header = numeric_header(1);
        assert_eq!(
            split.descend_one_step(&numeric_instance(&header, &[0.5], 0.0)),
            Some(left)
        );
        assert_eq!(
            split.descend_one_step(&numeric_instance(&header, &[1.5], 0.0)),
            Some(right)
        );
        assert_eq!(
            split.descend_one_step(&numeric_instance(&header, &[f64::NAN], 0.0)),
            None
        );
    }

    #[test]
    fn test_set_child_grows_and_child_index_finds_it() {
        let mut arena = NodeArena::new();
        let a = arena.insert(Node::new_leaf(1, None, LeafNode::new(None)));
        let b = arena.insert(Node::new_leaf(2, None, LeafNode::new(None)));
        let mut split = SplitNode::new(
            Box::new(NumericAttributeBinaryTest::new(0, 1.0, true)),
            vec![],
        );
        split.set_child(1, b);
        assert_eq!(split.num_children(), 2);
        assert_eq!(split.get_child(0), None);
        split.set_child(0, a);
        assert_eq!(split.child_index(b), Some(1));
        assert_eq!(split.child_index(a), Some(0));
    }
}
