use crate::regressors::fimtdd::nodes::{LeafNode, SplitNode};
use crate::utils::memory::{MemoryMeter, MemorySized};
use std::ops::{Index, IndexMut};

/// Handle of a node inside a [`NodeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeStatistics {
    pub examples_seen: f64,
    pub sum_of_values: f64,
    pub sum_of_squares: f64,
    pub sum_of_abs_errors: f64,
}

impl NodeStatistics {
    pub fn add_target(&mut self, target: f64, weight: f64) {
        self.examples_seen += weight;
        self.sum_of_values += weight * target;
        self.sum_of_squares += weight * target * target;
    }

    pub fn mean(&self) -> f64 {
        if self.examples_seen > 0.0 {
            self.sum_of_values / self.examples_seen
        } else {
            0.0
        }
    }

    pub fn mean_abs_error(&self) -> f64 {
        if self.examples_seen > 0.0 {
            self.sum_of_abs_errors / self.examples_seen
        } else {
            0.0
        }
    }

    /// `[weight, sum, sum_of_squares]`, the layout split criteria expect.
    pub fn distribution(&self) -> Vec<f64> {
        vec![self.examples_seen, self.sum_of_values, self.sum_of_squares]
    }
}

pub enum NodeKind {
    Leaf(LeafNode),
    Split(SplitNode),
}

/// Fields shared by leaves and split nodes.
///
/// `children` (inside [`SplitNode`]) and `alternate_tree` own the nodes they
/// point at; `parent` and `original_node` are back-references.
pub struct Node {
    pub id: u64,
    pub parent: Option<NodeId>,
    pub change_detection: bool,
    pub alternate_tree: Option<NodeId>,
    /// Set only on the root of an alternate subtree: the node racing it.
    pub original_node: Option<NodeId>,
    pub stats: NodeStatistics,
    pub kind: NodeKind,
}

impl Node {
    pub fn new_leaf(id: u64, parent: Option<NodeId>, leaf: LeafNode) -> Self {
        Self {
            id,
            parent,
            change_detection: true,
            alternate_tree: None,
            original_node: None,
            stats: NodeStatistics::default(),
            kind: NodeKind::Leaf(leaf),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub fn as_leaf(&self) -> Option<&LeafNode> {
        match &self.kind {
            NodeKind::Leaf(leaf) => Some(leaf),
            NodeKind::Split(_) => None,
        }
    }

    pub fn as_split(&self) -> Option<&SplitNode> {
        match &self.kind {
            NodeKind::Split(split) => Some(split),
            NodeKind::Leaf(_) => None,
        }
    }

    pub fn as_split_mut(&mut self) -> Option<&mut SplitNode> {
        match &mut self.kind {
            NodeKind::Split(split) => Some(split),
            NodeKind::Leaf(_) => None,
        }
    }

    /// Owned children, alternate subtree excluded.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.as_split()
            .into_iter()
            .flat_map(|split| split.children().iter().flatten().copied())
    }
}

impl MemorySized for Node {
    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        match &self.kind {
            NodeKind::Leaf(leaf) => leaf.extra_heap_size(meter),
            NodeKind::Split(split) => split.extra_heap_size(meter),
        }
    }
}

/// Slot storage for tree nodes. Freed slots are recycled.
#[derive(Default)]
pub struct NodeArena {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            self.slots[index] = Some(node);
            NodeId(index)
        } else {
            self.slots.push(Some(node));
            NodeId(self.slots.len() - 1)
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Frees `root` and everything it owns, alternate subtrees included.
    pub fn remove_subtree(&mut self, root: NodeId) -> usize {
        let mut removed = 0;
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.slots.get_mut(id.0).and_then(Option::take) else {
                continue;
            };
            stack.extend(node.children());
            stack.extend(node.alternate_tree);
            self.free.push(id.0);
            removed += 1;
        }
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|node| (NodeId(i), node)))
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        self.slots[id.0]
            .as_ref()
            .unwrap_or_else(|| panic!("node {} was freed", id.0))
    }
}

impl IndexMut<NodeId> for NodeArena {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        self.slots[id.0]
            .as_mut()
            .unwrap_or_else(|| panic!("node {} was freed", id.0))
    }
}

impl MemorySized for NodeArena {
    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        meter.measure_field(&self.slots) + meter.measure_field(&self.free)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regressors::conditional_tests::NumericAttributeBinaryTest;

    fn leaf(id: u64, parent: Option<NodeId>) -> Node {
        Node::new_leaf(id, parent, LeafNode::new(None))
    }

    #[test]
    fn test_insert_reuses_freed_slots() {
        let mut arena = NodeArena::new();
        let a = arena.insert(leaf(1, None));
        let b = arena.insert(leaf(2, None));
        assert_eq!(arena.len(), 2);

        arena.remove_subtree(a);
        assert!(!arena.contains(a));
        assert_eq!(arena.len(), 1);

        let c = arena.insert(leaf(3, None));
        assert_eq!(c, a);
        assert_eq!(arena[c].id, 3);
        assert_eq!(arena[b].id, 2);
    }

    #[test]
    fn test_remove_subtree_frees_children_and_alternates() {
        let mut arena = NodeArena::new();
        let root = arena.insert(leaf(1, None));
        let left = arena.insert(leaf(2, Some(root)));
        let right = arena.insert(leaf(3, Some(root)));
        let alternate = arena.insert(leaf(4, None));
        let keep = arena.insert(leaf(5, None));

        arena[root].kind = NodeKind::Split(SplitNode::new(
            Box::new(NumericAttributeBinaryTest::new(0, 0.0, true)),
            vec![Some(left), Some(right)],
        ));
        arena[root].alternate_tree = Some(alternate);
        arena[alternate].original_node = Some(root);

        assert_eq!(arena.remove_subtree(root), 4);
        assert_eq!(arena.len(), 1);
        assert!(arena.contains(keep));
    }

    #[test]
    fn test_statistics_helpers() {
        let mut stats = NodeStatistics::default();
        assert_eq!(stats.mean(), 0.0);
        stats.add_target(2.0, 1.0);
        stats.add_target(4.0, 3.0);
        assert_eq!(stats.mean(), 3.5);
        assert_eq!(stats.distribution(), vec![4.0, 14.0, 52.0]);
    }
}
