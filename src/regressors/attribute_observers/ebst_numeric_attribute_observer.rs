use crate::regressors::attribute_observers::AttributeTargetObserver;
use crate::regressors::conditional_tests::{AttributeSplitSuggestion, NumericAttributeBinaryTest};
use crate::regressors::split_criteria::SplitCriterion;
use crate::utils::memory::{MemoryMeter, MemorySized};
use std::any::Any;
use std::mem::size_of;

type Stats = [f64; 3];

#[inline]
fn add(a: Stats, b: Stats) -> Stats {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
fn sub(a: Stats, b: Stats) -> Stats {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Child slot of an E-BST node. A pruned slot stays sealed: values that would
/// land under it stop at the parent, whose statistics already hold them, so
/// every remaining cut point keeps exact left and right statistics.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Link {
    Open,
    Node(usize),
    Sealed,
}

impl Link {
    fn node(self) -> Option<usize> {
        match self {
            Link::Node(idx) => Some(idx),
            Link::Open | Link::Sealed => None,
        }
    }
}

#[derive(Clone, Debug)]
struct EbstNode {
    cut_point: f64,
    /// Target statistics of values `<= cut_point` that passed through here.
    less_than: Stats,
    /// Target statistics of values `> cut_point` that passed through here.
    greater_than: Stats,
    left: Link,
    right: Link,
}

impl EbstNode {
    fn new(cut_point: f64, stats: Stats) -> Self {
        Self {
            cut_point,
            less_than: stats,
            greater_than: [0.0; 3],
            left: Link::Open,
            right: Link::Open,
        }
    }

    fn is_childless(&self) -> bool {
        self.left.node().is_none() && self.right.node().is_none()
    }
}

impl MemorySized for EbstNode {}

/// Extended binary search tree over the observed values of one numeric
/// attribute. Nodes live in a vector and link by index; every walk is a loop
/// because sorted input degenerates the tree into a long chain.
#[derive(Clone, Debug, Default)]
pub struct EbstNumericAttributeObserver {
    nodes: Vec<EbstNode>,
    free: Vec<usize>,
    root: Option<usize>,
}

impl EbstNumericAttributeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of candidate cut points currently stored.
    pub fn num_split_points(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    fn alloc(&mut self, node: EbstNode) -> usize {
        if let Some(idx) = self.free.pop() {
            self.nodes[idx] = node;
            idx
        } else {
            self.nodes.push(node);
            self.nodes.len() - 1
        }
    }

    fn total(&self, root: usize) -> Stats {
        let node = &self.nodes[root];
        add(node.less_than, node.greater_than)
    }

    /// Visits every stored node in pre-order, yielding its index, its parent
    /// link and the statistics of all observed values `<= cut_point`.
    fn preorder_with_left_stats(
        &self,
        root: usize,
    ) -> Vec<(usize, Option<(usize, bool)>, Stats)> {
        let mut out = Vec::with_capacity(self.num_split_points());
        let mut stack = vec![(root, None, [0.0; 3])];

        while let Some((idx, parent, offset)) = stack.pop() {
            let node = &self.nodes[idx];
            let left_stats = add(offset, node.less_than);
            out.push((idx, parent, left_stats));

            if let Some(r) = node.right.node() {
                stack.push((r, Some((idx, false)), left_stats));
            }
            if let Some(l) = node.left.node() {
                stack.push((l, Some((idx, true)), offset));
            }
        }
        out
    }
}

impl AttributeTargetObserver for EbstNumericAttributeObserver {
    fn observe_attribute_target(&mut self, att_val: f64, target: f64, weight: f64) {
        if att_val.is_nan() || !target.is_finite() || !weight.is_finite() || weight <= 0.0 {
            return;
        }
        let stats = [weight, weight * target, weight * target * target];

        let Some(mut current) = self.root else {
            let idx = self.alloc(EbstNode::new(att_val, stats));
            self.root = Some(idx);
            return;
        };

        loop {
            let node = &mut self.nodes[current];
            if att_val == node.cut_point {
                node.less_than = add(node.less_than, stats);
                return;
            }
            if att_val < node.cut_point {
                node.less_than = add(node.less_than, stats);
                let left = node.left;
                match left {
                    Link::Node(next) => current = next,
                    Link::Sealed => return,
                    Link::Open => {
                        let idx = self.alloc(EbstNode::new(att_val, stats));
                        self.nodes[current].left = Link::Node(idx);
                        return;
                    }
                }
            } else {
                node.greater_than = add(node.greater_than, stats);
                let right = node.right;
                match right {
                    Link::Node(next) => current = next,
                    Link::Sealed => return,
                    Link::Open => {
                        let idx = self.alloc(EbstNode::new(att_val, stats));
                        self.nodes[current].right = Link::Node(idx);
                        return;
                    }
                }
            }
        }
    }

    fn get_best_evaluated_split_suggestion(
        &self,
        criterion: &dyn SplitCriterion,
        pre_split_dist: &[f64],
        att_index: usize,
    ) -> Option<AttributeSplitSuggestion> {
        let root = self.root?;
        let total = self.total(root);
        let mut best: Option<AttributeSplitSuggestion> = None;

        for (idx, _, left_stats) in self.preorder_with_left_stats(root) {
            let post_dists = vec![left_stats.to_vec(), sub(total, left_stats).to_vec()];
            let merit = criterion.get_merit_of_split(pre_split_dist, &post_dists);
            if !merit.is_finite() {
                continue;
            }
            if best.as_ref().is_none_or(|b| merit > b.get_merit()) {
                best = Some(AttributeSplitSuggestion::new(
                    Box::new(NumericAttributeBinaryTest::new(
                        att_index,
                        self.nodes[idx].cut_point,
                        true,
                    )),
                    post_dists,
                    merit,
                ));
            }
        }
        best
    }

    fn remove_bad_splits(
        &mut self,
        criterion: &dyn SplitCriterion,
        pre_split_dist: &[f64],
        last_check_ratio: f64,
        last_check_merit: f64,
        last_check_bound: f64,
    ) {
        let Some(root) = self.root else {
            return;
        };
        if !(last_check_merit > 0.0) {
            return;
        }
        let total = self.total(root);
        let cutoff = last_check_ratio - 2.0 * last_check_bound;

        // Reverse pre-order sees children before their parent, so a parent
        // whose children were all dropped becomes a candidate in the same pass.
        let order = self.preorder_with_left_stats(root);
        for (idx, parent, left_stats) in order.into_iter().rev() {
            let Some((parent_idx, is_left)) = parent else {
                continue;
            };
            if !self.nodes[idx].is_childless() {
                continue;
            }
            let post_dists = vec![left_stats.to_vec(), sub(total, left_stats).to_vec()];
            let merit = criterion.get_merit_of_split(pre_split_dist, &post_dists);
            if merit / last_check_merit < cutoff {
                let parent_node = &mut self.nodes[parent_idx];
                if is_left {
                    parent_node.left = Link::Sealed;
                } else {
                    parent_node.right = Link::Sealed;
                }
                self.free.push(idx);
            }
        }
    }

    fn calc_memory_size(&self) -> usize {
        MemoryMeter::measure_root(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl MemorySized for EbstNumericAttributeObserver {
    fn inline_size(&self) -> usize {
        size_of::<Self>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        meter.measure_field(&self.nodes) + meter.measure_field(&self.free)
    }
}
