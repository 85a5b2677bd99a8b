use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::error::FimtDdError;
use crate::evaluation::Measurement;
use crate::regressors::Regressor;
use crate::regressors::conditional_tests::{AttributeSplitSuggestion, NumericAttributeBinaryTest};
use crate::regressors::fimtdd::alternate_competition::{CompetitionOutcome, CompetitionRules};
use crate::regressors::fimtdd::nodes::{LeafNode, Node, NodeArena, NodeId, NodeKind, SplitNode};
use crate::regressors::fimtdd::normalization::GlobalStatistics;
use crate::regressors::fimtdd::parameters::FimtDdParameters;
use crate::regressors::fimtdd::perceptron::Perceptron;
use crate::regressors::fimtdd::snapshot::{SnapshotNode, TreeSnapshot};
use crate::regressors::fimtdd::split_evaluator::{SplitDecision, evaluate_split};
use crate::regressors::split_criteria::{SplitCriterion, VarianceReductionSplitCriterion};
use crate::utils::memory::{MemoryMeter, MemorySized};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write;
use std::mem::size_of;
use std::sync::Arc;
use tracing::{debug, trace};

/// Read-only counters describing the current shape of the tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TreeMeasurements {
    pub leaves: usize,
    pub split_nodes: usize,
    pub active_alternate_trees: usize,
    pub splits: u64,
    pub drifts_detected: u64,
    pub promotions: u64,
    pub demotions: u64,
    pub byte_size: usize,
}

impl TreeMeasurements {
    pub fn to_measurements(&self) -> Vec<Measurement> {
        vec![
            Measurement::new("leaves", self.leaves as f64),
            Measurement::new("split_nodes", self.split_nodes as f64),
            Measurement::new("active_alternate_trees", self.active_alternate_trees as f64),
            Measurement::new("splits", self.splits as f64),
            Measurement::new("drifts_detected", self.drifts_detected as f64),
            Measurement::new("promotions", self.promotions as f64),
            Measurement::new("demotions", self.demotions as f64),
        ]
    }
}

/// Fast incremental model tree with drift detection.
///
/// Leaves hold either the running target mean or a perceptron. Inner nodes
/// watch the normalized error with a Page-Hinckley test and, on drift, grow an
/// alternate subtree that races the original until one of them is discarded.
pub struct FimtDd {
    params: FimtDdParameters,
    header: Option<Arc<InstanceHeader>>,
    globals: GlobalStatistics,
    nodes: NodeArena,
    root: Option<NodeId>,
    max_id: u64,
    split_criterion: Box<dyn SplitCriterion>,
    rng: StdRng,
    splits: u64,
    drifts_detected: u64,
    promotions: u64,
    demotions: u64,
}

impl FimtDd {
    pub fn try_new(params: FimtDdParameters) -> Result<Self, FimtDdError> {
        params.validate()?;
        Ok(Self::with_params(params))
    }

    pub fn new() -> Self {
        Self::with_params(FimtDdParameters::default())
    }

    fn with_params(params: FimtDdParameters) -> Self {
        Self {
            rng: StdRng::seed_from_u64(params.random_seed),
            params,
            header: None,
            globals: GlobalStatistics::default(),
            nodes: NodeArena::new(),
            root: None,
            max_id: 0,
            split_criterion: Box::new(VarianceReductionSplitCriterion::new()),
            splits: 0,
            drifts_detected: 0,
            promotions: 0,
            demotions: 0,
        }
    }

    pub fn params(&self) -> &FimtDdParameters {
        &self.params
    }

    pub fn globals(&self) -> &GlobalStatistics {
        &self.globals
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn normalize_target(&self, value: f64) -> f64 {
        self.globals.normalize_target(value)
    }

    fn competition_rules(&self) -> CompetitionRules {
        CompetitionRules {
            fading_factor: self.params.alternate_tree_fading_factor,
            t_min: self.params.alternate_tree_t_min as f64,
            grace_period: self.params.grace_period as f64,
            max_lifetime: self.params.alternate_tree_max_lifetime as f64,
        }
    }

    fn new_perceptron(&self) -> Perceptron {
        Perceptron::new(
            self.params.learning_ratio,
            self.params.learning_rate_decay,
            self.params.learning_rate_constant,
        )
    }

    fn new_leaf(&mut self, parent: Option<NodeId>, model: Option<Perceptron>) -> Node {
        self.max_id += 1;
        Node::new_leaf(self.max_id, parent, LeafNode::new(model))
    }

    fn ensure_root(&mut self) -> NodeId {
        if let Some(root) = self.root {
            return root;
        }
        let model = self.params.build_model_tree.then(|| self.new_perceptron());
        let leaf = self.new_leaf(None, model);
        let root = self.nodes.insert(leaf);
        self.root = Some(root);
        root
    }

    /// Prediction of the subtree rooted at `start`. Descent stops at a split
    /// whose test cannot route the instance; that split's mean is returned.
    fn node_prediction(&self, start: NodeId, instance: &dyn Instance) -> f64 {
        let mut current = start;
        loop {
            let node = &self.nodes[current];
            match &node.kind {
                NodeKind::Leaf(leaf) => return leaf.predict(&node.stats, instance, &self.globals),
                NodeKind::Split(split) => match split.descend_one_step(instance) {
                    Some(child) => current = child,
                    None => return node.stats.mean(),
                },
            }
        }
    }

    /// Walks one instance from `start` down to a leaf, updating inner node
    /// statistics, racing alternate subtrees and feeding the drift detectors
    /// on the way.
    #[allow(clippy::too_many_arguments)]
    fn process_instance(
        &mut self,
        instance: &dyn Instance,
        target: f64,
        start: NodeId,
        prediction: f64,
        normalized_error: f64,
        mut growth_allowed: bool,
        in_alternate: bool,
    ) {
        let weight = instance.weight();
        let mut current = start;

        loop {
            if self.nodes[current].is_leaf() {
                self.learn_at_leaf(current, instance, target, growth_allowed);
                return;
            }

            let node = &mut self.nodes[current];
            node.stats.examples_seen += weight;
            node.stats.sum_of_abs_errors += weight * normalized_error;

            if !in_alternate {
                if let Some(alternate) = self.nodes[current].alternate_tree {
                    match self.run_competition(current, alternate, instance, target, prediction) {
                        CompetitionOutcome::Promote => {
                            self.promote_alternate(current, alternate, growth_allowed);
                            current = alternate;
                            continue;
                        }
                        CompetitionOutcome::Demote => self.demote_alternate(current, growth_allowed),
                        CompetitionOutcome::Undecided => {
                            growth_allowed = false;
                            self.process_instance(
                                instance,
                                target,
                                alternate,
                                prediction,
                                normalized_error,
                                true,
                                true,
                            );
                        }
                    }
                }

                if self.nodes[current].change_detection
                    && self.detect_change(current, normalized_error)
                {
                    self.initialize_alternate_tree(current);
                }
            }

            match self.nodes[current]
                .as_split()
                .and_then(|split| split.descend_one_step(instance))
            {
                Some(child) => current = child,
                None => return,
            }
        }
    }

    fn run_competition(
        &mut self,
        current: NodeId,
        alternate: NodeId,
        instance: &dyn Instance,
        target: f64,
        prediction: f64,
    ) -> CompetitionOutcome {
        let loss_original = (target - prediction).powi(2);
        let loss_alternate = (target - self.node_prediction(alternate, instance)).powi(2);
        let rules = self.competition_rules();
        let repetitions = instance.weight().round() as u64;

        let Some(split) = self.nodes[current].as_split_mut() else {
            return CompetitionOutcome::Undecided;
        };
        split.competition.record(
            loss_original,
            loss_alternate,
            repetitions,
            rules.fading_factor,
        );
        split.competition.checkpoint(&rules)
    }

    fn detect_change(&mut self, current: NodeId, normalized_error: f64) -> bool {
        let alpha = self.params.page_hinckley_alpha;
        let threshold = self.params.page_hinckley_threshold as f64;
        let node = &mut self.nodes[current];
        let error = normalized_error - node.stats.mean_abs_error() - alpha;
        node.as_split_mut()
            .is_some_and(|split| split.page_hinckley.observe(error, threshold))
    }

    fn initialize_alternate_tree(&mut self, current: NodeId) {
        if let Some(stale) = self.nodes[current].alternate_tree.take() {
            self.nodes.remove_subtree(stale);
        }

        let model = self.params.build_model_tree.then(|| self.new_perceptron());
        let mut leaf = self.new_leaf(None, model);
        leaf.original_node = Some(current);
        let alternate = self.nodes.insert(leaf);

        let node = &mut self.nodes[current];
        node.alternate_tree = Some(alternate);
        if let Some(split) = node.as_split_mut() {
            split.competition.reset();
        }
        self.disable_change_detection(current);
        self.drifts_detected += 1;

        debug!(
            node = self.nodes[current].id,
            examples_seen = self.nodes[current].stats.examples_seen,
            "drift detected, growing alternate subtree"
        );
    }

    fn promote_alternate(&mut self, current: NodeId, alternate: NodeId, growth_allowed: bool) {
        let average_qi = self.nodes[current]
            .as_split()
            .map_or(0.0, |split| split.competition.average_qi());
        let parent = self.nodes[current].parent;

        self.nodes[current].alternate_tree = None;
        self.replace_in_position(current, alternate);
        let promoted = &mut self.nodes[alternate];
        promoted.original_node = None;
        promoted.parent = parent;
        if growth_allowed || parent.is_none() {
            self.restart_change_detection(alternate);
        }

        let replaced_id = self.nodes[current].id;
        let freed = self.nodes.remove_subtree(current);
        self.promotions += 1;

        debug!(
            node = replaced_id,
            alternate = self.nodes[alternate].id,
            average_qi,
            freed,
            "alternate subtree promoted"
        );
    }

    fn demote_alternate(&mut self, current: NodeId, growth_allowed: bool) {
        let node = &mut self.nodes[current];
        let Some(alternate) = node.alternate_tree.take() else {
            return;
        };
        let average_qi = node
            .as_split()
            .map_or(0.0, |split| split.competition.average_qi());

        let freed = self.nodes.remove_subtree(alternate);
        if growth_allowed {
            self.restart_change_detection(current);
        }
        self.demotions += 1;

        debug!(
            node = self.nodes[current].id,
            average_qi, freed, "alternate subtree discarded"
        );
    }

    /// Points whatever referenced `old` (a parent's child slot, an original
    /// node's alternate pointer or the tree root) at `new`.
    fn replace_in_position(&mut self, old: NodeId, new: NodeId) {
        let node = &self.nodes[old];
        if let Some(parent) = node.parent {
            if let Some(split) = self.nodes[parent].as_split_mut() {
                if let Some(branch) = split.child_index(old) {
                    split.set_child(branch, new);
                }
            }
        } else if let Some(original) = node.original_node {
            self.nodes[original].alternate_tree = Some(new);
        } else if self.root == Some(old) {
            self.root = Some(new);
        }
    }

    fn disable_change_detection(&mut self, start: NodeId) {
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let node = &mut self.nodes[id];
            node.change_detection = false;
            stack.extend(node.children());
        }
    }

    /// Re-enables detection below `start`, skipping subtrees that are still
    /// racing an alternate.
    fn restart_change_detection(&mut self, start: NodeId) {
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let node = &mut self.nodes[id];
            if node.alternate_tree.is_some() {
                continue;
            }
            node.change_detection = true;
            if let Some(split) = node.as_split_mut() {
                split.page_hinckley.reset();
            }
            stack.extend(node.children());
        }
    }

    fn learn_at_leaf(
        &mut self,
        id: NodeId,
        instance: &dyn Instance,
        target: f64,
        growth_allowed: bool,
    ) {
        let weight = instance.weight();
        let grace_period = self.params.grace_period as f64;

        let node = &mut self.nodes[id];
        let NodeKind::Leaf(leaf) = &mut node.kind else {
            return;
        };

        node.stats.add_target(target, weight);
        let prediction = leaf.predict(&node.stats, instance, &self.globals);
        node.stats.sum_of_abs_errors +=
            weight * self.globals.normalize_target((target - prediction).abs()).abs();

        if let Some(model) = leaf.learning_model_mut() {
            model.train(instance, target, &self.globals, &mut self.rng);
        }
        leaf.observe_attributes(instance, target, weight, &self.globals);

        let examples_seen = node.stats.examples_seen;
        if growth_allowed
            && examples_seen - leaf.examples_seen_at_last_split_evaluation >= grace_period
        {
            leaf.examples_seen_at_last_split_evaluation = examples_seen;
            self.attempt_to_split(id);
        }
    }

    fn attempt_to_split(&mut self, id: NodeId) {
        let node = &self.nodes[id];
        let Some(leaf) = node.as_leaf() else {
            return;
        };
        let pre_split_dist = node.stats.distribution();
        let suggestions =
            leaf.best_split_suggestions(self.split_criterion.as_ref(), &pre_split_dist);

        match evaluate_split(
            suggestions,
            node.stats.examples_seen,
            self.params.split_confidence,
            self.params.tie_threshold,
        ) {
            SplitDecision::NoSplit => {
                trace!(node = node.id, "no split candidates");
            }
            SplitDecision::Split(suggestion) => self.split_leaf(id, suggestion),
            SplitDecision::Prune {
                merit_ratio,
                best_merit,
                hoeffding_bound,
            } => {
                trace!(
                    node = node.id,
                    merit_ratio, best_merit, hoeffding_bound, "split deferred"
                );
                if let NodeKind::Leaf(leaf) = &mut self.nodes[id].kind {
                    leaf.remove_bad_splits(
                        self.split_criterion.as_ref(),
                        &pre_split_dist,
                        merit_ratio,
                        best_merit,
                        hoeffding_bound,
                    );
                }
            }
        }
    }

    /// Turns the leaf into a split node in place, so every reference to it
    /// (root, parent slot or alternate pointer) stays valid.
    fn split_leaf(&mut self, id: NodeId, suggestion: AttributeSplitSuggestion) {
        let node = &self.nodes[id];
        let change_detection = node.change_detection;
        let seed = node
            .as_leaf()
            .and_then(LeafNode::learning_model)
            .map(Perceptron::warm_copy);

        let mut children = Vec::with_capacity(suggestion.number_of_splits());
        for _ in 0..suggestion.number_of_splits() {
            let model = if self.params.build_model_tree {
                Some(seed.clone().unwrap_or_else(|| self.new_perceptron()))
            } else {
                None
            };
            let mut child = self.new_leaf(Some(id), model);
            child.change_detection = change_detection;
            children.push(Some(self.nodes.insert(child)));
        }

        let node = &mut self.nodes[id];
        node.kind = NodeKind::Split(SplitNode::new(suggestion.split_test, children));
        self.splits += 1;

        debug!(
            node = node.id,
            examples_seen = node.stats.examples_seen,
            merit = suggestion.merit,
            "leaf split"
        );
    }

    fn input_labels(&self) -> Vec<Option<String>> {
        (0..self.globals.number_of_inputs())
            .map(|j| {
                let i = self.globals.input_to_attribute_index(j);
                self.globals.is_numeric_input(i).then(|| {
                    self.header
                        .as_ref()
                        .and_then(|h| h.attribute_at_index(i))
                        .map_or_else(|| format!("att{i}"), |a| a.name().to_string())
                })
            })
            .collect()
    }

    /// Indented text rendering of the primary tree.
    pub fn describe_model(&self) -> String {
        enum Item {
            Node(NodeId, usize),
            Condition(String, usize),
        }

        let mut out = String::new();
        let Some(root) = self.root else {
            return out;
        };
        let header = self.header.as_deref();
        let target = header
            .and_then(InstanceHeader::target_attribute)
            .map_or_else(|| "target".to_string(), |a| a.name().to_string());
        let labels = self.input_labels();

        let mut stack = vec![Item::Node(root, 0)];
        while let Some(item) = stack.pop() {
            let (id, indent) = match item {
                Item::Condition(text, indent) => {
                    let _ = writeln!(out, "{:indent$}if {text}:", "");
                    continue;
                }
                Item::Node(id, indent) => (id, indent),
            };
            let node = &self.nodes[id];
            match &node.kind {
                NodeKind::Leaf(leaf) => {
                    let body = match leaf.learning_model() {
                        Some(model) => model.describe(&labels),
                        None => format!("{:.4}", node.stats.mean()),
                    };
                    let _ = writeln!(out, "{:indent$}Leaf {target} = {body}", "");
                }
                NodeKind::Split(split) => {
                    for (branch, child) in split.children().iter().enumerate().rev() {
                        if let Some(child) = child {
                            stack.push(Item::Node(*child, indent + 2));
                            stack.push(Item::Condition(
                                split
                                    .split_test()
                                    .describe_condition_for_branch(branch, header),
                                indent,
                            ));
                        }
                    }
                }
            }
        }
        out
    }

    pub fn measurements(&self) -> TreeMeasurements {
        let mut m = TreeMeasurements {
            splits: self.splits,
            drifts_detected: self.drifts_detected,
            promotions: self.promotions,
            demotions: self.demotions,
            byte_size: self.calc_memory_size(),
            ..TreeMeasurements::default()
        };

        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if node.is_leaf() {
                m.leaves += 1;
            } else {
                m.split_nodes += 1;
            }
            if node.alternate_tree.is_some() {
                m.active_alternate_trees += 1;
            }
            stack.extend(node.children());
        }
        m
    }

    /// Freezes the primary tree. Alternate subtrees are left out.
    pub fn snapshot(&self) -> Result<TreeSnapshot, FimtDdError> {
        let mut order = Vec::new();
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id].children());
        }
        let position: HashMap<NodeId, usize> =
            order.iter().enumerate().map(|(pos, id)| (*id, pos)).collect();

        let mut nodes = Vec::with_capacity(order.len());
        for id in &order {
            let node = &self.nodes[*id];
            let mean = node.stats.mean();
            let frozen = match &node.kind {
                NodeKind::Leaf(leaf) => SnapshotNode::Leaf {
                    mean,
                    weights: leaf
                        .learning_model()
                        .map_or_else(Vec::new, |model| model.weights().to_vec()),
                },
                NodeKind::Split(split) => {
                    let test = split
                        .split_test()
                        .as_any()
                        .downcast_ref::<NumericAttributeBinaryTest>()
                        .cloned()
                        .ok_or_else(|| {
                            FimtDdError::Snapshot(format!(
                                "node {} uses a split test with no serializable form",
                                node.id
                            ))
                        })?;
                    SnapshotNode::Split {
                        test,
                        children: split
                            .children()
                            .iter()
                            .map(|child| child.and_then(|c| position.get(&c).copied()))
                            .collect(),
                        mean,
                    }
                }
            };
            nodes.push(frozen);
        }

        Ok(TreeSnapshot {
            globals: self.globals.clone(),
            build_model_tree: self.params.build_model_tree,
            root: self.root.map(|_| 0),
            nodes,
        })
    }
}

impl Default for FimtDd {
    fn default() -> Self {
        Self::new()
    }
}

impl Regressor for FimtDd {
    fn predict(&self, instance: &dyn Instance) -> f64 {
        self.root
            .map_or(0.0, |root| self.node_prediction(root, instance))
    }

    fn set_model_context(&mut self, header: Arc<InstanceHeader>) {
        if !self.globals.is_initialized() {
            self.globals = GlobalStatistics::for_header(&header);
        }
        self.header = Some(header);
    }

    fn train_on_instance(&mut self, instance: &dyn Instance) {
        let Some(target) = instance.target_value() else {
            return;
        };
        let weight = instance.weight();
        if weight.is_nan() || weight <= 0.0 {
            return;
        }
        if !self.globals.is_initialized() {
            self.globals = GlobalStatistics::for_header(instance.header());
        }

        let root = self.ensure_root();
        self.globals.update(instance, target, weight);
        let prediction = self.node_prediction(root, instance);
        let normalized_error = self.globals.normalized_error(target, prediction);
        self.process_instance(
            instance,
            target,
            root,
            prediction,
            normalized_error,
            true,
            false,
        );
    }

    fn calc_memory_size(&self) -> usize {
        MemoryMeter::measure_root(self)
    }

    fn model_measurements(&self) -> Vec<Measurement> {
        self.measurements().to_measurements()
    }
}

impl MemorySized for FimtDd {
    fn inline_size(&self) -> usize {
        size_of::<Self>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        let mut total = 0;
        total += meter.measure_field(&self.header);
        total += meter.measure_field(&self.globals);
        total += meter.measure_field(&self.nodes);
        total += meter.measure_field(&self.split_criterion);
        total
    }
}
