use crate::core::instances::Instance;
use crate::regressors::conditional_tests::NumericAttributeBinaryTest;
use crate::regressors::fimtdd::normalization::GlobalStatistics;
use crate::regressors::fimtdd::perceptron::predict_with_weights;
use serde::{Deserialize, Serialize};

/// Frozen, serializable description of a trained tree.
///
/// Holds everything needed to reproduce the live tree's predictions: the split
/// tests, each leaf's mean or perceptron weights and the normalization
/// statistics the weights were learned against. It cannot resume training.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub globals: GlobalStatistics,
    pub build_model_tree: bool,
    pub root: Option<usize>,
    pub nodes: Vec<SnapshotNode>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SnapshotNode {
    Leaf {
        mean: f64,
        weights: Vec<f64>,
    },
    Split {
        test: NumericAttributeBinaryTest,
        children: Vec<Option<usize>>,
        mean: f64,
    },
}

impl TreeSnapshot {
    pub fn predict(&self, instance: &dyn Instance) -> f64 {
        let mut current = self.root;
        while let Some(node) = current.and_then(|idx| self.nodes.get(idx)) {
            match node {
                SnapshotNode::Leaf { mean, weights } => {
                    return if self.build_model_tree {
                        predict_with_weights(weights, instance, &self.globals)
                    } else {
                        *mean
                    };
                }
                SnapshotNode::Split {
                    test,
                    children,
                    mean,
                } => {
                    let next = instance
                        .value_at_index(test.attribute_index())
                        .and_then(|value| test.branch_for_value(value))
                        .and_then(|branch| children.get(branch).copied().flatten());
                    match next {
                        Some(child) => current = Some(child),
                        None => return *mean,
                    }
                }
            }
        }
        0.0
    }

    pub fn num_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, SnapshotNode::Leaf { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::instances::{numeric_header, numeric_instance};

    fn stump() -> TreeSnapshot {
        TreeSnapshot {
            globals: GlobalStatistics::default(),
            build_model_tree: false,
            root: Some(0),
            nodes: vec![
                SnapshotNode::Split {
                    test: NumericAttributeBinaryTest::new(0, 0.5, true),
                    children: vec![Some(1), Some(2)],
                    mean: 5.0,
                },
                SnapshotNode::Leaf {
                    mean: 1.0,
                    weights: vec![],
                },
                SnapshotNode::Leaf {
                    mean: 9.0,
                    weights: vec![],
                },
            ],
        }
    }

    #[test]
    fn test_predict_routes_to_leaf_mean() {
        let header = numeric_header(1);
        let snapshot = stump();
        assert_eq!(snapshot.predict(&numeric_instance(&header, &[0.2], 0.0)), 1.0);
        assert_eq!(snapshot.predict(&numeric_instance(&header, &[0.5], 0.0)), 1.0);
        assert_eq!(snapshot.predict(&numeric_instance(&header, &[0.7], 0.0)), 9.0);
        assert_eq!(snapshot.num_leaves(), 2);
    }

    #[test]
    fn test_missing_value_stops_at_split_mean() {
        let header = numeric_header(1);
        let snapshot = stump();
        assert_eq!(
            snapshot.predict(&numeric_instance(&header, &[f64::NAN], 0.0)),
            5.0
        );
    }

    #[test]
    fn test_empty_snapshot_predicts_zero() {
        let header = numeric_header(1);
        let snapshot = TreeSnapshot {
            globals: GlobalStatistics::default(),
            build_model_tree: true,
            root: None,
            nodes: vec![],
        };
        assert_eq!(snapshot.predict(&numeric_instance(&header, &[1.0], 0.0)), 0.0);
    }

    #[test]
    fn test_json_uses_tagged_nodes() {
        let json = serde_json::to_value(stump()).unwrap();
        assert_eq!(json["nodes"][0]["type"], "split");
        assert_eq!(json["nodes"][1]["type"], "leaf");
        let back: TreeSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, stump());
    }
}
