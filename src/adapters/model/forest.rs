//! Random forest classifier over exported decision trees.
//!
//! Trees use the flat array layout of a fitted scikit-learn `tree_`: node `i`
//! is a leaf when `children_left[i] == -1`, otherwise samples with
//! `x[feature[i]] <= threshold[i]` go left. `value[i]` holds the per-class
//! sample weights at that node.

use serde::Deserialize;

use crate::ports::{ChurnClassifier, InferenceError};

const LEAF: i64 = -1;

/// One exported decision tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TreeArtifact {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

#[derive(Debug, Clone)]
struct DecisionTree {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf([f64; 2]),
}

impl DecisionTree {
    fn from_artifact(index: usize, tree: &TreeArtifact, n_features: usize) -> Result<Self, InferenceError> {
        let bad = |reason: String| InferenceError::InvalidArtifact(format!("tree {}: {}", index, reason));

        let n = tree.children_left.len();
        if n == 0 {
            return Err(bad("has no nodes".to_string()));
        }
        if [
            tree.children_right.len(),
            tree.feature.len(),
            tree.threshold.len(),
            tree.value.len(),
        ]
        .iter()
        .any(|len| *len != n)
        {
            return Err(bad("node arrays differ in length".to_string()));
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let (left, right) = (tree.children_left[i], tree.children_right[i]);
            if left == LEAF {
                if right != LEAF {
                    return Err(bad(format!("node {} has only one child", i)));
                }
                nodes.push(Node::Leaf(leaf_distribution(&tree.value[i]).map_err(|r| {
                    bad(format!("node {}: {}", i, r))
                })?));
                continue;
            }

            // Children always come after their parent, which rules out cycles.
            let child = |c: i64| -> Result<usize, InferenceError> {
                usize::try_from(c)
                    .ok()
                    .filter(|c| *c > i && *c < n)
                    .ok_or_else(|| bad(format!("node {} has invalid child {}", i, c)))
            };
            let feature = usize::try_from(tree.feature[i])
                .ok()
                .filter(|f| *f < n_features)
                .ok_or_else(|| bad(format!("node {} splits on feature {}", i, tree.feature[i])))?;
            if !tree.threshold[i].is_finite() {
                return Err(bad(format!("node {} has a non-finite threshold", i)));
            }

            nodes.push(Node::Split {
                feature,
                threshold: tree.threshold[i],
                left: child(left)?,
                right: child(right)?,
            });
        }

        Ok(Self { nodes })
    }

    fn leaf_for(&self, x: &[f64]) -> [f64; 2] {
        let mut i = 0;
        loop {
            match &self.nodes[i] {
                Node::Leaf(distribution) => return *distribution,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => i = if x[*feature] <= *threshold { *left } else { *right },
            }
        }
    }
}

/// Normalizes leaf class weights into probabilities.
fn leaf_distribution(weights: &[f64]) -> Result<[f64; 2], String> {
    let [w0, w1] = <[f64; 2]>::try_from(weights)
        .map_err(|_| format!("expected 2 class weights, got {}", weights.len()))?;
    if !(w0.is_finite() && w1.is_finite()) || w0 < 0.0 || w1 < 0.0 {
        return Err("class weights must be finite and non-negative".to_string());
    }
    let total = w0 + w1;
    if total <= 0.0 {
        return Err("leaf has zero total weight".to_string());
    }
    Ok([w0 / total, w1 / total])
}

/// Averages leaf class distributions over all trees.
#[derive(Debug, Clone)]
pub struct RandomForestClassifier {
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForestClassifier {
    pub fn from_trees(n_features: usize, trees: &[TreeArtifact]) -> Result<Self, InferenceError> {
        if n_features == 0 {
            return Err(InferenceError::InvalidArtifact(
                "forest must declare at least one feature".to_string(),
            ));
        }
        if trees.is_empty() {
            return Err(InferenceError::InvalidArtifact("forest has no trees".to_string()));
        }
        let trees = trees
            .iter()
            .enumerate()
            .map(|(i, tree)| DecisionTree::from_artifact(i, tree, n_features))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { n_features, trees })
    }

    fn check_width(&self, encoded: &[f64]) -> Result<(), InferenceError> {
        if encoded.len() != self.n_features {
            return Err(InferenceError::shape_mismatch(self.n_features, encoded.len()));
        }
        Ok(())
    }
}

impl ChurnClassifier for RandomForestClassifier {
    fn predict(&self, encoded: &[f64]) -> Result<usize, InferenceError> {
        let [p0, p1] = self.predict_proba(encoded)?;
        Ok(if p1 > p0 { 1 } else { 0 })
    }

    fn predict_proba(&self, encoded: &[f64]) -> Result<[f64; 2], InferenceError> {
        self.check_width(encoded)?;
        let (sum0, sum1) = self
            .trees
            .iter()
            .map(|tree| tree.leaf_for(encoded))
            .fold((0.0, 0.0), |(a, b), [p0, p1]| (a + p0, b + p1));
        let n = self.trees.len() as f64;
        Ok([sum0 / n, sum1 / n])
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}
