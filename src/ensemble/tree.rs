//! Depth-limited regression tree used as the weak learner of the booster.
//!
//! Nodes live in a flat `Vec` and reference their children by index. A row goes
//! to the left child when its value is `<= threshold`, the same rule the
//! binarizer uses for its indicator columns.

use ndarray::{ArrayView1, ArrayView2};
use rand::Rng;

/// Nodes whose squared error is at or below this value are not split.
const PURITY_EPS: f64 = 1e-12;
/// Relative tolerance under which two split decreases count as equal.
const TIE_RTOL: f64 = 1e-9;

#[derive(Clone, Debug, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// A fitted squared-error regression tree.
#[derive(Clone, Debug)]
pub struct RegressionTree {
    nodes: Vec<Node>,
    /// Total squared-error decrease per feature.
    impurity_decrease: Vec<f64>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    decrease: f64,
    key: (u64, u64),
}

impl RegressionTree {
    /// Fit a tree of depth at most `max_depth` to `targets`.
    ///
    /// Candidates whose decreases agree within a relative `1e-9` are ties. A tie
    /// goes to the candidate with the smaller seeded hash of the row partition it
    /// produces, so the grown tree depends on the columns' contents and on `rng`,
    /// never on the position of a column in `x`.
    pub fn fit<R: Rng + ?Sized>(
        x: ArrayView2<'_, f64>,
        targets: &[f64],
        max_depth: usize,
        rng: &mut R,
    ) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            impurity_decrease: vec![0.0; x.ncols()],
        };
        let salt: u64 = rng.gen();
        let indices: Vec<usize> = (0..x.nrows()).collect();
        tree.grow(x, targets, indices, 0, max_depth, salt);
        tree
    }

    fn grow(
        &mut self,
        x: ArrayView2<'_, f64>,
        targets: &[f64],
        indices: Vec<usize>,
        depth: usize,
        max_depth: usize,
        salt: u64,
    ) -> usize {
        let value = mean(targets, &indices);
        let node_id = self.nodes.len();
        self.nodes.push(Node::Leaf { value });

        if depth >= max_depth || indices.len() < 2 {
            return node_id;
        }

        let Some(split) = best_split(x, targets, &indices, salt) else {
            return node_id;
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[[i, split.feature]] <= split.threshold);

        self.impurity_decrease[split.feature] += split.decrease;
        let left = self.grow(x, targets, left_rows, depth + 1, max_depth, salt);
        let right = self.grow(x, targets, right_rows, depth + 1, max_depth, salt);
        self.nodes[node_id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node_id
    }

    /// Index of the leaf node `row` falls into.
    pub fn apply(&self, row: ArrayView1<'_, f64>) -> usize {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { .. } => return idx,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        match &self.nodes[self.apply(row)] {
            Node::Leaf { value } => *value,
            Node::Split { .. } => unreachable!("apply always stops at a leaf"),
        }
    }

    /// Overwrite the value of leaf `node`; split nodes are left untouched.
    pub(crate) fn set_leaf_value(&mut self, node: usize, new_value: f64) {
        if let Some(Node::Leaf { value }) = self.nodes.get_mut(node) {
            *value = new_value;
        }
    }

    /// Thresholds of every split on `feature`, in node order.
    pub fn thresholds(&self, feature: usize) -> Vec<f64> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                Node::Split {
                    feature: f,
                    threshold,
                    ..
                } if *f == feature => Some(*threshold),
                _ => None,
            })
            .collect()
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of split (internal) nodes.
    pub fn n_splits(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Split { .. }))
            .count()
    }

    /// Raw per-feature squared-error decrease accumulated while growing.
    pub fn impurity_decrease(&self) -> &[f64] {
        &self.impurity_decrease
    }
}

fn mean(targets: &[f64], indices: &[usize]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    indices.iter().map(|&i| targets[i]).sum::<f64>() / indices.len() as f64
}

/// splitmix64 finalizer.
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Find the split with the largest squared-error decrease over all features.
fn best_split(
    x: ArrayView2<'_, f64>,
    targets: &[f64],
    indices: &[usize],
    salt: u64,
) -> Option<SplitCandidate> {
    let n = indices.len();
    let total_sum: f64 = indices.iter().map(|&i| targets[i]).sum();
    let total_sq: f64 = indices.iter().map(|&i| targets[i] * targets[i]).sum();
    let parent_sse = total_sq - total_sum * total_sum / n as f64;
    if parent_sse <= PURITY_EPS {
        return None;
    }
    let tol = TIE_RTOL * parent_sse;
    let total_hash = indices
        .iter()
        .fold(0u64, |h, &i| h.wrapping_add(mix(salt ^ i as u64)));

    let mut best: Option<SplitCandidate> = None;
    let mut rows: Vec<(f64, f64, u64)> = Vec::with_capacity(n);

    for feature in 0..x.ncols() {
        rows.clear();
        rows.extend(
            indices
                .iter()
                .map(|&i| (x[[i, feature]], targets[i], mix(salt ^ i as u64))),
        );
        rows.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        let mut left_hash = 0u64;
        for i in 0..n - 1 {
            let (value, target, hash) = rows[i];
            left_sum += target;
            left_sq += target * target;
            left_hash = left_hash.wrapping_add(hash);

            let next = rows[i + 1].0;
            if value >= next {
                continue;
            }

            let left_n = (i + 1) as f64;
            let right_n = (n - i - 1) as f64;
            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;
            let left_sse = left_sq - left_sum * left_sum / left_n;
            let right_sse = right_sq - right_sum * right_sum / right_n;
            let decrease = parent_sse - left_sse - right_sse;

            // Unordered pair, so mirrored partitions hash alike.
            let right_hash = total_hash.wrapping_sub(left_hash);
            let key = (left_hash.min(right_hash), left_hash.max(right_hash));

            let better = match &best {
                None => decrease > tol,
                Some(b) => {
                    decrease > b.decrease + tol
                        || (decrease >= b.decrease - tol && key < b.key)
                }
            };
            if better {
                let mut threshold = value + (next - value) / 2.0;
                // Adjacent floats can round the midpoint up onto `next`.
                if threshold >= next {
                    threshold = value;
                }
                best = Some(SplitCandidate {
                    feature,
                    threshold,
                    decrease,
                    key,
                });
            }
        }
    }

    best
}
