//! Cut points and their extraction from a fitted ensemble.

use crate::ensemble::ThresholdOracle;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// A `(feature, cut value)` pair. A row activates it when `row[feature] <= value`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub feature: usize,
    pub value: f64,
}

impl Threshold {
    pub fn new(feature: usize, value: f64) -> Self {
        Self { feature, value }
    }

    /// Whether a value of this threshold's feature activates it.
    #[inline]
    pub fn is_active(&self, value: f64) -> bool {
        value <= self.value
    }
}

/// Harvest every distinct split threshold of a fitted ensemble.
///
/// Thresholds are grouped by feature in index order and sorted ascending within a
/// feature. Features that no tree splits on contribute nothing.
pub fn extract_thresholds<E: ThresholdOracle>(oracle: &E, n_features: usize) -> Vec<Threshold> {
    let n_trees = oracle.n_trees();
    let mut thresholds = Vec::new();

    for feature in 0..n_features {
        let mut values: Vec<f64> = (0..n_trees)
            .flat_map(|tree| oracle.tree_thresholds(tree, feature))
            .collect();
        values.sort_by(f64::total_cmp);
        values.dedup();

        if values.is_empty() {
            debug!(feature, "feature never split on by the ensemble");
            continue;
        }
        trace!(feature, n_thresholds = values.len(), "extracted thresholds");
        thresholds.extend(values.into_iter().map(|value| Threshold { feature, value }));
    }

    thresholds
}
