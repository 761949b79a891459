//! Grouping of output columns by the input feature they threshold.

use super::threshold::Threshold;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Input feature index → output column positions, keyed in first-seen order.
///
/// Downstream tree learners use this to treat all thresholds of one input feature
/// as a single multi-way split.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureMap {
    entries: Vec<(usize, Vec<usize>)>,
}

impl FeatureMap {
    /// Scan `thresholds` once, grouping column positions by feature.
    pub fn from_thresholds(thresholds: &[Threshold]) -> Self {
        let mut slot: HashMap<usize, usize> = HashMap::new();
        let mut entries: Vec<(usize, Vec<usize>)> = Vec::new();
        for (column, threshold) in thresholds.iter().enumerate() {
            let idx = *slot.entry(threshold.feature).or_insert_with(|| {
                entries.push((threshold.feature, Vec::new()));
                entries.len() - 1
            });
            entries[idx].1.push(column);
        }
        Self { entries }
    }

    /// Output columns of `feature`, ascending.
    pub fn get(&self, feature: usize) -> Option<&[usize]> {
        self.entries
            .iter()
            .find(|(f, _)| *f == feature)
            .map(|(_, cols)| cols.as_slice())
    }

    /// Input features, in first-seen order.
    pub fn features(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|(f, _)| *f)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> + '_ {
        self.entries.iter().map(|(f, cols)| (*f, cols.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
