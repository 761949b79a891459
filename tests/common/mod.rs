//! Shared fixtures for integration tests.
#![allow(dead_code)]

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::collections::HashMap;
use threshold_guess::{EnsembleError, EnsembleParams, ThresholdOracle};

const CLASS_MEANS: [[f64; 4]; 3] = [
    [5.01, 3.43, 1.46, 0.25],
    [5.94, 2.77, 4.26, 1.33],
    [6.59, 2.97, 5.55, 2.03],
];
const CLASS_SPREAD: [[f64; 4]; 3] = [
    [0.35, 0.38, 0.17, 0.11],
    [0.52, 0.31, 0.47, 0.20],
    [0.64, 0.32, 0.55, 0.27],
];

/// Iris-shaped data: 150 rows, 4 features rounded to one decimal, 50 rows per class.
pub fn iris_like(seed: u64) -> (Array2<f64>, Array1<f64>) {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut x = Array2::zeros((150, 4));
    let mut y = Array1::zeros(150);
    for i in 0..150 {
        let class = i / 50;
        y[i] = class as f64;
        for j in 0..4 {
            let noise: f64 = (0..3).map(|_| rng.gen_range(-1.0..1.0)).sum();
            let value = CLASS_MEANS[class][j] + CLASS_SPREAD[class][j] * noise;
            x[[i, j]] = (value * 10.0).round() / 10.0;
        }
    }
    (x, y)
}

pub fn iris_columns() -> Vec<String> {
    ["sepal_length", "sepal_width", "petal_length", "petal_width"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Oracle that predicts the majority label of each distinct row pattern.
///
/// Its score only depends on which columns are present, never on their order, and
/// adding a column never lowers it. Importance of a column is `p * (1 - p)` where
/// `p` is the fraction of rows at or below its median. Thresholds offered for a
/// feature are the midpoints between its consecutive distinct quartiles.
#[derive(Clone, Debug, Default)]
pub struct LookupOracle {
    table: HashMap<Vec<u64>, f64>,
    thresholds: Vec<Vec<f64>>,
    importances: Vec<f64>,
    pub fits: usize,
}

fn row_key(row: ArrayView1<'_, f64>) -> Vec<u64> {
    row.iter().map(|v| v.to_bits()).collect()
}

impl ThresholdOracle for LookupOracle {
    fn from_params(_: &EnsembleParams) -> Self {
        Self::default()
    }

    fn fit(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<(), EnsembleError> {
        if x.nrows() != y.len() {
            return Err(EnsembleError::ShapeMismatch {
                what: "labels",
                expected: x.nrows(),
                got: y.len(),
            });
        }
        self.fits += 1;

        let mut counts: HashMap<Vec<u64>, HashMap<u64, usize>> = HashMap::new();
        for (row, &label) in x.outer_iter().zip(y.iter()) {
            *counts
                .entry(row_key(row))
                .or_default()
                .entry(label.to_bits())
                .or_default() += 1;
        }
        self.table = counts
            .into_iter()
            .map(|(key, labels)| {
                let (label, _) = labels
                    .into_iter()
                    .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
                    .unwrap();
                (key, f64::from_bits(label))
            })
            .collect();

        self.thresholds = x
            .columns()
            .into_iter()
            .map(|col| {
                let mut values = col.to_vec();
                values.sort_by(f64::total_cmp);
                let n = values.len();
                let mut quartiles: Vec<f64> = [n / 4, n / 2, 3 * n / 4]
                    .iter()
                    .map(|&q| values[q.min(n - 1)])
                    .collect();
                quartiles.dedup();
                quartiles.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
            })
            .collect();

        self.importances = x
            .columns()
            .into_iter()
            .map(|col| {
                let mut values = col.to_vec();
                values.sort_by(f64::total_cmp);
                let median = values[values.len() / 2];
                let p = values.iter().filter(|&&v| v <= median).count() as f64
                    / values.len() as f64;
                p * (1.0 - p)
            })
            .collect();
        Ok(())
    }

    fn n_trees(&self) -> usize {
        1
    }

    fn tree_thresholds(&self, tree: usize, feature: usize) -> Vec<f64> {
        if tree != 0 {
            return Vec::new();
        }
        self.thresholds.get(feature).cloned().unwrap_or_default()
    }

    fn feature_importances(&self) -> &[f64] {
        &self.importances
    }

    fn score(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<f64, EnsembleError> {
        if self.table.is_empty() {
            return Err(EnsembleError::NotFitted);
        }
        let correct = x
            .outer_iter()
            .zip(y.iter())
            .filter(|(row, label)| self.table.get(&row_key(row.view())) == Some(*label))
            .count();
        Ok(correct as f64 / y.len() as f64)
    }
}
