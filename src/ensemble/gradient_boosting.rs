//! Gradient boosted classification trees with log-loss.
//!
//! Binary problems fit one regression tree per stage to the pseudo-residuals
//! `y - sigmoid(F)`. Problems with `K >= 3` classes fit `K` trees per stage, one
//! per class, to `y_k - softmax_k(F)`. Leaf values are replaced by a single
//! Newton-Raphson step after each tree is grown.
//!
//! As a [`ThresholdOracle`] it exposes one tree per stage, the one fit for the
//! first output column; feature importances still average over every tree.
//! Split ties are settled by row partition rather than column position, so
//! reordering the columns of `x` leaves the fitted model's predictions unchanged.
//!
//! # Example
//! ```
//! use ndarray::array;
//! use threshold_guess::config::EnsembleParams;
//! use threshold_guess::ensemble::{GradientBoostingClassifier, ThresholdOracle};
//!
//! let x = array![[1.0], [2.0], [3.0], [4.0]];
//! let y = array![0.0, 0.0, 1.0, 1.0];
//! let params = EnsembleParams { n_estimators: 5, max_depth: 1, ..Default::default() };
//!
//! let mut gb = GradientBoostingClassifier::from_params(&params);
//! gb.fit(x.view(), y.view()).unwrap();
//! assert_eq!(gb.tree_thresholds(0, 0), vec![2.5]);
//! assert_eq!(gb.score(x.view(), y.view()).unwrap(), 1.0);
//! ```

use super::labels::ClassEncoder;
use super::tree::RegressionTree;
use super::ThresholdOracle;
use crate::config::EnsembleParams;
use crate::error::EnsembleError;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::debug;

/// Prior probabilities are clamped away from 0 and 1 before taking logs.
const PRIOR_CLAMP: f64 = 1e-8;
/// Newton denominators below this produce a zero leaf.
const MIN_HESSIAN: f64 = 1e-150;

/// Log-loss gradient boosting classifier used as the default threshold oracle.
#[derive(Clone, Debug)]
pub struct GradientBoostingClassifier {
    params: EnsembleParams,
    classes: Option<ClassEncoder>,
    /// Initial raw score per output column.
    init: Vec<f64>,
    /// Trees per stage: one for binary problems, one per class otherwise.
    stages: Vec<Vec<RegressionTree>>,
    n_features: usize,
    importances: Vec<f64>,
}

impl GradientBoostingClassifier {
    pub fn new(params: EnsembleParams) -> Self {
        Self {
            params,
            classes: None,
            init: Vec::new(),
            stages: Vec::new(),
            n_features: 0,
            importances: Vec::new(),
        }
    }

    pub fn params(&self) -> &EnsembleParams {
        &self.params
    }

    /// Class values seen during fit, in encoded order.
    pub fn classes(&self) -> Option<&[f64]> {
        self.classes.as_ref().map(ClassEncoder::classes)
    }

    fn validate_params(&self) -> Result<(), EnsembleError> {
        let p = &self.params;
        if p.n_estimators == 0 {
            return Err(EnsembleError::InvalidParameter(
                "n_estimators must be >= 1".to_string(),
            ));
        }
        if p.max_depth == 0 {
            return Err(EnsembleError::InvalidParameter(
                "max_depth must be >= 1".to_string(),
            ));
        }
        if !p.learning_rate.is_finite() || p.learning_rate <= 0.0 {
            return Err(EnsembleError::InvalidParameter(format!(
                "learning_rate must be a positive finite number, got {}",
                p.learning_rate
            )));
        }
        Ok(())
    }

    fn trees_per_stage(&self) -> usize {
        self.stages.first().map_or(0, Vec::len)
    }

    /// Raw additive scores, one column per output dimension.
    pub fn decision_function(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, EnsembleError> {
        if self.classes.is_none() {
            return Err(EnsembleError::NotFitted);
        }
        if x.ncols() != self.n_features {
            return Err(EnsembleError::ShapeMismatch {
                what: "features",
                expected: self.n_features,
                got: x.ncols(),
            });
        }

        let mut raw = Array2::from_shape_fn((x.nrows(), self.init.len()), |(_, k)| self.init[k]);
        for stage in &self.stages {
            for (k, tree) in stage.iter().enumerate() {
                for (i, row) in x.axis_iter(Axis(0)).enumerate() {
                    raw[[i, k]] += self.params.learning_rate * tree.predict_row(row);
                }
            }
        }
        Ok(raw)
    }

    /// Predicted class values.
    pub fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Vec<f64>, EnsembleError> {
        let classes = self.classes.as_ref().ok_or(EnsembleError::NotFitted)?;
        let raw = self.decision_function(x)?;
        Ok(raw
            .axis_iter(Axis(0))
            .map(|scores| {
                let idx = if scores.len() == 1 {
                    usize::from(scores[0] > 0.0)
                } else {
                    argmax(scores)
                };
                classes.class_at(idx)
            })
            .collect())
    }

    fn fit_stages(&mut self, x: ArrayView2<'_, f64>, labels: &[usize], n_classes: usize) {
        let n = x.nrows();
        let k = if n_classes == 2 { 1 } else { n_classes };
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.params.random_state);

        let mut counts = vec![0usize; n_classes];
        for &l in labels {
            counts[l] += 1;
        }
        self.init = if k == 1 {
            let p = (counts[1] as f64 / n as f64).clamp(PRIOR_CLAMP, 1.0 - PRIOR_CLAMP);
            vec![(p / (1.0 - p)).ln()]
        } else {
            counts
                .iter()
                .map(|&c| (c as f64 / n as f64).clamp(PRIOR_CLAMP, 1.0).ln())
                .collect()
        };

        let mut raw = Array2::from_shape_fn((n, k), |(_, c)| self.init[c]);
        self.stages = Vec::with_capacity(self.params.n_estimators);

        for _ in 0..self.params.n_estimators {
            let probs = probabilities(&raw);
            let mut stage = Vec::with_capacity(k);

            for c in 0..k {
                let target_class = if k == 1 { 1 } else { c };
                let residuals: Vec<f64> = (0..n)
                    .map(|i| f64::from(u8::from(labels[i] == target_class)) - probs[[i, c]])
                    .collect();

                let mut tree =
                    RegressionTree::fit(x, &residuals, self.params.max_depth, &mut rng);
                newton_leaf_step(&mut tree, x, &residuals, &probs.column(c), k);

                for (i, row) in x.axis_iter(Axis(0)).enumerate() {
                    raw[[i, c]] += self.params.learning_rate * tree.predict_row(row);
                }
                stage.push(tree);
            }
            self.stages.push(stage);
        }
    }

    fn compute_importances(&self) -> Vec<f64> {
        let mut total = vec![0.0; self.n_features];
        for tree in self.stages.iter().flatten() {
            let decrease = tree.impurity_decrease();
            let sum: f64 = decrease.iter().sum();
            if sum > 0.0 {
                for (t, d) in total.iter_mut().zip(decrease) {
                    *t += d / sum;
                }
            }
        }
        let norm: f64 = total.iter().sum();
        if norm > 0.0 {
            total.iter_mut().for_each(|t| *t /= norm);
        }
        total
    }
}

impl Default for GradientBoostingClassifier {
    fn default() -> Self {
        Self::new(EnsembleParams::default())
    }
}

impl ThresholdOracle for GradientBoostingClassifier {
    fn from_params(params: &EnsembleParams) -> Self {
        Self::new(params.clone())
    }

    fn fit(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<(), EnsembleError> {
        self.validate_params()?;
        let (rows, cols) = x.dim();
        if rows == 0 || cols == 0 {
            return Err(EnsembleError::EmptyData(format!(
                "Cannot fit on data of shape ({}, {})",
                rows, cols
            )));
        }
        if y.len() != rows {
            return Err(EnsembleError::ShapeMismatch {
                what: "labels",
                expected: rows,
                got: y.len(),
            });
        }

        let encoder = ClassEncoder::fit(y)?;
        if encoder.n_classes() < 2 {
            return Err(EnsembleError::SingleClass(encoder.class_at(0)));
        }
        let labels = encoder.encode(y)?;
        let n_classes = encoder.n_classes();

        self.n_features = cols;
        self.fit_stages(x, &labels, n_classes);
        self.importances = self.compute_importances();
        self.classes = Some(encoder);

        debug!(
            n_samples = rows,
            n_features = cols,
            n_classes,
            n_stages = self.stages.len(),
            trees_per_stage = self.trees_per_stage(),
            "gradient boosting fit complete"
        );
        Ok(())
    }

    /// One tree per boosting stage: the tree fit for the first output column.
    fn n_trees(&self) -> usize {
        self.stages.len()
    }

    fn tree_thresholds(&self, tree: usize, feature: usize) -> Vec<f64> {
        self.stages
            .get(tree)
            .and_then(|stage| stage.first())
            .map(|t| t.thresholds(feature))
            .unwrap_or_default()
    }

    fn feature_importances(&self) -> &[f64] {
        &self.importances
    }

    fn score(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<f64, EnsembleError> {
        if y.len() != x.nrows() {
            return Err(EnsembleError::ShapeMismatch {
                what: "labels",
                expected: x.nrows(),
                got: y.len(),
            });
        }
        if y.is_empty() {
            return Err(EnsembleError::EmptyData(
                "Cannot score on zero samples".to_string(),
            ));
        }
        let predicted = self.predict(x)?;
        let correct = predicted.iter().zip(y.iter()).filter(|(p, t)| p == t).count();
        Ok(correct as f64 / y.len() as f64)
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Class probabilities from raw scores: sigmoid for one column, softmax otherwise.
fn probabilities(raw: &Array2<f64>) -> Array2<f64> {
    if raw.ncols() == 1 {
        return raw.mapv(sigmoid);
    }
    let mut probs = raw.clone();
    for mut row in probs.axis_iter_mut(Axis(0)) {
        let max = row.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        row.mapv_inplace(|v| v / sum);
    }
    probs
}

fn argmax(scores: ArrayView1<'_, f64>) -> usize {
    let mut best = 0;
    for (i, &s) in scores.iter().enumerate() {
        if s > scores[best] {
            best = i;
        }
    }
    best
}

/// Replace each leaf with one Newton step on the log-loss.
fn newton_leaf_step(
    tree: &mut RegressionTree,
    x: ArrayView2<'_, f64>,
    residuals: &[f64],
    probs: &ArrayView1<'_, f64>,
    k: usize,
) {
    let mut numerator = vec![0.0; tree.n_nodes()];
    let mut denominator = vec![0.0; tree.n_nodes()];
    for (i, row) in x.axis_iter(Axis(0)).enumerate() {
        let leaf = tree.apply(row);
        let r = residuals[i];
        numerator[leaf] += r;
        denominator[leaf] += if k == 1 {
            probs[i] * (1.0 - probs[i])
        } else {
            r.abs() * (1.0 - r.abs())
        };
    }

    let scale = if k == 1 { 1.0 } else { (k - 1) as f64 / k as f64 };
    for (leaf, (&num, &den)) in numerator.iter().zip(&denominator).enumerate() {
        let value = if den.abs() < MIN_HESSIAN {
            0.0
        } else {
            scale * num / den
        };
        tree.set_leaf_value(leaf, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn stump_params(n_estimators: usize) -> EnsembleParams {
        EnsembleParams {
            learning_rate: 0.1,
            n_estimators,
            max_depth: 1,
            random_state: 0,
        }
    }

    #[test]
    fn test_gb_binary_separable() {
        let x = array![[1.0, 0.0], [2.0, 1.0], [3.0, 0.0], [4.0, 1.0]];
        let y = array![0.0, 0.0, 1.0, 1.0];
        let mut gb = GradientBoostingClassifier::from_params(&stump_params(10));
        gb.fit(x.view(), y.view()).unwrap();

        assert_eq!(gb.n_trees(), 10);
        assert_eq!(gb.classes(), Some(&[0.0, 1.0][..]));
        assert_relative_eq!(gb.score(x.view(), y.view()).unwrap(), 1.0);
        // Every stump cuts feature 0 between 2 and 3.
        for t in 0..gb.n_trees() {
            assert_eq!(gb.tree_thresholds(t, 0), vec![2.5]);
            assert!(gb.tree_thresholds(t, 1).is_empty());
        }
        let imp = gb.feature_importances();
        assert_relative_eq!(imp[0], 1.0);
        assert_relative_eq!(imp[1], 0.0);
    }

    #[test]
    fn test_gb_multiclass_trees_per_stage() {
        let x = array![[0.0], [1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = array![0.0, 0.0, 1.0, 1.0, 2.0, 2.0];
        let mut gb = GradientBoostingClassifier::from_params(&EnsembleParams {
            n_estimators: 20,
            max_depth: 2,
            learning_rate: 0.5,
            random_state: 0,
        });
        gb.fit(x.view(), y.view()).unwrap();

        // Three class trees per stage; only the first of each is exposed.
        assert_eq!(gb.stages.len(), 20);
        assert!(gb.stages.iter().all(|stage| stage.len() == 3));
        assert_eq!(gb.n_trees(), 20);
        for (t, stage) in gb.stages.iter().enumerate() {
            assert_eq!(gb.tree_thresholds(t, 0), stage[0].thresholds(0));
        }
        assert_relative_eq!(gb.score(x.view(), y.view()).unwrap(), 1.0);
        assert_eq!(gb.predict(x.view()).unwrap(), vec![0.0, 0.0, 1.0, 1.0, 2.0, 2.0]);
        assert!(gb.tree_thresholds(20, 0).is_empty());
    }

    #[test]
    fn test_gb_importances_sum_to_one() {
        let x = array![
            [0.1, 5.0, 1.0],
            [0.4, 3.0, 1.0],
            [0.5, 4.0, 1.0],
            [0.9, 1.0, 1.0],
            [0.2, 2.0, 1.0],
            [0.7, 6.0, 1.0]
        ];
        let y = array![0.0, 0.0, 1.0, 1.0, 0.0, 1.0];
        let mut gb = GradientBoostingClassifier::from_params(&EnsembleParams {
            n_estimators: 8,
            max_depth: 2,
            ..Default::default()
        });
        gb.fit(x.view(), y.view()).unwrap();

        let imp = gb.feature_importances();
        assert_eq!(imp.len(), 3);
        assert_relative_eq!(imp.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        // The constant column is never split on.
        assert_eq!(imp[2], 0.0);
    }

    #[test]
    fn test_gb_deterministic_given_seed() {
        let x = array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0], [4.0, 4.0], [5.0, 5.0]];
        let y = array![0.0, 1.0, 0.0, 1.0, 1.0];
        let params = EnsembleParams {
            n_estimators: 15,
            max_depth: 2,
            random_state: 11,
            ..Default::default()
        };
        let mut a = GradientBoostingClassifier::from_params(&params);
        let mut b = GradientBoostingClassifier::from_params(&params);
        a.fit(x.view(), y.view()).unwrap();
        b.fit(x.view(), y.view()).unwrap();

        for t in 0..a.n_trees() {
            for f in 0..2 {
                assert_eq!(a.tree_thresholds(t, f), b.tree_thresholds(t, f));
            }
        }
        assert_eq!(a.feature_importances(), b.feature_importances());
    }

    #[test]
    fn test_gb_single_class_rejected() {
        let x = array![[1.0], [2.0]];
        let y = array![3.0, 3.0];
        let mut gb = GradientBoostingClassifier::default();
        assert_eq!(
            gb.fit(x.view(), y.view()),
            Err(EnsembleError::SingleClass(3.0))
        );
    }

    #[test]
    fn test_gb_invalid_params() {
        let x = array![[1.0], [2.0]];
        let y = array![0.0, 1.0];
        for params in [
            EnsembleParams { n_estimators: 0, ..Default::default() },
            EnsembleParams { max_depth: 0, ..Default::default() },
            EnsembleParams { learning_rate: 0.0, ..Default::default() },
            EnsembleParams { learning_rate: f64::NAN, ..Default::default() },
        ] {
            let mut gb = GradientBoostingClassifier::from_params(&params);
            assert!(matches!(
                gb.fit(x.view(), y.view()),
                Err(EnsembleError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_gb_shape_errors() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![0.0, 1.0];
        let mut gb = GradientBoostingClassifier::default();
        assert!(matches!(
            gb.fit(x.view(), y.view()),
            Err(EnsembleError::ShapeMismatch { what: "labels", .. })
        ));

        let empty = Array2::<f64>::zeros((2, 0));
        let y = array![0.0, 1.0];
        assert!(matches!(
            gb.fit(empty.view(), y.view()),
            Err(EnsembleError::EmptyData(_))
        ));
    }

    #[test]
    fn test_gb_unfitted_queries() {
        let gb = GradientBoostingClassifier::default();
        let x = array![[1.0]];
        let y = array![0.0];
        assert_eq!(gb.n_trees(), 0);
        assert!(gb.feature_importances().is_empty());
        assert!(gb.tree_thresholds(0, 0).is_empty());
        assert_eq!(gb.score(x.view(), y.view()), Err(EnsembleError::NotFitted));
    }

    #[test]
    fn test_gb_predictions_ignore_column_order() {
        use rand::Rng;
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(8);
        let x = Array2::from_shape_fn((60, 7), |_| f64::from(u8::from(rng.gen_bool(0.4))));
        let y: ndarray::Array1<f64> = (0..60).map(|i| ((i * 5 + i / 7) % 3) as f64).collect();
        // Move the first column to the end.
        let order: Vec<usize> = (1..7).chain(std::iter::once(0)).collect();
        let rotated = x.select(Axis(1), &order);

        let params = EnsembleParams {
            n_estimators: 20,
            max_depth: 3,
            ..Default::default()
        };
        let mut a = GradientBoostingClassifier::from_params(&params);
        let mut b = GradientBoostingClassifier::from_params(&params);
        a.fit(x.view(), y.view()).unwrap();
        b.fit(rotated.view(), y.view()).unwrap();

        assert_eq!(a.predict(x.view()).unwrap(), b.predict(rotated.view()).unwrap());
        assert_eq!(
            a.score(x.view(), y.view()).unwrap(),
            b.score(rotated.view(), y.view()).unwrap()
        );
    }

    #[test]
    fn test_gb_signed_zero_labels_share_a_class() {
        let x = array![[0.0], [1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = array![-1.0, -1.0, -0.0, 0.0, 1.0, 1.0];
        let mut gb = GradientBoostingClassifier::from_params(&EnsembleParams {
            n_estimators: 20,
            max_depth: 2,
            learning_rate: 0.5,
            random_state: 0,
        });
        gb.fit(x.view(), y.view()).unwrap();

        assert_eq!(gb.classes().map(<[f64]>::len), Some(3));
        assert_relative_eq!(gb.score(x.view(), y.view()).unwrap(), 1.0);
    }
}
