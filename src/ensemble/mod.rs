//! Auxiliary tree ensembles used as a source of candidate thresholds.
//!
//! The binarizer never predicts with the ensemble. It only needs the capability
//! captured by [`ThresholdOracle`]: fit, read each tree's split thresholds, read
//! the post-fit feature importances and measure training accuracy. Any tree
//! ensemble exposing those operations can stand in for the bundled
//! [`GradientBoostingClassifier`].

pub mod gradient_boosting;
pub mod labels;
pub mod tree;

pub use gradient_boosting::GradientBoostingClassifier;
pub use labels::ClassEncoder;
pub use tree::RegressionTree;

use crate::config::EnsembleParams;
use crate::error::EnsembleError;
use ndarray::{ArrayView1, ArrayView2};

/// A re-fittable tree ensemble queried for split thresholds and importances.
pub trait ThresholdOracle {
    /// Build an unfitted ensemble from hyperparameters.
    ///
    /// `params.random_state` must be the only source of randomness so that
    /// repeated fits on identical data are bit-identical.
    fn from_params(params: &EnsembleParams) -> Self
    where
        Self: Sized;

    /// Fit on `(x, y)`, discarding any previous fit.
    fn fit(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>)
        -> Result<(), EnsembleError>;

    /// Number of trees offered for threshold harvesting; zero before `fit`.
    fn n_trees(&self) -> usize;

    /// Every threshold tree `tree` splits `feature` on, in node order.
    ///
    /// Empty when the tree never splits on the feature or `tree` is out of range.
    fn tree_thresholds(&self, tree: usize, feature: usize) -> Vec<f64>;

    /// One importance value per input column of the last fit; empty before `fit`.
    fn feature_importances(&self) -> &[f64];

    /// Mean accuracy of the fitted ensemble on `(x, y)`.
    fn score(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<f64, EnsembleError>;
}
