//! Threshold-guessing binarizer.
//!
//! Encodes numerical features as binary threshold indicators. Candidate cut points
//! are the split thresholds of an auxiliary tree ensemble fit on the data; an
//! optional greedy pass then drops cut points the ensemble does not need to keep
//! its training accuracy.
//!
//! # Example
//! ```
//! use ndarray::array;
//! use threshold_guess::{ThresholdGuessBinarizer, Transformer};
//!
//! let x = array![[1.0, 7.0], [2.0, 3.0], [3.0, 9.0], [4.0, 1.0]];
//! let y = array![0.0, 0.0, 1.0, 1.0];
//!
//! let mut binarizer = ThresholdGuessBinarizer::new()
//!     .with_n_estimators(5)
//!     .with_max_depth(1)
//!     .with_column_elimination(false);
//! let binary = binarizer.fit_transform(x.view(), y.view()).unwrap();
//!
//! assert_eq!(binarizer.feature_names_out().unwrap(), vec!["x0 <= 2.5"]);
//! assert_eq!(binary.column(0).to_vec(), vec![1.0, 1.0, 0.0, 0.0]);
//! ```

use super::binarize::binarize;
use super::elimination::eliminate_columns;
use super::feature_map::FeatureMap;
use super::threshold::{extract_thresholds, Threshold};
use crate::config::ThresholdGuessConfig;
use crate::data::{check_array, check_x_y, positional_names, NamedMatrix};
use crate::ensemble::{GradientBoostingClassifier, ThresholdOracle};
use crate::error::BinarizerError;
use crate::traits::{FittedTransformer, Transformer};
use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use tracing::{debug, info};

/// Binarizer whose cut points are guessed by a tree ensemble of type `E`.
#[derive(Clone, Debug)]
pub struct ThresholdGuessBinarizer<E: ThresholdOracle = GradientBoostingClassifier> {
    config: ThresholdGuessConfig,
    fitted: Option<FittedThresholds>,
    _oracle: PhantomData<fn() -> E>,
}

impl ThresholdGuessBinarizer<GradientBoostingClassifier> {
    /// Create a binarizer backed by gradient boosting with default settings.
    pub fn new() -> Self {
        Self::from_config(ThresholdGuessConfig::default())
    }

    /// Create a binarizer backed by gradient boosting.
    pub fn with_config(config: ThresholdGuessConfig) -> Self {
        Self::from_config(config)
    }
}

impl Default for ThresholdGuessBinarizer<GradientBoostingClassifier> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ThresholdOracle> ThresholdGuessBinarizer<E> {
    /// Create an unfitted binarizer for any oracle type.
    pub fn from_config(config: ThresholdGuessConfig) -> Self {
        Self {
            config,
            fitted: None,
            _oracle: PhantomData,
        }
    }

    /// Wrap a previously fitted (e.g. loaded) state.
    pub fn from_fitted(config: ThresholdGuessConfig, fitted: FittedThresholds) -> Self {
        Self {
            config,
            fitted: Some(fitted),
            _oracle: PhantomData,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.config = self.config.with_learning_rate(learning_rate);
        self
    }

    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.config = self.config.with_n_estimators(n_estimators);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.config = self.config.with_max_depth(max_depth);
        self
    }

    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.config = self.config.with_random_state(random_state);
        self
    }

    pub fn with_column_elimination(mut self, column_elimination: bool) -> Self {
        self.config = self.config.with_column_elimination(column_elimination);
        self
    }

    pub fn config(&self) -> &ThresholdGuessConfig {
        &self.config
    }

    /// Fit with explicit column names; `None` falls back to `x0, x1, …`.
    ///
    /// # Errors
    /// Besides the validation errors of [`Transformer::fit`], returns
    /// [`BinarizerError::InvalidParameter`] if `columns` has the wrong length.
    pub fn fit_with_columns(
        &mut self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
        columns: Option<&[String]>,
    ) -> Result<&mut Self, BinarizerError> {
        self.fit_inner(x, y, columns.map(<[String]>::to_vec))
    }

    /// Fit on a matrix that carries its own column names.
    pub fn fit_named(
        &mut self,
        x: &NamedMatrix,
        y: ArrayView1<'_, f64>,
    ) -> Result<&mut Self, BinarizerError> {
        self.fit_inner(x.view(), y, Some(x.columns().to_vec()))
    }

    fn fit_inner(
        &mut self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
        names: Option<Vec<String>>,
    ) -> Result<&mut Self, BinarizerError> {
        self.fitted = None;
        check_x_y(x, y)?;
        let (n_samples, n_features) = x.dim();

        let feature_names = match names {
            Some(names) if names.len() != n_features => {
                return Err(BinarizerError::InvalidParameter(format!(
                    "Got {} column names for {} features",
                    names.len(),
                    n_features
                )));
            }
            Some(names) => names,
            None => positional_names(n_features),
        };

        debug!(
            n_samples,
            n_features,
            column_elimination = self.config.column_elimination,
            "fitting threshold-guess binarizer"
        );

        let mut oracle = E::from_params(&self.config.ensemble);
        oracle.fit(x, y)?;
        let extracted = extract_thresholds(&oracle, n_features);
        let n_extracted = extracted.len();

        let thresholds = if !self.config.column_elimination {
            extracted
        } else if n_extracted < 2 {
            debug!(n_extracted, "too few thresholds to eliminate; keeping all");
            extracted
        } else {
            let full = binarize(x, &extracted)?;
            let elimination = eliminate_columns(full, y, extracted, &mut oracle)?;
            debug!(
                base_score = elimination.base_score,
                last_accepted_score = elimination.last_accepted_score,
                removals = elimination.removals,
                stop_reason = ?elimination.stop_reason,
                "column elimination finished"
            );
            elimination.retained
        };

        let fitted = FittedThresholds::new(n_features, feature_names, thresholds);
        info!(
            n_thresholds_extracted = n_extracted,
            n_features_out = fitted.n_features_out(),
            "threshold-guess binarizer fitted"
        );
        self.fitted = Some(fitted);
        Ok(self)
    }

    /// The fitted state.
    pub fn fitted(&self) -> Result<&FittedThresholds, BinarizerError> {
        self.fitted.as_ref().ok_or(BinarizerError::NotFitted)
    }

    /// Consume the binarizer, keeping only the fitted state.
    pub fn into_fitted(self) -> Result<FittedThresholds, BinarizerError> {
        self.fitted.ok_or(BinarizerError::NotFitted)
    }

    /// Labels of the output columns, `"{name} <= {value}"`.
    pub fn feature_names_out(&self) -> Result<Vec<String>, BinarizerError> {
        Ok(self.fitted()?.feature_names_out())
    }

    /// Input feature → output columns mapping.
    pub fn feature_map(&self) -> Result<FeatureMap, BinarizerError> {
        Ok(self.fitted()?.feature_map())
    }

    pub fn thresholds(&self) -> Result<&[Threshold], BinarizerError> {
        Ok(self.fitted()?.thresholds())
    }

    pub fn n_features_in(&self) -> Result<usize, BinarizerError> {
        Ok(self.fitted()?.n_features_in)
    }

    pub fn n_features_out(&self) -> Result<usize, BinarizerError> {
        Ok(self.fitted()?.n_features_out())
    }

    pub fn feature_names_in(&self) -> Result<&[String], BinarizerError> {
        Ok(self.fitted()?.feature_names_in())
    }
}

impl<E: ThresholdOracle> Transformer for ThresholdGuessBinarizer<E> {
    fn fit(
        &mut self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<&mut Self, BinarizerError> {
        self.fit_inner(x, y, None)
    }

    fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, BinarizerError> {
        FittedTransformer::transform(self.fitted()?, x)
    }

    fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }
}

/// Serializable parameters of a fitted binarizer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdGuessParams {
    /// Number of input features seen during fit.
    pub n_features_in: usize,
    /// Display name of each input feature.
    pub feature_names_in: Vec<String>,
    /// Retained thresholds in output column order.
    pub thresholds: Vec<Threshold>,
    /// Number of output columns.
    pub n_features_out: usize,
}

/// State of a fitted binarizer: everything `transform` needs.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedThresholds {
    n_features_in: usize,
    feature_names_in: Vec<String>,
    thresholds: Vec<Threshold>,
    n_features_out: usize,
}

impl FittedThresholds {
    fn new(n_features_in: usize, feature_names_in: Vec<String>, thresholds: Vec<Threshold>) -> Self {
        let n_features_out = thresholds.len();
        Self {
            n_features_in,
            feature_names_in,
            thresholds,
            n_features_out,
        }
    }

    pub fn thresholds(&self) -> &[Threshold] {
        &self.thresholds
    }

    pub fn n_features_out(&self) -> usize {
        self.n_features_out
    }

    pub fn feature_names_in(&self) -> &[String] {
        &self.feature_names_in
    }

    pub fn feature_names_out(&self) -> Vec<String> {
        self.thresholds
            .iter()
            .map(|t| format!("{} <= {}", self.feature_names_in[t.feature], format_cut(t.value)))
            .collect()
    }

    pub fn feature_map(&self) -> FeatureMap {
        FeatureMap::from_thresholds(&self.thresholds)
    }
}

/// Shortest round-trip form of `value`; exponents carry a sign and two digits.
///
/// `2.45`, `6.0`, `1e-05`, `1.5e+16`.
fn format_cut(value: f64) -> String {
    let repr = format!("{:?}", value);
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => repr,
    }
}

impl FittedTransformer for FittedThresholds {
    type Params = ThresholdGuessParams;

    fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, BinarizerError> {
        if x.ncols() != self.n_features_in {
            return Err(BinarizerError::FeatureMismatch {
                expected_features: self.n_features_in,
                got_features: x.ncols(),
            });
        }
        check_array(x)?;
        binarize(x, &self.thresholds)
    }

    fn extract_params(&self) -> Self::Params {
        ThresholdGuessParams {
            n_features_in: self.n_features_in,
            feature_names_in: self.feature_names_in.clone(),
            thresholds: self.thresholds.clone(),
            n_features_out: self.n_features_out,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, BinarizerError> {
        if params.feature_names_in.len() != params.n_features_in {
            return Err(BinarizerError::InvalidParameter(format!(
                "{} feature names for {} input features",
                params.feature_names_in.len(),
                params.n_features_in
            )));
        }
        if params.n_features_out != params.thresholds.len() {
            return Err(BinarizerError::InvalidParameter(format!(
                "n_features_out is {} but {} thresholds are stored",
                params.n_features_out,
                params.thresholds.len()
            )));
        }
        if let Some(t) = params
            .thresholds
            .iter()
            .find(|t| t.feature >= params.n_features_in)
        {
            return Err(BinarizerError::InvalidParameter(format!(
                "threshold on feature {} but only {} input features",
                t.feature, params.n_features_in
            )));
        }
        Ok(Self::new(
            params.n_features_in,
            params.feature_names_in,
            params.thresholds,
        ))
    }

    fn n_features_in(&self) -> usize {
        self.n_features_in
    }
}
