//! Core traits for binarizing transformers.
//!
//! - [`Transformer`]: a stateful, supervised pipeline stage. `fit` learns from
//!   `(X, y)` and stores the result; every query fails with
//!   [`BinarizerError::NotFitted`] until it has.
//! - [`FittedTransformer`]: the learned state on its own, ready for inference and
//!   serialization.

use crate::error::BinarizerError;
use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Fitted parameters stored as bincode bytes.
pub trait SerializableParams: Serialize + DeserializeOwned {
    fn to_bytes(&self) -> Result<Vec<u8>, BinarizerError> {
        Ok(bincode::serialize(self)?)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, BinarizerError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl<T: Serialize + DeserializeOwned> SerializableParams for T {}

/// A supervised transformer with an explicit fitted/not-fitted state.
///
/// # Example
/// ```ignore
/// use threshold_guess::{ThresholdGuessBinarizer, Transformer};
///
/// let mut binarizer = ThresholdGuessBinarizer::new();
/// binarizer.fit(x.view(), y.view())?;
/// let binary = binarizer.transform(x.view())?;
/// ```
pub trait Transformer {
    /// Learn from a training pair, replacing any previously fitted state.
    ///
    /// # Errors
    /// Returns [`BinarizerError`] if:
    /// - Data is empty
    /// - Data contains NaN or infinite values
    /// - `y` does not have one entry per row of `x`
    fn fit(
        &mut self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<&mut Self, BinarizerError>;

    /// Transform data using the fitted state.
    ///
    /// # Errors
    /// Returns [`BinarizerError::NotFitted`] before `fit`, and
    /// [`BinarizerError::FeatureMismatch`] if the column count differs from fit time.
    fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, BinarizerError>;

    /// Whether `fit` has completed.
    fn is_fitted(&self) -> bool;

    /// Fit and transform the same data in one step.
    fn fit_transform(
        &mut self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<Array2<f64>, BinarizerError> {
        self.fit(x, y)?;
        self.transform(x)
    }
}

/// Learned state of a transformer, detached from its training machinery.
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
/// - `save_to_file` / `load_from_file` are cross-platform compatible.
pub trait FittedTransformer: Clone {
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;

    /// Transform data using learned parameters.
    fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, BinarizerError>;

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct fitted state from parameters, validating its invariants.
    fn from_params(params: Self::Params) -> Result<Self, BinarizerError>
    where
        Self: Sized;

    /// Returns the number of features seen during fit.
    fn n_features_in(&self) -> usize;

    /// Save the fitted state to a file.
    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), BinarizerError> {
        let bytes = self.extract_params().to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load fitted state from a file.
    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, BinarizerError>
    where
        Self: Sized,
    {
        let bytes = std::fs::read(path)?;
        Self::from_params(Self::Params::from_bytes(&bytes)?)
    }
}
