//! Error types for binarization and the auxiliary tree ensemble.

use thiserror::Error;

/// Error raised by a [`ThresholdOracle`](crate::ensemble::ThresholdOracle) implementation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnsembleError {
    /// Invalid hyperparameter value.
    #[error("Invalid ensemble parameter: {0}")]
    InvalidParameter(String),
    /// Empty data provided where non-empty was required.
    #[error("Empty data: {0}")]
    EmptyData(String),
    /// Input dimensions disagree with each other or with fit time.
    #[error("Shape mismatch: expected {expected} {what}, got {got}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    /// The targets contain a single class, so there is nothing to separate.
    #[error("Targets contain a single class ({0}); at least two are required")]
    SingleClass(f64),
    /// A query was made before `fit`.
    #[error("Ensemble has not been fitted")]
    NotFitted,
}

/// Error type for threshold-guessing binarization.
#[derive(Debug, Error)]
pub enum BinarizerError {
    /// Shape mismatch between expected and actual dimensions.
    #[error("Invalid shape: expected {expected}, got {got}")]
    InvalidShape { expected: String, got: String },
    /// Feature dimension mismatch between fit and transform.
    #[error("Feature mismatch: expected {expected_features} features, got {got_features}")]
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },
    /// Empty data provided where non-empty was required.
    #[error("Empty data: {0}")]
    EmptyData(String),
    /// Data contains NaN or infinite values.
    #[error("Missing values: {0}")]
    MissingValues(String),
    /// Invalid parameter or inconsistent fitted state.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// A query operation was called before `fit`.
    #[error("ThresholdGuessBinarizer is not fitted yet; call `fit` first")]
    NotFitted,
    /// Failure reported by the auxiliary ensemble.
    #[error(transparent)]
    Ensemble(#[from] EnsembleError),
    /// Serialization or deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for BinarizerError {
    fn from(err: std::io::Error) -> Self {
        BinarizerError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for BinarizerError {
    fn from(err: bincode::Error) -> Self {
        BinarizerError::SerializationError(err.to_string())
    }
}
