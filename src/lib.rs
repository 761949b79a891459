//! # threshold_guess
//!
//! Supervised binarization of numerical features for tree learners that only accept
//! binary inputs.
//!
//! ## Core Design Principles
//!
//! - **Ensemble-guided cut points**: Candidate thresholds are the split values a
//!   gradient-boosted tree ensemble chose on the training data, so only cut points
//!   that helped separate the classes are kept.
//! - **Optional pruning**: A greedy backward pass drops the least important
//!   indicator columns while training accuracy holds.
//! - **Training/Inference Separation**: The fitted state ([`FittedThresholds`])
//!   holds only what `transform` needs and can be saved and loaded on its own.
//! - **Pluggable oracle**: The ensemble sits behind [`ThresholdOracle`]; the bundled
//!   [`GradientBoostingClassifier`] is the default.
//!
//! ## Quick Start
//!
//! ```rust
//! use ndarray::array;
//! use threshold_guess::{ThresholdGuessBinarizer, Transformer};
//!
//! let x = array![[1.0, 5.0], [2.0, 4.0], [3.0, 6.0], [4.0, 5.5]];
//! let y = array![0.0, 0.0, 1.0, 1.0];
//!
//! let mut binarizer = ThresholdGuessBinarizer::new()
//!     .with_n_estimators(10)
//!     .with_max_depth(1);
//! let binary = binarizer.fit_transform(x.view(), y.view()).unwrap();
//!
//! assert_eq!(binary.ncols(), binarizer.n_features_out().unwrap());
//! assert!(binary.iter().all(|&v| v == 0.0 || v == 1.0));
//! ```
//!
//! ## Module Structure
//!
//! - `binarizer` - Threshold extraction, indicator matrix, column elimination
//! - `ensemble` - Gradient-boosted regression trees used as threshold oracle
//! - `config` - Hyperparameters with serde support
//! - `data` - Input validation and named matrices
//! - `traits` - `Transformer` / `FittedTransformer`, bincode persistence of fitted parameters
//! - `error` - Error types

/// Threshold-guessing binarizer and its building blocks.
pub mod binarizer;

/// Binarizer and ensemble hyperparameters.
pub mod config;

/// Input containers and validation helpers.
pub mod data;

/// Auxiliary tree ensembles.
pub mod ensemble;

pub mod error;

/// Transformer traits.
pub mod traits;

pub use binarizer::{
    FeatureMap, FittedThresholds, Threshold, ThresholdGuessBinarizer, ThresholdGuessParams,
};
pub use config::{EnsembleParams, ThresholdGuessConfig};
pub use data::NamedMatrix;
pub use ensemble::{GradientBoostingClassifier, ThresholdOracle};
pub use error::{BinarizerError, EnsembleError};
pub use traits::{FittedTransformer, SerializableParams, Transformer};
