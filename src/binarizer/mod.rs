//! Threshold-guessing binarization.
//!
//! A fitted binarizer maps each sample to a vector of indicators, one per retained
//! [`Threshold`]: `1.0` when the sample's value of that threshold's feature is at or
//! below the cut value, `0.0` otherwise.
//!
//! # Pipeline
//!
//! 1. Fit the auxiliary ensemble on `(X, y)` ([`crate::ensemble`]).
//! 2. [`extract_thresholds`]: collect every distinct split value per feature.
//! 3. [`binarize`]: build the indicator matrix.
//! 4. [`eliminate_columns`] (optional): drop indicators the ensemble can do without.
//!
//! The surviving thresholds fix the column order of every later `transform`.
//! [`FeatureMap`] groups those columns back by input feature.

pub mod binarize;
pub mod elimination;
pub mod feature_map;
pub mod threshold;
pub mod threshold_guess;

pub use binarize::binarize;
pub use elimination::{eliminate_columns, Elimination, StopReason};
pub use feature_map::FeatureMap;
pub use threshold::{extract_thresholds, Threshold};
pub use threshold_guess::{FittedThresholds, ThresholdGuessBinarizer, ThresholdGuessParams};
