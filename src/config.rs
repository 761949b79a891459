//! Hyperparameters for the binarizer and its auxiliary ensemble.

use serde::{Deserialize, Serialize};

/// Hyperparameters forwarded to the auxiliary tree ensemble.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnsembleParams {
    /// Shrinkage applied to each tree's contribution.
    pub learning_rate: f64,
    /// Number of boosting stages.
    pub n_estimators: usize,
    /// Maximum depth of every tree.
    pub max_depth: usize,
    /// Seed for the ensemble's random number generator.
    pub random_state: u64,
}

impl Default for EnsembleParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            n_estimators: 100,
            max_depth: 3,
            random_state: 0,
        }
    }
}

/// Configuration for [`ThresholdGuessBinarizer`](crate::binarizer::ThresholdGuessBinarizer).
///
/// # Example
/// ```
/// use threshold_guess::ThresholdGuessConfig;
///
/// let config = ThresholdGuessConfig::default()
///     .with_n_estimators(40)
///     .with_max_depth(1)
///     .with_column_elimination(false);
/// assert_eq!(config.ensemble.n_estimators, 40);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdGuessConfig {
    /// Parameters of the ensemble used as threshold oracle.
    #[serde(flatten)]
    pub ensemble: EnsembleParams,
    /// Whether to greedily prune redundant thresholds after extraction.
    pub column_elimination: bool,
}

impl Default for ThresholdGuessConfig {
    fn default() -> Self {
        Self {
            ensemble: EnsembleParams::default(),
            column_elimination: true,
        }
    }
}

impl ThresholdGuessConfig {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.ensemble.learning_rate = learning_rate;
        self
    }

    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.ensemble.n_estimators = n_estimators;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.ensemble.max_depth = max_depth;
        self
    }

    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.ensemble.random_state = random_state;
        self
    }

    /// Enable or disable the column elimination pass.
    ///
    /// When disabled, every extracted threshold is kept in extraction order.
    pub fn with_column_elimination(mut self, column_elimination: bool) -> Self {
        self.column_elimination = column_elimination;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ThresholdGuessConfig::default();
        assert_eq!(config.ensemble.n_estimators, 100);
        assert_eq!(config.ensemble.max_depth, 3);
        assert_eq!(config.ensemble.random_state, 0);
        assert!((config.ensemble.learning_rate - 0.1).abs() < 1e-12);
        assert!(config.column_elimination);
    }

    #[test]
    fn test_config_builder_chain() {
        let config = ThresholdGuessConfig::default()
            .with_learning_rate(0.5)
            .with_n_estimators(5)
            .with_max_depth(1)
            .with_random_state(7)
            .with_column_elimination(false);
        assert_eq!(
            config.ensemble,
            EnsembleParams {
                learning_rate: 0.5,
                n_estimators: 5,
                max_depth: 1,
                random_state: 7,
            }
        );
        assert!(!config.column_elimination);
    }

    #[test]
    fn test_config_from_flat_json() {
        let json = r#"{
            "learning_rate": 0.2,
            "n_estimators": 40,
            "max_depth": 1,
            "random_state": 42,
            "column_elimination": false
        }"#;
        let config: ThresholdGuessConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.ensemble.n_estimators, 40);
        assert_eq!(config.ensemble.random_state, 42);
        assert!(!config.column_elimination);
    }
}
