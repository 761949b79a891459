//! Class encoding for classification targets.
//!
//! Maps target values to integer indices (0, 1, 2, ...) by their sorted order.

use crate::error::EnsembleError;
use ndarray::ArrayView1;

/// Sorted distinct class values seen during fit.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassEncoder {
    classes: Vec<f64>,
}

impl ClassEncoder {
    /// Learn the distinct classes of `y`.
    pub fn fit(y: ArrayView1<'_, f64>) -> Result<Self, EnsembleError> {
        if y.is_empty() {
            return Err(EnsembleError::EmptyData(
                "Cannot encode an empty target vector".to_string(),
            ));
        }
        if let Some(v) = y.iter().find(|v| !v.is_finite()) {
            return Err(EnsembleError::InvalidParameter(format!(
                "Class labels must be finite, got {}",
                v
            )));
        }

        let mut classes: Vec<f64> = y.iter().map(|&v| canonical(v)).collect();
        classes.sort_by(f64::total_cmp);
        classes.dedup();
        Ok(Self { classes })
    }

    /// Get the unique classes.
    pub fn classes(&self) -> &[f64] {
        &self.classes
    }

    /// Get the number of classes.
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Index of `value`, or `None` for a class not seen during fit.
    pub fn index_of(&self, value: f64) -> Option<usize> {
        self.classes
            .binary_search_by(|c| c.total_cmp(&canonical(value)))
            .ok()
    }

    /// Class value at `index`.
    pub fn class_at(&self, index: usize) -> f64 {
        self.classes[index]
    }

    /// Encode labels into class indices.
    ///
    /// # Errors
    /// Returns [`EnsembleError::InvalidParameter`] for a label not seen during fit.
    pub fn encode(&self, y: ArrayView1<'_, f64>) -> Result<Vec<usize>, EnsembleError> {
        y.iter()
            .map(|&v| {
                self.index_of(v).ok_or_else(|| {
                    EnsembleError::InvalidParameter(format!("Unknown class label {}", v))
                })
            })
            .collect()
    }
}

/// `-0.0` and `0.0` are one class.
fn canonical(v: f64) -> f64 {
    v + 0.0
}
