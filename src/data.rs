//! Input containers and validation.
//!
//! Feature matrices are plain `ndarray` arrays of shape `(n_samples, n_features)`.
//! [`NamedMatrix`] attaches column names to a matrix, the way a data frame carries
//! its column index; names found there take precedence over names passed to `fit`.

use crate::error::BinarizerError;
use ndarray::{Array2, ArrayView1, ArrayView2};

/// A feature matrix together with its column names.
#[derive(Clone, Debug)]
pub struct NamedMatrix {
    data: Array2<f64>,
    columns: Vec<String>,
}

impl NamedMatrix {
    /// Attach `columns` to `data`.
    ///
    /// # Errors
    /// Returns [`BinarizerError::InvalidShape`] if the number of names differs from
    /// the number of columns.
    pub fn new<S: Into<String>>(
        data: Array2<f64>,
        columns: impl IntoIterator<Item = S>,
    ) -> Result<Self, BinarizerError> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.len() != data.ncols() {
            return Err(BinarizerError::InvalidShape {
                expected: format!("{} column names", data.ncols()),
                got: format!("{} column names", columns.len()),
            });
        }
        Ok(Self { data, columns })
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Get the shape of the data.
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Unwrap to get the inner matrix.
    pub fn into_inner(self) -> Array2<f64> {
        self.data
    }
}

/// Positional names `x0, x1, …` used when no column names are available.
pub fn positional_names(n_features: usize) -> Vec<String> {
    (0..n_features).map(|i| format!("x{}", i)).collect()
}

/// Validate a training pair: non-empty, aligned and finite.
pub fn check_x_y(x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<(), BinarizerError> {
    let (rows, cols) = x.dim();
    if rows == 0 || cols == 0 {
        return Err(BinarizerError::EmptyData(format!(
            "Found array with shape ({}, {}); at least one sample and one feature are required",
            rows, cols
        )));
    }
    if y.len() != rows {
        return Err(BinarizerError::InvalidShape {
            expected: format!("{} labels", rows),
            got: format!("{} labels", y.len()),
        });
    }
    check_finite(x)?;
    if let Some(i) = y.iter().position(|v| !v.is_finite()) {
        return Err(BinarizerError::MissingValues(format!(
            "y contains non-finite value {} at index {}",
            y[i], i
        )));
    }
    Ok(())
}

/// Validate a matrix passed to `transform`. Zero rows are allowed.
pub fn check_array(x: ArrayView2<'_, f64>) -> Result<(), BinarizerError> {
    if x.ncols() == 0 {
        return Err(BinarizerError::EmptyData(
            "Found array with 0 features; at least one is required".to_string(),
        ));
    }
    check_finite(x)
}

fn check_finite(x: ArrayView2<'_, f64>) -> Result<(), BinarizerError> {
    for ((row, col), &val) in x.indexed_iter() {
        if !val.is_finite() {
            return Err(BinarizerError::MissingValues(format!(
                "X contains non-finite value {} at ({}, {})",
                val, row, col
            )));
        }
    }
    Ok(())
}
