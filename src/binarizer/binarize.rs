//! Materialization of the indicator matrix.

use super::threshold::Threshold;
use crate::error::BinarizerError;
use ndarray::{Array2, ArrayView2, Axis};

/// Build the `(n_samples, thresholds.len())` indicator matrix of `x`.
///
/// Column `k` holds `1.0` where `x[i, thresholds[k].feature] <= thresholds[k].value`
/// and `0.0` elsewhere.
///
/// # Errors
/// Returns [`BinarizerError::InvalidShape`] if a threshold's feature index is not a
/// column of `x`.
pub fn binarize(
    x: ArrayView2<'_, f64>,
    thresholds: &[Threshold],
) -> Result<Array2<f64>, BinarizerError> {
    if let Some(t) = thresholds.iter().find(|t| t.feature >= x.ncols()) {
        return Err(BinarizerError::InvalidShape {
            expected: format!("more than {} columns", t.feature),
            got: format!("{} columns", x.ncols()),
        });
    }
    let mut out = Array2::zeros((x.nrows(), thresholds.len()));
    for (mut column, threshold) in out.axis_iter_mut(Axis(1)).zip(thresholds) {
        column.zip_mut_with(&x.column(threshold.feature), |o, &v| {
            *o = if threshold.is_active(v) { 1.0 } else { 0.0 };
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use proptest::prelude::*;

    #[test]
    fn test_binarize_column_order_follows_thresholds() {
        let x = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]];
        let thresholds = [
            Threshold::new(1, 20.0),
            Threshold::new(0, 1.5),
            Threshold::new(0, 3.0),
        ];
        let m = binarize(x.view(), &thresholds).unwrap();
        assert_eq!(
            m,
            array![[1.0, 1.0, 1.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]]
        );
    }

    #[test]
    fn test_binarize_no_thresholds() {
        let x = array![[1.0], [2.0]];
        let m = binarize(x.view(), &[]).unwrap();
        assert_eq!(m.dim(), (2, 0));
    }

    #[test]
    fn test_binarize_no_rows() {
        let x = Array2::<f64>::zeros((0, 2));
        let m = binarize(x.view(), &[Threshold::new(1, 0.0)]).unwrap();
        assert_eq!(m.dim(), (0, 1));
    }

    #[test]
    fn test_binarize_rejects_out_of_range_feature() {
        let x = array![[1.0, 2.0]];
        let result = binarize(x.view(), &[Threshold::new(0, 1.0), Threshold::new(2, 0.0)]);
        assert!(matches!(result, Err(BinarizerError::InvalidShape { .. })));
    }

    proptest! {
        #[test]
        fn prop_binarize_matches_rule(
            rows in prop::collection::vec(prop::collection::vec(-100.0f64..100.0, 3), 1..20),
            cuts in prop::collection::vec((0usize..3, -100.0f64..100.0), 0..10),
        ) {
            let n = rows.len();
            let x = Array2::from_shape_vec((n, 3), rows.concat()).unwrap();
            let thresholds: Vec<Threshold> =
                cuts.iter().map(|&(f, v)| Threshold::new(f, v)).collect();

            let m = binarize(x.view(), &thresholds).unwrap();
            prop_assert_eq!(m.dim(), (n, thresholds.len()));
            for ((i, k), &val) in m.indexed_iter() {
                let t = thresholds[k];
                let expected = if x[[i, t.feature]] <= t.value { 1.0 } else { 0.0 };
                prop_assert_eq!(val, expected);
            }
        }
    }
}
