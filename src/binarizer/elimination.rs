//! Greedy backward elimination of indicator columns.
//!
//! The ensemble is fit on the full indicator matrix and its training score becomes
//! the floor. Columns are then dropped one at a time, least important first, with
//! a re-fit after every drop, until a drop pushes the score below the floor, only
//! one column would remain, or the ensemble reports no importances. The last
//! dropped threshold is then appended back to the end of the list.

use super::threshold::Threshold;
use crate::ensemble::ThresholdOracle;
use crate::error::BinarizerError;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use tracing::{debug, trace};

/// Why the elimination loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The last removal dropped the score below the floor.
    ScoreRegressed,
    /// `thresholds.len() - 1` removals were made (or none were possible).
    IterationCap,
    /// The ensemble reported an empty importance vector.
    ImportancesExhausted,
}

/// Result of [`eliminate_columns`].
#[derive(Clone, Debug)]
pub struct Elimination {
    /// Surviving thresholds; the last removed one, if any, sits at the end.
    pub retained: Vec<Threshold>,
    /// Score of the ensemble fit on the full indicator matrix.
    pub base_score: f64,
    /// Score measured right after the last removal, `None` if nothing was removed.
    pub last_score: Option<f64>,
    /// Score after the last removal that stayed at or above the floor.
    pub last_accepted_score: f64,
    pub removals: usize,
    pub stop_reason: StopReason,
}

struct RemovedColumn {
    threshold: Threshold,
    values: Array1<f64>,
}

/// Prune `thresholds` (aligned with the columns of `m`) by refitting `estimator`.
///
/// Each iteration costs one full ensemble fit.
pub fn eliminate_columns<E: ThresholdOracle>(
    mut m: Array2<f64>,
    y: ArrayView1<'_, f64>,
    mut thresholds: Vec<Threshold>,
    estimator: &mut E,
) -> Result<Elimination, BinarizerError> {
    if m.ncols() != thresholds.len() {
        return Err(BinarizerError::InvalidShape {
            expected: format!("{} indicator columns", thresholds.len()),
            got: format!("{} indicator columns", m.ncols()),
        });
    }

    estimator.fit(m.view(), y)?;
    let base_score = estimator.score(m.view(), y)?;
    debug!(base_score, n_columns = m.ncols(), "column elimination started");

    let max_iter = thresholds.len().saturating_sub(1);
    let mut current_score = f64::INFINITY;
    let mut last_accepted_score = base_score;
    let mut iteration = 0;
    let mut last_removed: Option<RemovedColumn> = None;

    while current_score >= base_score
        && iteration < max_iter
        && !estimator.feature_importances().is_empty()
    {
        let importances = estimator.feature_importances();
        if importances.len() != m.ncols() {
            return Err(BinarizerError::InvalidShape {
                expected: format!("{} feature importances", m.ncols()),
                got: format!("{} feature importances", importances.len()),
            });
        }
        let idx = argmin(importances);
        let threshold = thresholds.remove(idx);
        last_removed = Some(RemovedColumn {
            threshold,
            values: m.column(idx).to_owned(),
        });
        m.remove_index(Axis(1), idx);

        estimator.fit(m.view(), y)?;
        current_score = estimator.score(m.view(), y)?;
        iteration += 1;
        if current_score >= base_score {
            last_accepted_score = current_score;
        }
        trace!(
            iteration,
            column = idx,
            feature = threshold.feature,
            value = threshold.value,
            score = current_score,
            remaining = thresholds.len(),
            "removed least important column"
        );
    }

    let stop_reason = if current_score < base_score {
        StopReason::ScoreRegressed
    } else if iteration >= max_iter {
        StopReason::IterationCap
    } else {
        StopReason::ImportancesExhausted
    };

    let last_score = last_removed.as_ref().map(|_| current_score);
    if let Some(removed) = last_removed {
        debug!(
            feature = removed.threshold.feature,
            value = removed.threshold.value,
            activations = removed.values.sum(),
            ?stop_reason,
            "restoring last removed threshold"
        );
        thresholds.push(removed.threshold);
    }

    Ok(Elimination {
        retained: thresholds,
        base_score,
        last_score,
        last_accepted_score,
        removals: iteration,
        stop_reason,
    })
}

/// Index of the smallest value; ties go to the first occurrence.
fn argmin(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v < values[best] {
            best = i;
        }
    }
    best
}
