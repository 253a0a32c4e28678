//! Observation containers for multivariate volatility models.
//!
//! Purpose
//! -------
//! Provide a small, validated container for a rectangular multivariate time
//! series together with estimation-window arithmetic. Centralizing the
//! input checks here lets the estimation code assume clean, finite data.
//!
//! Invariants & assumptions
//! ------------------------
//! - The observation matrix is `nobs × nvar` with `nobs ≥ 1` and
//!   `nvar ≥ 1`, and every entry is finite.
//! - Estimation windows follow half-open `[first, last)` semantics on row
//!   indices; `resolve_window` is the single place window bounds are
//!   checked.

use crate::multivariate::errors::{MvError, MvResult};
use ndarray::{s, Array2, ArrayView2};

/// Validated `nobs × nvar` observation matrix.
///
/// Construction is the only validation point; downstream code relies on the
/// container invariants and does not re-check.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    y: Array2<f64>,
}

impl TimeSeries {
    /// Construct a validated series from raw observations.
    ///
    /// # Errors
    /// - [`MvError::EmptySample`] when the matrix has no rows or no columns.
    /// - [`MvError::NonFiniteObservation`] with the position of the first
    ///   NaN or infinite entry.
    pub fn new(y: Array2<f64>) -> MvResult<Self> {
        if y.nrows() == 0 || y.ncols() == 0 {
            return Err(MvError::EmptySample);
        }
        for ((row, col), &value) in y.indexed_iter() {
            if !value.is_finite() {
                return Err(MvError::NonFiniteObservation { row, col, value });
            }
        }
        Ok(Self { y })
    }

    /// Number of time steps.
    pub fn nobs(&self) -> usize {
        self.y.nrows()
    }

    /// Number of variables per time step.
    pub fn nvar(&self) -> usize {
        self.y.ncols()
    }

    /// Full observation matrix.
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.y.view()
    }

    /// Rows `[first, last)` of the observation matrix.
    ///
    /// Callers must pass a window previously validated by
    /// [`resolve_window`]; out-of-range indices panic like any slice.
    pub fn window(&self, first: usize, last: usize) -> ArrayView2<'_, f64> {
        self.y.slice(s![first..last, ..])
    }
}

/// Resolve the estimation window from optional user bounds and `hold_back`.
///
/// The window starts at `max(first_obs, hold_back)` and ends at `last_obs`
/// (defaulting to the full sample).
///
/// # Errors
/// Returns [`MvError::InvalidSampleWindow`] when the resolved window is
/// empty or extends past the sample.
pub fn resolve_window(
    nobs: usize, hold_back: usize, first_obs: Option<usize>, last_obs: Option<usize>,
) -> MvResult<(usize, usize)> {
    let first = first_obs.unwrap_or(0).max(hold_back);
    let last = last_obs.unwrap_or(nobs);
    if last > nobs || first >= last {
        return Err(MvError::InvalidSampleWindow { first, last, nobs });
    }
    Ok((first, last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn valid_matrix_is_accepted() {
        let ts = TimeSeries::new(array![[1.0, 2.0], [3.0, 4.0]]).expect("valid data");
        assert_eq!(ts.nobs(), 2);
        assert_eq!(ts.nvar(), 2);
    }

    #[test]
    fn empty_matrix_is_rejected() {
        match TimeSeries::new(Array2::zeros((0, 2))) {
            Err(MvError::EmptySample) => {}
            other => panic!("Expected EmptySample, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_entry_is_located() {
        match TimeSeries::new(array![[1.0, 2.0], [f64::NAN, 4.0]]) {
            Err(MvError::NonFiniteObservation { row: 1, col: 0, .. }) => {}
            other => panic!("Expected NonFiniteObservation at (1, 0), got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Window resolution must honor hold_back, default to the full sample,
    // and reject empty or out-of-range windows.
    fn window_resolution_honors_bounds() {
        assert_eq!(resolve_window(100, 0, None, None).unwrap(), (0, 100));
        assert_eq!(resolve_window(100, 10, None, None).unwrap(), (10, 100));
        assert_eq!(resolve_window(100, 0, Some(5), Some(50)).unwrap(), (5, 50));
        // hold_back dominates an earlier first_obs
        assert_eq!(resolve_window(100, 10, Some(5), None).unwrap(), (10, 100));

        assert!(resolve_window(100, 0, Some(50), Some(50)).is_err());
        assert!(resolve_window(100, 0, None, Some(101)).is_err());
    }
}
