//! Parameter layout bookkeeping for the three-block parameter vector.
//!
//! Every flat parameter vector handled by the estimation engine is the
//! fixed-order concatenation `(mean, volatility, distribution)`. This module
//! owns the offsets and is the single place a vector is decomposed; the
//! likelihood evaluator, the covariance estimator, and result reshaping all
//! go through [`ParamLayout::split`] so a wrong split point cannot silently
//! diverge between call sites.

use crate::multivariate::errors::{MvError, MvResult};
use ndarray::{ArrayView1, Axis};

/// Immutable block sizes for one model instance.
///
/// Computed once at model construction from the three sub-models' parameter
/// counts; changing a sub-model means rebuilding the model, never mutating
/// the layout in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamLayout {
    /// Mean-model parameter count.
    pub mean: usize,
    /// Volatility-process parameter count.
    pub volatility: usize,
    /// Distribution parameter count.
    pub distribution: usize,
}

impl ParamLayout {
    pub fn new(mean: usize, volatility: usize, distribution: usize) -> Self {
        Self { mean, volatility, distribution }
    }

    /// Total parameter count across all three blocks.
    pub fn total(&self) -> usize {
        self.mean + self.volatility + self.distribution
    }

    /// Split a flat vector into `(mean, volatility, distribution)` views.
    ///
    /// Pure and total over vectors of length [`ParamLayout::total`];
    /// any other length is a hard error.
    ///
    /// # Errors
    /// [`MvError::ParamLengthMismatch`] when `params.len() != total()`.
    pub fn split<'a>(
        &self, params: ArrayView1<'a, f64>,
    ) -> MvResult<(ArrayView1<'a, f64>, ArrayView1<'a, f64>, ArrayView1<'a, f64>)> {
        if params.len() != self.total() {
            return Err(MvError::ParamLengthMismatch {
                expected: self.total(),
                found: params.len(),
            });
        }
        let (mean, rest) = params.split_at(Axis(0), self.mean);
        let (volatility, distribution) = rest.split_at(Axis(0), self.volatility);
        Ok((mean, volatility, distribution))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    #[test]
    // Purpose
    // -------
    // Splitting and re-concatenating must recover the original vector
    // exactly, for non-trivial and degenerate block sizes alike.
    fn split_concatenate_round_trips_exactly() {
        for &(m, v, d) in &[(2usize, 3usize, 1usize), (0, 3, 0), (0, 0, 0), (4, 0, 2)] {
            let layout = ParamLayout::new(m, v, d);
            let params = Array1::from_iter((0..layout.total()).map(|i| i as f64 + 0.5));

            let (mp, vp, dp) = layout.split(params.view()).expect("lengths match");
            assert_eq!(mp.len(), m);
            assert_eq!(vp.len(), v);
            assert_eq!(dp.len(), d);

            let mut rebuilt = Vec::with_capacity(layout.total());
            rebuilt.extend(mp.iter().copied());
            rebuilt.extend(vp.iter().copied());
            rebuilt.extend(dp.iter().copied());
            assert_eq!(Array1::from(rebuilt), params);
        }
    }

    #[test]
    fn wrong_length_is_a_hard_error() {
        let layout = ParamLayout::new(1, 2, 0);
        match layout.split(array![1.0, 2.0].view()) {
            Err(MvError::ParamLengthMismatch { expected: 3, found: 2 }) => {}
            other => panic!("Expected ParamLengthMismatch, got {other:?}"),
        }
    }
}
