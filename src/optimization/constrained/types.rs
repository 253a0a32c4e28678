//! constrained::types — shared numeric aliases and constraint containers.
//!
//! Purpose
//! -------
//! Centralize the core numeric types used by the constrained minimizer. By
//! defining these in one place, the rest of the optimization code can stay
//! agnostic to `ndarray` and Argmin generics and can more easily evolve if
//! the backend changes.
//!
//! Conventions
//! -----------
//! - [`Params`] is treated conceptually as a column vector with length equal
//!   to the number of free parameters.
//! - Linear inequality constraints are expressed as `A·x − b ≥ 0`, one row
//!   per constraint. A zero-row system means "unconstrained".
//! - [`PENALTY_COST`] is the cost reported for infeasible or non-finite
//!   evaluations; the solver treats such points as arbitrarily bad without
//!   ever seeing a non-finite number.

use crate::optimization::errors::{SolverError, SolverResult};
use ndarray::{Array1, Array2, ArrayView1};

/// Parameter vector for constrained minimization.
///
/// Alias for `ndarray::Array1<f64>`, used as the canonical parameter type
/// throughout the optimizer.
pub type Params = Array1<f64>;

/// Scalar objective value used by the optimizer.
pub type Cost = f64;

/// Cost substituted for infeasible or non-finite objective evaluations.
///
/// Large enough to dominate any realistic negative log-likelihood while
/// staying far away from `f64` overflow in simplex arithmetic.
pub const PENALTY_COST: f64 = 1e10;

/// Default simplex standard-deviation tolerance for Nelder-Mead.
pub const DEFAULT_SD_TOLERANCE: f64 = 1e-8;

/// Default iteration cap for the constrained solver.
pub const DEFAULT_MAX_ITERS: usize = 1000;

/// Relative perturbation used when building the initial simplex.
pub const SIMPLEX_STEP: f64 = 0.05;

/// Absolute perturbation used for starting values at (or near) zero.
pub const SIMPLEX_ZERO_STEP: f64 = 0.00025;

/// Linear inequality system `A·x − b ≥ 0`.
///
/// `a` is `num_rows × num_params`, `b` has one entry per row. Rows never
/// couple parameters owned by different sub-models; block-diagonal assembly
/// happens in the model layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearInequalities {
    /// Constraint loading matrix.
    pub a: Array2<f64>,
    /// Constraint offsets.
    pub b: Array1<f64>,
}

impl LinearInequalities {
    /// Construct a validated constraint system.
    ///
    /// # Errors
    /// Returns [`SolverError::ConstraintRowMismatch`] when `a` and `b`
    /// disagree on the number of rows.
    pub fn new(a: Array2<f64>, b: Array1<f64>) -> SolverResult<Self> {
        if a.nrows() != b.len() {
            return Err(SolverError::ConstraintRowMismatch { rows: a.nrows(), offsets: b.len() });
        }
        Ok(Self { a, b })
    }

    /// An unconstrained system over `num_params` parameters (zero rows).
    pub fn none(num_params: usize) -> Self {
        Self { a: Array2::zeros((0, num_params)), b: Array1::zeros(0) }
    }

    /// Number of constraint rows.
    pub fn num_rows(&self) -> usize {
        self.a.nrows()
    }

    /// Number of parameters the system applies to.
    pub fn num_params(&self) -> usize {
        self.a.ncols()
    }

    /// Whether `A·x − b ≥ 0` holds for every row.
    ///
    /// A zero-row system is vacuously satisfied.
    pub fn satisfied(&self, x: ArrayView1<f64>) -> bool {
        if self.num_rows() == 0 {
            return true;
        }
        let slack = self.a.dot(&x) - &self.b;
        slack.iter().all(|&s| s >= 0.0)
    }

    /// Whether `A·x − b > 0` holds strictly for every row.
    pub fn satisfied_strict(&self, x: ArrayView1<f64>) -> bool {
        if self.num_rows() == 0 {
            return true;
        }
        let slack = self.a.dot(&x) - &self.b;
        slack.iter().all(|&s| s > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // A zero-row system must accept any point, including an empty one.
    fn zero_row_system_is_vacuously_satisfied() {
        let cons = LinearInequalities::none(2);
        assert_eq!(cons.num_rows(), 0);
        assert!(cons.satisfied(array![1.0, -5.0].view()));
        assert!(cons.satisfied_strict(array![1.0, -5.0].view()));
    }

    #[test]
    // Purpose
    // -------
    // Strict and non-strict satisfaction must differ exactly on the boundary
    // of the feasible region.
    //
    // Given
    // -----
    // - The single constraint x0 - 1 >= 0.
    //
    // Expect
    // ------
    // - x0 = 1 satisfies the weak form but not the strict one.
    fn boundary_point_satisfies_weak_but_not_strict() {
        let cons =
            LinearInequalities::new(array![[1.0, 0.0]], array![1.0]).expect("valid system");

        assert!(cons.satisfied(array![1.0, 0.0].view()));
        assert!(!cons.satisfied_strict(array![1.0, 0.0].view()));
        assert!(cons.satisfied_strict(array![1.5, 0.0].view()));
        assert!(!cons.satisfied(array![0.5, 0.0].view()));
    }

    #[test]
    // Purpose
    // -------
    // Row-count disagreement between `a` and `b` must be rejected.
    fn mismatched_rows_are_rejected() {
        let result = LinearInequalities::new(Array2::zeros((2, 3)), Array1::zeros(1));
        match result {
            Err(SolverError::ConstraintRowMismatch { rows: 2, offsets: 1 }) => {}
            other => panic!("Expected ConstraintRowMismatch, got {other:?}"),
        }
    }
}
