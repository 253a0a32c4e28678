//! finite_diff — finite-difference gradient, Hessian, and score helpers.
//!
//! Purpose
//! -------
//! Provide finite-difference derivative approximations around a parameter
//! vector, together with validation and symmetry cleanup, so that the rest
//! of the crate can request numerical derivatives without depending directly
//! on the `finitediff` API. No analytic derivatives are used anywhere.
//!
//! Key behaviors
//! -------------
//! - Forward-difference gradients of a scalar objective with post-hoc
//!   validation via [`approx_gradient`].
//! - Central-difference Hessians built from a gradient map, falling back to
//!   forward differences when validation fails, via [`approx_hessian`]; the
//!   result is symmetrized in place.
//! - Per-observation score matrices (`nobs × num_params`) from a
//!   vector-valued objective via [`approx_scores`], using explicit forward
//!   differences so the row/column orientation is fixed by construction.
//!
//! Conventions
//! -----------
//! - Derivatives are taken with respect to the flat parameter vector; any
//!   block structure is handled by higher layers.
//! - Failures are surfaced as [`SolverError`] values; these helpers never
//!   panic for finite inputs.

use crate::optimization::{
    constrained::types::Params,
    errors::{SolverError, SolverResult},
};
use finitediff::FiniteDiff;
use ndarray::{Array1, Array2};

/// Square root of machine epsilon, the forward-difference step scale.
const ROOT_EPS: f64 = 1.490_116_119_384_765_6e-8;

/// Forward-difference gradient of a scalar objective at `x`.
///
/// # Errors
/// - [`SolverError::GradientDimMismatch`] when the result has the wrong
///   length (should not occur with a well-behaved objective).
/// - [`SolverError::InvalidGradient`] when any element is NaN or infinite.
pub fn approx_gradient<F: Fn(&Params) -> f64>(f: &F, x: &Params) -> SolverResult<Array1<f64>> {
    let grad = x.forward_diff(f);
    validate_gradient(&grad, x.len())?;
    Ok(grad)
}

/// Finite-difference Hessian of a gradient map at `x`, validated and
/// symmetrized.
///
/// Central differences are attempted first; any validation failure (shape or
/// finiteness) causes an automatic fallback to forward differences, whose
/// validation result is the one surfaced.
///
/// # Errors
/// - [`SolverError::HessianDimMismatch`] when the fallback Hessian has the
///   wrong shape.
/// - [`SolverError::InvalidHessian`] when the fallback Hessian contains
///   non-finite entries.
pub fn approx_hessian<G: Fn(&Params) -> Array1<f64>>(
    g: &G, x: &Params,
) -> SolverResult<Array2<f64>> {
    let dim = x.len();
    let mut central = x.central_hessian(g);
    match validate_hessian(&central, dim) {
        Ok(()) => {
            symmetrize(&mut central);
            Ok(central)
        }
        Err(_) => {
            let mut forward = x.forward_hessian(g);
            validate_hessian(&forward, dim)?;
            symmetrize(&mut forward);
            Ok(forward)
        }
    }
}

/// Forward-difference Jacobian of a per-observation objective at `x`.
///
/// Row `t` of the result holds the score of observation `t`, column `j` the
/// derivative with respect to parameter `j`. The step for parameter `j` is
/// scaled by `max(1, |x_j|)`.
///
/// # Errors
/// - [`SolverError::ScoreDimMismatch`] when the objective changes its output
///   length between evaluations.
/// - [`SolverError::InvalidScore`] when any entry is NaN or infinite.
pub fn approx_scores<F: Fn(&Params) -> Array1<f64>>(
    f: &F, x: &Params,
) -> SolverResult<Array2<f64>> {
    let base = f(x);
    let nobs = base.len();
    let dim = x.len();
    let mut scores = Array2::<f64>::zeros((nobs, dim));
    for j in 0..dim {
        let step = ROOT_EPS * x[j].abs().max(1.0);
        let mut shifted = x.clone();
        shifted[j] += step;
        let bumped = f(&shifted);
        if bumped.len() != nobs {
            return Err(SolverError::ScoreDimMismatch { expected: nobs, found: bumped.len() });
        }
        for t in 0..nobs {
            scores[[t, j]] = (bumped[t] - base[t]) / step;
        }
    }
    for ((row, col), &value) in scores.indexed_iter() {
        if !value.is_finite() {
            return Err(SolverError::InvalidScore { row, col, value });
        }
    }
    Ok(scores)
}

// ---- Helper methods ----

/// Validate a gradient vector against dimension and finiteness.
fn validate_gradient(grad: &Array1<f64>, dim: usize) -> SolverResult<()> {
    if grad.len() != dim {
        return Err(SolverError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(SolverError::InvalidGradient { index, value });
        }
    }
    Ok(())
}

/// Validate the shape and entries of a Hessian matrix.
fn validate_hessian(hessian: &Array2<f64>, dim: usize) -> SolverResult<()> {
    if hessian.nrows() != dim || hessian.ncols() != dim {
        return Err(SolverError::HessianDimMismatch {
            expected: dim,
            found: (hessian.nrows(), hessian.ncols()),
        });
    }
    for ((row, col), &value) in hessian.indexed_iter() {
        if !value.is_finite() {
            return Err(SolverError::InvalidHessian { row, col, value });
        }
    }
    Ok(())
}

/// Replace each off-diagonal pair with its average, leaving the diagonal
/// untouched.
fn symmetrize(hess: &mut Array2<f64>) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Gradient and Hessian approximations for simple quadratics with known
    //   analytic derivatives.
    // - Validation failures for non-finite outputs.
    // - Score-matrix orientation for a vector objective with known Jacobian.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The FD gradient of f(x) = x·x at (1, 2) must approximate (2, 4).
    fn gradient_of_quadratic_matches_analytic() {
        let f = |x: &Params| x.dot(x);
        let x = array![1.0, 2.0];

        let grad = approx_gradient(&f, &x).expect("gradient should succeed");

        assert_eq!(grad.len(), 2);
        assert!((grad[0] - 2.0).abs() < 1e-5);
        assert!((grad[1] - 4.0).abs() < 1e-5);
    }

    #[test]
    // Purpose
    // -------
    // A NaN objective must surface as InvalidGradient, not a panic.
    fn non_finite_objective_yields_invalid_gradient() {
        let f = |_: &Params| f64::NAN;
        let x = array![0.0, 1.0];

        match approx_gradient(&f, &x) {
            Err(SolverError::InvalidGradient { .. }) => {}
            other => panic!("Expected InvalidGradient, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // The Hessian built from the gradient map g(x) = 2x must be close to
    // 2·I and exactly symmetric after cleanup.
    fn hessian_of_quadratic_is_symmetric_and_correct() {
        let g = |x: &Params| x.mapv(|v| 2.0 * v);
        let x = array![1.0, -1.0];

        let hess = approx_hessian(&g, &x).expect("Hessian should succeed");

        assert_eq!(hess.shape(), &[2, 2]);
        assert_eq!(hess[[0, 1]], hess[[1, 0]]);
        assert!((hess[[0, 0]] - 2.0).abs() < 1e-4);
        assert!((hess[[1, 1]] - 2.0).abs() < 1e-4);
        assert!(hess[[0, 1]].abs() < 1e-4);
    }

    #[test]
    // Purpose
    // -------
    // A gradient map that returns NaN must fail both FD schemes and surface
    // InvalidHessian.
    fn non_finite_gradient_map_yields_invalid_hessian() {
        let g = |_: &Params| array![f64::NAN];
        let x = array![0.0];

        match approx_hessian(&g, &x) {
            Err(SolverError::InvalidHessian { .. }) => {}
            other => panic!("Expected InvalidHessian, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // For the linear map f_t(x) = c_t · x the score matrix rows must equal
    // the coefficient vectors: rows index observations, columns parameters.
    //
    // Given
    // -----
    // - f(x) = [x0 + 2*x1, 3*x0].
    //
    // Expect
    // ------
    // - scores ≈ [[1, 2], [3, 0]] with shape (2 observations, 2 parameters).
    fn scores_have_observation_rows_and_parameter_columns() {
        let f = |x: &Params| array![x[0] + 2.0 * x[1], 3.0 * x[0]];
        let x = array![0.5, -0.5];

        let scores = approx_scores(&f, &x).expect("scores should succeed");

        assert_eq!(scores.shape(), &[2, 2]);
        assert!((scores[[0, 0]] - 1.0).abs() < 1e-5);
        assert!((scores[[0, 1]] - 2.0).abs() < 1e-5);
        assert!((scores[[1, 0]] - 3.0).abs() < 1e-5);
        assert!(scores[[1, 1]].abs() < 1e-5);
    }
}
