//! Small dense linear-algebra helpers shared across the estimation engine.
//!
//! Purpose
//! -------
//! Collect the numerics the engine needs around covariance matrices: packing
//! and unpacking of symmetric matrices (`vech`/`unvech`), uncentered sample
//! covariance, a numerically stable symmetric inverse matrix square root,
//! and a Cholesky-based log-determinant/quadratic-form helper for Gaussian
//! and Student-t likelihoods. Conversions between `ndarray` and `nalgebra`
//! happen here and nowhere else.
//!
//! Conventions
//! -----------
//! - `vech` packs the lower triangle row by row: (0,0), (1,0), (1,1),
//!   (2,0), ... Distinct entries of an `n × n` symmetric matrix number
//!   `n(n+1)/2`.
//! - Eigenvalues at or below [`EIGEN_EPS`] are treated as numerically zero
//!   and skipped when forming inverse-root directions, so near-singular
//!   covariance matrices degrade gracefully instead of exploding.

use crate::multivariate::errors::{MvError, MvResult};
use nalgebra::{Cholesky, DMatrix, DVector};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Eigenvalues with magnitude at or below this are treated as zero.
pub const EIGEN_EPS: f64 = 1e-10;

/// Number of distinct entries of an `nvar × nvar` symmetric matrix.
pub fn distinct_entries(nvar: usize) -> usize {
    nvar * (nvar + 1) / 2
}

/// Pack the lower triangle of a square matrix row by row.
pub fn vech(m: ArrayView2<f64>) -> Array1<f64> {
    let n = m.nrows();
    let mut out = Vec::with_capacity(distinct_entries(n));
    for i in 0..n {
        for j in 0..=i {
            out.push(m[[i, j]]);
        }
    }
    Array1::from(out)
}

/// Rebuild a symmetric `n × n` matrix from its packed lower triangle.
///
/// # Errors
/// [`MvError::DimensionMismatch`] when `v.len() != n(n+1)/2`.
pub fn unvech(v: ArrayView1<f64>, n: usize) -> MvResult<Array2<f64>> {
    if v.len() != distinct_entries(n) {
        return Err(MvError::DimensionMismatch {
            what: "packed covariance",
            expected: distinct_entries(n),
            found: v.len(),
        });
    }
    let mut out = Array2::zeros((n, n));
    let mut idx = 0;
    for i in 0..n {
        for j in 0..=i {
            out[[i, j]] = v[idx];
            out[[j, i]] = v[idx];
            idx += 1;
        }
    }
    Ok(out)
}

/// Uncentered second-moment matrix `(1/n) Σ_t x_t x_tᵀ`.
///
/// This is the maximum-likelihood covariance estimate for zero-mean errors;
/// residuals are already demeaned by their mean model, so no further
/// centering is applied.
pub fn second_moment(x: ArrayView2<f64>) -> Array2<f64> {
    let (nobs, nvar) = (x.nrows(), x.ncols());
    let mut out = Array2::zeros((nvar, nvar));
    for t in 0..nobs {
        let row = x.row(t);
        for i in 0..nvar {
            for j in 0..=i {
                out[[i, j]] += row[i] * row[j];
            }
        }
    }
    let scale = 1.0 / nobs.max(1) as f64;
    for i in 0..nvar {
        for j in 0..=i {
            let v = out[[i, j]] * scale;
            out[[i, j]] = v;
            out[[j, i]] = v;
        }
    }
    out
}

/// Column-covariance of a matrix of per-observation rows, with the usual
/// `n − 1` denominator.
pub fn covariance_of_rows(x: &Array2<f64>) -> Array2<f64> {
    let (nobs, k) = (x.nrows(), x.ncols());
    let means = x.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(k));
    let mut out = Array2::zeros((k, k));
    for t in 0..nobs {
        let row = x.row(t);
        for i in 0..k {
            for j in 0..=i {
                out[[i, j]] += (row[i] - means[i]) * (row[j] - means[j]);
            }
        }
    }
    let denom = if nobs > 1 { (nobs - 1) as f64 } else { 1.0 };
    for i in 0..k {
        for j in 0..=i {
            let v = out[[i, j]] / denom;
            out[[i, j]] = v;
            out[[j, i]] = v;
        }
    }
    out
}

/// Symmetric inverse matrix square root via eigendecomposition.
///
/// Eigenvalues at or below [`EIGEN_EPS`] contribute nothing (pseudo-inverse
/// behavior), so near-singular inputs produce a finite result instead of
/// amplified noise. The input is assumed symmetric; only its lower triangle
/// is read through the `nalgebra` bridge.
pub fn symmetric_invroot(m: ArrayView2<f64>) -> Array2<f64> {
    let n = m.nrows();
    let eigen = to_dmatrix(m).symmetric_eigen();
    let q = eigen.eigenvectors;
    let lambda = eigen.eigenvalues;
    let mut out = Array2::zeros((n, n));
    for k in 0..n {
        if lambda[k] > EIGEN_EPS {
            let w = 1.0 / lambda[k].sqrt();
            for i in 0..n {
                for j in 0..n {
                    out[[i, j]] += w * q[(i, k)] * q[(j, k)];
                }
            }
        }
    }
    out
}

/// Standardize residuals per time step: `z_t = ε_t · Σ_t^{-1/2}`.
///
/// `sigma` holds one `nvar × nvar` covariance matrix per step along axis 0.
pub fn standardize_residuals(resids: ArrayView2<f64>, sigma: &ndarray::Array3<f64>) -> Array2<f64> {
    let (nobs, nvar) = (resids.nrows(), resids.ncols());
    let mut out = Array2::zeros((nobs, nvar));
    for t in 0..nobs {
        let invroot = symmetric_invroot(sigma.index_axis(Axis(0), t));
        let row = resids.row(t);
        for j in 0..nvar {
            let mut acc = 0.0;
            for i in 0..nvar {
                acc += row[i] * invroot[[i, j]];
            }
            out[[t, j]] = acc;
        }
    }
    out
}

/// Cholesky log-determinant and quadratic form `xᵀ Σ⁻¹ x`.
///
/// Returns `None` when `sigma` is not positive definite, letting likelihood
/// code degrade to a −∞ contribution instead of failing.
pub fn chol_logdet_quad(sigma: ArrayView2<f64>, x: ArrayView1<f64>) -> Option<(f64, f64)> {
    let n = sigma.nrows();
    let chol = Cholesky::new(to_dmatrix(sigma))?;
    let l = chol.l();
    let mut logdet = 0.0;
    for i in 0..n {
        let d = l[(i, i)];
        if d <= 0.0 || !d.is_finite() {
            return None;
        }
        logdet += d.ln();
    }
    let rhs = DVector::from_iterator(n, x.iter().copied());
    let z = l.solve_lower_triangular(&rhs)?;
    Some((2.0 * logdet, z.norm_squared()))
}

/// Copy a square `ndarray` view into a `nalgebra::DMatrix`, column by column.
pub fn to_dmatrix(m: ArrayView2<f64>) -> DMatrix<f64> {
    let (rows, cols) = (m.nrows(), m.ncols());
    let mut out = DMatrix::<f64>::zeros(rows, cols);
    for j in 0..cols {
        for i in 0..rows {
            out[(i, j)] = m[[i, j]];
        }
    }
    out
}

/// Copy a `nalgebra::DMatrix` back into an `ndarray` matrix.
pub fn to_ndarray(m: &DMatrix<f64>) -> Array2<f64> {
    let (rows, cols) = m.shape();
    let mut out = Array2::zeros((rows, cols));
    for i in 0..rows {
        for j in 0..cols {
            out[[i, j]] = m[(i, j)];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover the packing round-trip, moment matrices, the inverse
    // square root identity, and the Cholesky helper against hand-computed
    // values. Higher-level behavior (standardization inside a fit) is covered
    // by the estimation tests.
    // -------------------------------------------------------------------------

    #[test]
    fn vech_unvech_round_trips() {
        let m = array![[4.0, 1.0, 0.5], [1.0, 3.0, 0.2], [0.5, 0.2, 2.0]];
        let packed = vech(m.view());
        assert_eq!(packed.len(), distinct_entries(3));
        assert_eq!(packed, array![4.0, 1.0, 3.0, 0.5, 0.2, 2.0]);

        let rebuilt = unvech(packed.view(), 3).expect("length matches");
        assert_eq!(rebuilt, m);
    }

    #[test]
    fn unvech_rejects_wrong_length() {
        match unvech(array![1.0, 2.0].view(), 3) {
            Err(MvError::DimensionMismatch { .. }) => {}
            other => panic!("Expected DimensionMismatch, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // M^{-1/2} · M · M^{-1/2} must recover the identity for a well-conditioned
    // symmetric positive definite matrix.
    fn invroot_satisfies_defining_identity() {
        let m = array![[2.0, 0.3], [0.3, 1.0]];
        let r = symmetric_invroot(m.view());

        let product = r.dot(&m).dot(&r);
        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!(
                    (product[[i, j]] - expected).abs() < 1e-10,
                    "entry ({i}, {j}) = {}",
                    product[[i, j]]
                );
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // A singular matrix must produce a finite pseudo-inverse root rather
    // than NaN or infinity.
    fn invroot_of_singular_matrix_is_finite() {
        let m = array![[1.0, 1.0], [1.0, 1.0]];
        let r = symmetric_invroot(m.view());
        assert!(r.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn second_moment_matches_hand_computation() {
        let x = array![[1.0, 0.0], [0.0, 2.0]];
        let m = second_moment(x.view());
        assert_eq!(m, array![[0.5, 0.0], [0.0, 2.0]]);
    }

    #[test]
    // Purpose
    // -------
    // The Cholesky helper must reproduce ln|Σ| and the Mahalanobis quadratic
    // for a diagonal matrix, and decline a non-PD input.
    fn chol_helper_matches_diagonal_case() {
        let sigma = array![[4.0, 0.0], [0.0, 1.0]];
        let x = array![2.0, 3.0];

        let (logdet, quad) = chol_logdet_quad(sigma.view(), x.view()).expect("PD input");
        assert!((logdet - 4.0_f64.ln()).abs() < 1e-12);
        assert!((quad - (1.0 + 9.0)).abs() < 1e-12);

        let bad = array![[1.0, 2.0], [2.0, 1.0]];
        assert!(chol_logdet_quad(bad.view(), x.view()).is_none());
    }

    #[test]
    // Purpose
    // -------
    // Standardizing with the true covariance must give residuals whose
    // second moment is close to the identity.
    fn standardization_whitens_residuals() {
        let sigma_step = array![[4.0, 0.0], [0.0, 9.0]];
        let resids = array![[2.0, 3.0], [-2.0, -3.0], [2.0, -3.0]];
        let mut sigma = Array3::zeros((3, 2, 2));
        for t in 0..3 {
            sigma.index_axis_mut(Axis(0), t).assign(&sigma_step);
        }

        let z = standardize_residuals(resids.view(), &sigma);

        for t in 0..3 {
            assert!((z[[t, 0]].abs() - 1.0).abs() < 1e-10);
            assert!((z[[t, 1]].abs() - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn covariance_of_rows_centers_columns() {
        let x = array![[1.0, 2.0], [3.0, 2.0], [5.0, 2.0]];
        let cov = covariance_of_rows(&x);
        assert!((cov[[0, 0]] - 4.0).abs() < 1e-12);
        assert_eq!(cov[[1, 1]], 0.0);
        assert_eq!(cov[[0, 1]], 0.0);
    }
}
