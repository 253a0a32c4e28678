//! Reference error distributions: multivariate normal and standardized
//! multivariate Student-t.
//!
//! Both evaluate per-observation log-likelihood contributions against a
//! covariance path via Cholesky factorization; non-positive-definite steps
//! contribute −∞ rather than failing, per the evaluator's degradation
//! contract.

use crate::multivariate::core::linalg::chol_logdet_quad;
use crate::multivariate::traits::Distribution;
use crate::optimization::constrained::types::LinearInequalities;
use ndarray::{Array1, Array2, Array3, ArrayView1, Axis};
use statrs::function::gamma::ln_gamma;

const LN_2PI: f64 = 1.837_877_066_409_345_3;

/// Lower admissible degrees of freedom for the Student-t (variance exists
/// strictly above 2; the margin keeps the optimizer off the boundary).
const STUDENT_T_NU_MIN: f64 = 2.05;

/// Upper bound on degrees of freedom; beyond this the t is numerically
/// Gaussian.
const STUDENT_T_NU_MAX: f64 = 500.0;

/// Multivariate normal errors with no shape parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultivariateNormal {
    nvar: usize,
}

impl MultivariateNormal {
    pub fn new(nvar: usize) -> Self {
        Self { nvar }
    }
}

impl Distribution for MultivariateNormal {
    fn num_params(&self) -> usize {
        0
    }

    fn parameter_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn description(&self) -> String {
        "Multivariate Normal".to_string()
    }

    fn loglikelihood_by_obs(
        &self, _params: ArrayView1<f64>, resids: &Array2<f64>, sigma: &Array3<f64>,
    ) -> Array1<f64> {
        let nobs = resids.nrows();
        let d = self.nvar as f64;
        let mut out = Array1::zeros(nobs);
        for t in 0..nobs {
            out[t] = match chol_logdet_quad(sigma.index_axis(Axis(0), t), resids.row(t)) {
                Some((logdet, quad)) => -0.5 * (d * LN_2PI + logdet + quad),
                None => f64::NEG_INFINITY,
            };
        }
        out
    }

    fn starting_values(&self, _std_resids: &Array2<f64>) -> Array1<f64> {
        Array1::zeros(0)
    }

    fn constraints(&self) -> LinearInequalities {
        LinearInequalities::none(0)
    }

    fn bounds(&self, _std_resids: &Array2<f64>) -> Vec<(f64, f64)> {
        Vec::new()
    }
}

/// Standardized multivariate Student-t errors with one shape parameter ν.
///
/// Standardized means unit covariance: the density is scaled by `ν − 2` so
/// that the covariance path retains its interpretation for any admissible
/// ν.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultivariateStudentT {
    nvar: usize,
}

impl MultivariateStudentT {
    pub fn new(nvar: usize) -> Self {
        Self { nvar }
    }
}

impl Distribution for MultivariateStudentT {
    fn num_params(&self) -> usize {
        1
    }

    fn parameter_names(&self) -> Vec<String> {
        vec!["nu".to_string()]
    }

    fn description(&self) -> String {
        "Multivariate Student's t".to_string()
    }

    fn loglikelihood_by_obs(
        &self, params: ArrayView1<f64>, resids: &Array2<f64>, sigma: &Array3<f64>,
    ) -> Array1<f64> {
        let nobs = resids.nrows();
        if params.len() != 1 {
            return Array1::from_elem(nobs, f64::NEG_INFINITY);
        }
        let nu = params[0];
        if !nu.is_finite() || nu <= 2.0 {
            return Array1::from_elem(nobs, f64::NEG_INFINITY);
        }

        let d = self.nvar as f64;
        let constant = ln_gamma(0.5 * (nu + d))
            - ln_gamma(0.5 * nu)
            - 0.5 * d * ((nu - 2.0) * std::f64::consts::PI).ln();

        let mut out = Array1::zeros(nobs);
        for t in 0..nobs {
            out[t] = match chol_logdet_quad(sigma.index_axis(Axis(0), t), resids.row(t)) {
                Some((logdet, quad)) => {
                    constant - 0.5 * logdet - 0.5 * (nu + d) * (1.0 + quad / (nu - 2.0)).ln()
                }
                None => f64::NEG_INFINITY,
            };
        }
        out
    }

    /// Moment-match ν to the pooled excess kurtosis of the standardized
    /// residuals; near-Gaussian tails fall back to a moderate default.
    fn starting_values(&self, std_resids: &Array2<f64>) -> Array1<f64> {
        let (nobs, nvar) = (std_resids.nrows(), std_resids.ncols());
        if nobs == 0 || nvar == 0 {
            return Array1::from_elem(1, 8.0);
        }

        let mut kurtosis_sum = 0.0;
        for j in 0..nvar {
            let col = std_resids.index_axis(Axis(1), j);
            let m2 = col.iter().map(|v| v * v).sum::<f64>() / nobs as f64;
            let m4 = col.iter().map(|v| v.powi(4)).sum::<f64>() / nobs as f64;
            if m2 > 0.0 {
                kurtosis_sum += m4 / (m2 * m2);
            } else {
                kurtosis_sum += 3.0;
            }
        }
        let kurtosis = kurtosis_sum / nvar as f64;

        let nu = if kurtosis > 3.25 {
            ((4.0 * kurtosis - 6.0) / (kurtosis - 3.0)).clamp(2.6, 50.0)
        } else {
            8.0
        };
        Array1::from_elem(1, nu)
    }

    fn constraints(&self) -> LinearInequalities {
        LinearInequalities {
            a: Array2::from_elem((1, 1), 1.0),
            b: Array1::from_elem(1, STUDENT_T_NU_MIN),
        }
    }

    fn bounds(&self, _std_resids: &Array2<f64>) -> Vec<(f64, f64)> {
        vec![(STUDENT_T_NU_MIN, STUDENT_T_NU_MAX)]
    }
}
