//! Parameter covariance estimation via numerical derivatives.
//!
//! Purpose
//! -------
//! Estimate the covariance of fitted parameters from the curvature of the
//! per-observation-aggregated negative log-likelihood. The classic estimate
//! inverts the sample-normalized numerical Hessian; the robust
//! (Bollerslev-Wooldridge) estimate sandwiches the empirical covariance of
//! numerical per-observation scores between two copies of the inverted
//! Hessian.
//!
//! The backcast cached by the fit is reused when present, so covariance
//! estimation sees exactly the same pre-sample seed as the fit that
//! produced the parameters; it is computed (and cached) only when absent.
//!
//! A singular Hessian is a hard error: no parameter covariance can be
//! produced and the condition must reach the caller.

use crate::multivariate::core::data::resolve_window;
use crate::multivariate::core::linalg::{covariance_of_rows, to_dmatrix, to_ndarray};
use crate::multivariate::errors::{MvError, MvResult};
use crate::multivariate::estimation::MultivariateModel;
use crate::multivariate::likelihood::LikelihoodEvaluator;
use crate::optimization::finite_diff::{approx_hessian, approx_scores};
use finitediff::FiniteDiff;
use ndarray::{Array1, Array2, Array3};

impl MultivariateModel {
    /// Covariance of `params` from numerical derivatives of the likelihood.
    ///
    /// `robust = true` applies the sandwich (outer-product-of-scores)
    /// correction; `robust = false` returns the classic inverse-Hessian
    /// estimate.
    ///
    /// # Errors
    /// - [`MvError::NoData`] when no data is bound.
    /// - [`MvError::ParamLengthMismatch`] when `params` does not match the
    ///   model layout.
    /// - [`MvError::SingularHessian`] when the numerical Hessian cannot be
    ///   inverted.
    /// - Derivative validation failures ([`MvError::Solver`]).
    pub fn compute_param_cov(
        &mut self, params: &Array1<f64>, robust: bool,
    ) -> MvResult<Array2<f64>> {
        let y_ts = self.y.as_ref().ok_or(MvError::NoData)?;
        if params.len() != self.layout.total() {
            return Err(MvError::ParamLengthMismatch {
                expected: self.layout.total(),
                found: params.len(),
            });
        }

        // Use the fit window when a fit has run; the full (hold_back
        // adjusted) sample otherwise.
        let (first, last) = match self.fit_indices {
            Some(window) => window,
            None => resolve_window(y_ts.nobs(), self.hold_back, None, None)?,
        };
        let y = y_ts.window(first, last).to_owned();

        let mean_sv = self.mean.starting_values(y.view());
        let resids = self.mean.residuals(mean_sv.view(), y.view(), None);
        let nobs = resids.nrows();

        let backcast = match &self.backcast {
            Some(seed) => seed.clone(),
            None => {
                let seed = self.volatility.backcast(&resids);
                self.backcast = Some(seed.clone());
                seed
            }
        };

        let evaluator = LikelihoodEvaluator::new(
            self.mean.as_ref(),
            self.volatility.as_ref(),
            self.distribution.as_ref(),
            self.layout,
            &y,
            Array3::zeros((nobs, self.nvar, self.nvar)),
            &backcast,
            self.progress.clone(),
        );

        let objective = |p: &Array1<f64>| evaluator.neg_loglikelihood(p);
        let gradient = |p: &Array1<f64>| p.forward_diff(&objective);

        let mut hessian = approx_hessian(&gradient, params).map_err(MvError::from)?;
        hessian.mapv_inplace(|v| v / nobs as f64);

        let inv_hessian = to_dmatrix(hessian.view())
            .try_inverse()
            .ok_or(MvError::SingularHessian)?;
        let inv_hessian = to_ndarray(&inv_hessian);

        if robust {
            let by_obs = |p: &Array1<f64>| evaluator.neg_loglikelihood_by_obs(p);
            let scores = approx_scores(&by_obs, params).map_err(MvError::from)?;
            let score_cov = covariance_of_rows(&scores);
            let sandwich = inv_hessian.dot(&score_cov).dot(&inv_hessian);
            Ok(sandwich.mapv(|v| v / nobs as f64))
        } else {
            Ok(inv_hessian.mapv(|v| v / nobs as f64))
        }
    }
}
