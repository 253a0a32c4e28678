//! Model container and fit orchestration.
//!
//! Purpose
//! -------
//! [`MultivariateModel`] binds the three collaborators and (optionally) a
//! data set, owns the immutable parameter layout and the cached backcast,
//! and drives estimation. `fit` is a two-path state machine:
//!
//! - **Closed-form path**: taken when the volatility process declares
//!   closed-form support and the distribution has no free parameters, or
//!   when the model has no parameters at all. Estimation is delegated to
//!   the mean model's closed-form capability; a declined capability falls
//!   through to the general path instead of failing.
//! - **General path**: sample adjustment, residuals at default starting
//!   values, backcast computation (cached for covariance estimation),
//!   residual standardization, constraint/bounds assembly, starting-value
//!   resolution, one priming likelihood call, constrained minimization, and
//!   result assembly.
//!
//! Both paths finish identically: residuals and the covariance path are
//! recomputed at the final parameters, R² is taken from the mean model
//! (NaN when declined), and outputs are reshaped to the original sample
//! length with NaN sentinels outside the estimation window so "not
//! estimated" is distinguishable from "estimated as zero".
//!
//! Warnings (infeasible starting values, optimizer non-convergence) are
//! collected on the result and logged unless suppressed; only configuration
//! errors and numerical singularities are fatal.

use crate::multivariate::constraints::{assemble_bounds, assemble_constraints};
use crate::multivariate::core::data::{resolve_window, TimeSeries};
use crate::multivariate::core::layout::ParamLayout;
use crate::multivariate::core::linalg::standardize_residuals;
use crate::multivariate::errors::{FitWarning, MvError, MvResult};
use crate::multivariate::likelihood::LikelihoodEvaluator;
use crate::multivariate::models::{distribution::MultivariateNormal, volatility::ConstantCovariance};
use crate::multivariate::starting::resolve_starting_values;
use crate::multivariate::traits::{
    check_dimension, CovType, Distribution, MeanModel, Support, VolatilityProcess,
};
use crate::optimization::constrained::{
    minimize, DisplayMode, FitProgress, SolveOptions, SolveOutcome,
};
use ndarray::{s, Array1, Array2, Array3};

/// Caller-facing options for one `fit` call.
#[derive(Debug, Clone)]
pub struct FitOptions {
    /// User-supplied starting values; validated and replaced with
    /// synthesized defaults (plus a warning) when infeasible.
    pub starting_values: Option<Array1<f64>>,
    /// Parameter-covariance flavor recorded on the result.
    pub cov_type: CovType,
    /// When `false`, recoverable warnings are recorded on the result but
    /// not logged.
    pub show_warning: bool,
    /// First observation to use (index into the original sample).
    pub first_obs: Option<usize>,
    /// One past the last observation to use.
    pub last_obs: Option<usize>,
    /// Solver termination tolerance.
    pub tol: Option<f64>,
    /// Solver iteration cap.
    pub max_iters: Option<usize>,
    /// Emit a progress line every `update_freq` iterations (0 = never).
    pub update_freq: usize,
    /// Final-summary display mode.
    pub disp: DisplayMode,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            starting_values: None,
            cov_type: CovType::Robust,
            show_warning: true,
            first_obs: None,
            last_obs: None,
            tol: None,
            max_iters: None,
            update_freq: 1,
            disp: DisplayMode::Final,
        }
    }
}

/// Immutable description of the model configuration at fit time.
///
/// The result snapshots names and descriptions, not live sub-model
/// references, so it stays valid however the model is used afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSnapshot {
    pub mean: String,
    pub volatility: String,
    pub distribution: String,
    pub parameter_names: Vec<String>,
    pub layout: ParamLayout,
}

/// Outcome of a `fit` call.
#[derive(Debug, Clone)]
pub struct FitResult {
    /// Fitted flat parameter vector in `(mean, volatility, distribution)`
    /// order.
    pub params: Array1<f64>,
    /// Log-likelihood at `params`.
    pub loglikelihood: f64,
    /// Mean-model R²; NaN when the mean model declines the capability.
    pub r_squared: f64,
    /// Residuals over the original sample length; NaN outside the window.
    pub resids: Array2<f64>,
    /// Conditional covariance path over the original sample length; NaN
    /// outside the window.
    pub covariance: Array3<f64>,
    /// Covariance flavor requested for parameter inference.
    pub cov_type: CovType,
    /// First observation actually used.
    pub fit_start: usize,
    /// One past the last observation actually used.
    pub fit_stop: usize,
    /// Solver diagnostics; `None` when the closed-form path was taken (or
    /// there was nothing to optimize).
    pub optimization: Option<SolveOutcome>,
    /// Recoverable conditions encountered during the fit.
    pub warnings: Vec<FitWarning>,
    /// Model configuration at fit time.
    pub snapshot: ModelSnapshot,
}

/// A conditional mean + conditional covariance + error distribution model
/// bound to (at most) one data set.
///
/// The parameter layout is computed once at construction; swapping a
/// sub-model means building a new model. Concurrent fits on one instance
/// are not supported: the cached backcast and the progress counters belong
/// to the in-flight fit.
pub struct MultivariateModel {
    pub(crate) y: Option<TimeSeries>,
    pub(crate) nvar: usize,
    pub(crate) mean: Box<dyn MeanModel>,
    pub(crate) volatility: Box<dyn VolatilityProcess>,
    pub(crate) distribution: Box<dyn Distribution>,
    pub(crate) hold_back: usize,
    pub(crate) layout: ParamLayout,
    pub(crate) backcast: Option<Array2<f64>>,
    pub(crate) fit_indices: Option<(usize, usize)>,
    pub(crate) progress: FitProgress,
}

impl MultivariateModel {
    /// Construct a model from collaborators and optional data.
    ///
    /// `volatility` defaults to [`ConstantCovariance`] and `distribution`
    /// to [`MultivariateNormal`] when not supplied. `nvar` is taken from
    /// the data when bound; a dataless model needs it explicitly.
    ///
    /// # Errors
    /// - [`MvError::NoData`] when neither `y` nor `nvar` is provided.
    /// - [`MvError::DimensionMismatch`] when `y` and `nvar` disagree.
    pub fn new(
        y: Option<TimeSeries>, nvar: Option<usize>, mean: Box<dyn MeanModel>,
        volatility: Option<Box<dyn VolatilityProcess>>,
        distribution: Option<Box<dyn Distribution>>, hold_back: Option<usize>,
    ) -> MvResult<Self> {
        let nvar = match (&y, nvar) {
            (Some(data), Some(n)) => {
                check_dimension("observation columns", n, data.nvar())?;
                n
            }
            (Some(data), None) => data.nvar(),
            (None, Some(n)) => n,
            (None, None) => return Err(MvError::NoData),
        };

        let volatility =
            volatility.unwrap_or_else(|| Box::new(ConstantCovariance::new(nvar)));
        let distribution =
            distribution.unwrap_or_else(|| Box::new(MultivariateNormal::new(nvar)));

        let layout = ParamLayout::new(
            mean.num_params(),
            volatility.num_params(),
            distribution.num_params(),
        );

        Ok(Self {
            y,
            nvar,
            mean,
            volatility,
            distribution,
            hold_back: hold_back.unwrap_or(0),
            layout,
            backcast: None,
            fit_indices: None,
            progress: FitProgress::new(),
        })
    }

    /// Number of variables per observation.
    pub fn nvar(&self) -> usize {
        self.nvar
    }

    /// The immutable three-block parameter layout.
    pub fn layout(&self) -> ParamLayout {
        self.layout
    }

    /// The backcast cached by the most recent fit or covariance call.
    pub fn backcast(&self) -> Option<&Array2<f64>> {
        self.backcast.as_ref()
    }

    /// Estimation window used by the most recent fit.
    pub fn fit_indices(&self) -> Option<(usize, usize)> {
        self.fit_indices
    }

    /// Progress counters for the in-flight (or most recent) fit.
    pub fn progress(&self) -> &FitProgress {
        &self.progress
    }

    /// All parameter names in block order.
    pub fn parameter_names(&self) -> Vec<String> {
        let mut names = self.mean.parameter_names();
        names.extend(self.volatility.parameter_names());
        names.extend(self.distribution.parameter_names());
        names
    }

    /// Estimate the model by maximum likelihood.
    ///
    /// # Errors
    /// - [`MvError::NoData`] when no data is bound.
    /// - [`MvError::InvalidSampleWindow`] for an out-of-range window.
    /// - Optimizer *setup* failures ([`MvError::Solver`]); non-convergence
    ///   is a warning, not an error.
    pub fn fit(&mut self, opts: &FitOptions) -> MvResult<FitResult> {
        let y_ts = self.y.as_ref().ok_or(MvError::NoData)?;
        let nobs_total = y_ts.nobs();
        self.progress.reset();

        let (first, last) =
            resolve_window(nobs_total, self.hold_back, opts.first_obs, opts.last_obs)?;
        let y = y_ts.window(first, last).to_owned();
        self.fit_indices = Some((first, last));

        let mut warnings: Vec<FitWarning> = Vec::new();
        let total = self.layout.total();

        let has_closed_form =
            (self.volatility.closed_form() && self.distribution.num_params() == 0) || total == 0;
        if has_closed_form {
            if let Support::Available(params) = self.mean.closed_form_fit(y.view(), opts.cov_type)
            {
                if params.len() == total {
                    log::debug!("estimating through the closed-form path");
                    return self.finish_fit(params, &y, first, last, None, warnings, opts);
                }
                // The closed form does not describe this sub-model
                // combination; continue with the general path.
            }
        }

        // (2)-(6): residuals at default starting values, covariance buffer,
        // backcast, volatility starting values, standardized residuals.
        let mean_sv = self.mean.starting_values(y.view());
        let resids = self.mean.residuals(mean_sv.view(), y.view(), None);
        let nobs = resids.nrows();
        let mut sigma = Array3::zeros((nobs, self.nvar, self.nvar));

        let backcast = self.volatility.backcast(&resids);
        self.backcast = Some(backcast.clone());

        let sv_volatility = self.volatility.starting_values(&resids);
        self.volatility.compute_covariance(sv_volatility.view(), &resids, &mut sigma, &backcast);
        let std_resids = standardize_residuals(resids.view(), &sigma);

        // (7): constraints and bounds in block order.
        let constraints = assemble_constraints(
            &self.mean.constraints(),
            &self.volatility.constraints(),
            &self.distribution.constraints(),
            &self.layout,
        );
        let bounds = assemble_bounds(
            self.mean.bounds(),
            self.volatility.bounds(&resids),
            self.distribution.bounds(&std_resids),
        );

        // (8): starting values, user-supplied or synthesized.
        let mut synthesized = Vec::with_capacity(total);
        synthesized.extend(mean_sv.iter().copied());
        synthesized.extend(sv_volatility.iter().copied());
        synthesized.extend(self.distribution.starting_values(&std_resids).iter().copied());
        let synthesized = Array1::from(synthesized);

        let resolved = resolve_starting_values(
            opts.starting_values.as_ref(),
            synthesized,
            &constraints,
            &bounds,
        );
        if let Some(warning) = resolved.warning {
            if opts.show_warning {
                log::warn!("{warning}");
            }
            warnings.push(warning);
        }

        // (9)-(11): priming call, constrained minimization, convergence
        // bookkeeping. A model with nothing to optimize skips the solver.
        let outcome = if total > 0 {
            let evaluator = LikelihoodEvaluator::new(
                self.mean.as_ref(),
                self.volatility.as_ref(),
                self.distribution.as_ref(),
                self.layout,
                &y,
                sigma,
                &backcast,
                self.progress.clone(),
            );
            let _ = evaluator.neg_loglikelihood(&resolved.values);

            let solve_opts =
                SolveOptions::new(opts.tol, opts.max_iters, opts.disp, opts.update_freq)?;
            Some(minimize(
                |p| evaluator.neg_loglikelihood(p),
                &resolved.values,
                &bounds,
                &constraints,
                &solve_opts,
                &self.progress,
            )?)
        } else {
            None
        };

        let params = match &outcome {
            Some(out) => out.params.clone(),
            None => resolved.values,
        };
        if let Some(out) = &outcome {
            if !out.converged() {
                let warning = FitWarning::Convergence {
                    status: out.status,
                    message: out.message.clone(),
                };
                if opts.show_warning {
                    log::warn!("{warning}");
                }
                warnings.push(warning);
            }
        }

        // (12)-(14) happen in finish_fit, shared with the closed-form path.
        self.finish_fit(params, &y, first, last, outcome, warnings, opts)
    }

    /// Recompute residuals/covariance at the final parameters, attach R²
    /// and diagnostics, and reshape outputs to the original sample length.
    #[allow(clippy::too_many_arguments)]
    fn finish_fit(
        &mut self, params: Array1<f64>, y: &Array2<f64>, first: usize, last: usize,
        optimization: Option<SolveOutcome>, warnings: Vec<FitWarning>, opts: &FitOptions,
    ) -> MvResult<FitResult> {
        let nvar = self.nvar;
        let (mp, vp, dp) = self.layout.split(params.view())?;

        let resids = self.mean.residuals(mp, y.view(), None);
        let nobs = resids.nrows();

        // The closed-form path never computed a backcast; cache one now so
        // covariance estimation reuses the same seed either way.
        let backcast = match &self.backcast {
            Some(seed) => seed.clone(),
            None => {
                let seed = self.volatility.backcast(&resids);
                self.backcast = Some(seed.clone());
                seed
            }
        };

        let mut covariance = Array3::zeros((nobs, nvar, nvar));
        self.volatility.compute_covariance(vp, &resids, &mut covariance, &backcast);
        let loglikelihood = self.distribution.loglikelihood(dp, &resids, &covariance);

        let r_squared = match self.mean.r_squared(mp, y.view()) {
            Support::Available(value) => value,
            Support::Declined => f64::NAN,
        };

        let nobs_total = self.y.as_ref().ok_or(MvError::NoData)?.nobs();
        let mut resids_full = Array2::from_elem((nobs_total, nvar), f64::NAN);
        resids_full.slice_mut(s![first..last, ..]).assign(&resids);
        let mut cov_full = Array3::from_elem((nobs_total, nvar, nvar), f64::NAN);
        cov_full.slice_mut(s![first..last, .., ..]).assign(&covariance);

        let snapshot = ModelSnapshot {
            mean: self.mean.description(),
            volatility: self.volatility.description(),
            distribution: self.distribution.description(),
            parameter_names: self.parameter_names(),
            layout: self.layout,
        };

        Ok(FitResult {
            params,
            loglikelihood,
            r_squared,
            resids: resids_full,
            covariance: cov_full,
            cov_type: opts.cov_type,
            fit_start: first,
            fit_stop: last,
            optimization,
            warnings,
            snapshot,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multivariate::models::mean::ZeroMean;
    use ndarray::array;

    fn small_series() -> TimeSeries {
        TimeSeries::new(array![
            [0.4, -0.3],
            [-0.2, 0.5],
            [0.1, 0.2],
            [-0.5, -0.4],
            [0.3, 0.1],
            [-0.1, -0.2]
        ])
        .expect("valid data")
    }

    #[test]
    // Purpose
    // -------
    // Construction must infer nvar from the data, reject a contradictory
    // explicit nvar, and fail cleanly with neither.
    fn construction_resolves_nvar() {
        let model = MultivariateModel::new(
            Some(small_series()),
            None,
            Box::new(ZeroMean::new(2)),
            None,
            None,
            None,
        )
        .expect("valid model");
        assert_eq!(model.nvar(), 2);
        // Defaults: constant covariance (3 params) + normal (0 params).
        assert_eq!(model.layout().total(), 3);

        let mismatch = MultivariateModel::new(
            Some(small_series()),
            Some(3),
            Box::new(ZeroMean::new(3)),
            None,
            None,
            None,
        );
        assert!(matches!(mismatch, Err(MvError::DimensionMismatch { .. })));

        let nothing =
            MultivariateModel::new(None, None, Box::new(ZeroMean::new(2)), None, None, None);
        assert!(matches!(nothing, Err(MvError::NoData)));
    }

    #[test]
    fn fit_without_data_is_a_configuration_error() {
        let mut model =
            MultivariateModel::new(None, Some(2), Box::new(ZeroMean::new(2)), None, None, None)
                .expect("dataless model is constructible");

        match model.fit(&FitOptions::default()) {
            Err(MvError::NoData) => {}
            other => panic!("Expected NoData, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_window_is_rejected() {
        let mut model = MultivariateModel::new(
            Some(small_series()),
            None,
            Box::new(ZeroMean::new(2)),
            None,
            None,
            None,
        )
        .expect("valid model");

        let opts = FitOptions { last_obs: Some(100), ..FitOptions::default() };
        match model.fit(&opts) {
            Err(MvError::InvalidSampleWindow { .. }) => {}
            other => panic!("Expected InvalidSampleWindow, got {other:?}"),
        }
    }
}
