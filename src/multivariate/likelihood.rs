//! Composite negative log-likelihood evaluation.
//!
//! Purpose
//! -------
//! Chain the three collaborators into one objective over the flat parameter
//! vector: split the vector by layout, ask the mean model for residuals,
//! have the volatility process fill the covariance-path buffer in place, and
//! hand residuals plus covariance path to the distribution. The negation
//! fixes the sign convention for the minimizing optimizer.
//!
//! Degradation & bookkeeping
//! -------------------------
//! The evaluator is invoked an unbounded number of times with arbitrary
//! parameter vectors, so it never errors and never panics for finite
//! inputs: a vector of the wrong length evaluates to NaN, infeasible
//! parameters surface as NaN or infinite likelihoods, and the optimizer's
//! penalty guard rejects them. Every evaluation increments the caller-owned
//! progress counters and records the latest value; this bookkeeping is
//! diagnostic only.
//!
//! The covariance-path buffer is preallocated once per fit and reused
//! across evaluations through a `RefCell`, keeping the hot loop
//! allocation-light.

use crate::multivariate::core::layout::ParamLayout;
use crate::multivariate::traits::{Distribution, MeanModel, VolatilityProcess};
use crate::optimization::constrained::progress::FitProgress;
use ndarray::{Array1, Array2, Array3};
use std::cell::RefCell;

/// Borrow-based evaluator wiring the three collaborators to one objective.
///
/// Constructed fresh per `fit` (and per covariance estimation); the
/// covariance buffer, backcast, and observation window are fixed for the
/// evaluator's lifetime while the parameter vector varies per call.
pub struct LikelihoodEvaluator<'a> {
    mean: &'a dyn MeanModel,
    volatility: &'a dyn VolatilityProcess,
    distribution: &'a dyn Distribution,
    layout: ParamLayout,
    y: &'a Array2<f64>,
    sigma: RefCell<Array3<f64>>,
    backcast: &'a Array2<f64>,
    progress: FitProgress,
}

impl<'a> LikelihoodEvaluator<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mean: &'a dyn MeanModel, volatility: &'a dyn VolatilityProcess,
        distribution: &'a dyn Distribution, layout: ParamLayout, y: &'a Array2<f64>,
        sigma: Array3<f64>, backcast: &'a Array2<f64>, progress: FitProgress,
    ) -> Self {
        Self { mean, volatility, distribution, layout, y, sigma: RefCell::new(sigma), backcast, progress }
    }

    /// Aggregate negative log-likelihood at `params`.
    ///
    /// Returns NaN (never errors) for vectors of the wrong length.
    pub fn neg_loglikelihood(&self, params: &Array1<f64>) -> f64 {
        let value = match self.layout.split(params.view()) {
            Ok((mp, vp, dp)) => {
                let resids = self.mean.residuals(mp, self.y.view(), None);
                let mut sigma = self.sigma.borrow_mut();
                self.volatility.compute_covariance(vp, &resids, &mut sigma, self.backcast);
                -self.distribution.loglikelihood(dp, &resids, &sigma)
            }
            Err(_) => f64::NAN,
        };
        self.progress.record_eval(value);
        value
    }

    /// Per-observation negative log-likelihood contributions at `params`.
    ///
    /// The sum of the returned vector equals the aggregate value up to
    /// floating-point accumulation. Wrong-length vectors produce an
    /// all-NaN vector of the window length.
    pub fn neg_loglikelihood_by_obs(&self, params: &Array1<f64>) -> Array1<f64> {
        let contributions = match self.layout.split(params.view()) {
            Ok((mp, vp, dp)) => {
                let resids = self.mean.residuals(mp, self.y.view(), None);
                let mut sigma = self.sigma.borrow_mut();
                self.volatility.compute_covariance(vp, &resids, &mut sigma, self.backcast);
                self.distribution.loglikelihood_by_obs(dp, &resids, &sigma).mapv(|v| -v)
            }
            Err(_) => Array1::from_elem(self.y.nrows(), f64::NAN),
        };
        self.progress.record_eval(contributions.sum());
        contributions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multivariate::core::linalg::{second_moment, vech};
    use crate::multivariate::models::{
        distribution::MultivariateNormal, mean::ZeroMean, volatility::ConstantCovariance,
    };
    use crate::multivariate::traits::{Distribution as _, VolatilityProcess as _};
    use ndarray::{array, Array3};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests pin the evaluator contract: the sign-flip invariant against
    // the distribution collaborator, agreement between aggregate and
    // per-observation modes, graceful NaN degradation, and progress counting.
    // -------------------------------------------------------------------------

    fn small_setup() -> (Array2<f64>, Array1<f64>, Array2<f64>) {
        let y = array![[0.4, -0.3], [-0.2, 0.5], [0.1, 0.2], [-0.5, -0.4]];
        let params = vech(second_moment(y.view()).view());
        let backcast = second_moment(y.view());
        (y, params, backcast)
    }

    #[test]
    // Purpose
    // -------
    // The evaluator's aggregate value must be exactly the negative of the
    // distribution collaborator's log-likelihood for the same inputs.
    fn aggregate_value_is_negated_distribution_loglikelihood() {
        // Arrange
        let (y, params, backcast) = small_setup();
        let mean = ZeroMean::new(2);
        let vol = ConstantCovariance::new(2);
        let dist = MultivariateNormal::new(2);
        let layout = ParamLayout::new(0, 3, 0);
        let evaluator = LikelihoodEvaluator::new(
            &mean,
            &vol,
            &dist,
            layout,
            &y,
            Array3::zeros((4, 2, 2)),
            &backcast,
            FitProgress::new(),
        );

        // Act
        let nllf = evaluator.neg_loglikelihood(&params);

        // Direct distribution call on the same covariance path.
        let mut sigma = Array3::zeros((4, 2, 2));
        vol.compute_covariance(params.view(), &y, &mut sigma, &backcast);
        let no_shape = Array1::<f64>::zeros(0);
        let llf = dist.loglikelihood(no_shape.view(), &y, &sigma);

        // Assert
        assert!(nllf.is_finite());
        assert!((nllf + llf).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // The per-observation contributions must sum to the aggregate value for
    // identical inputs.
    fn per_observation_sum_matches_aggregate() {
        let (y, params, backcast) = small_setup();
        let mean = ZeroMean::new(2);
        let vol = ConstantCovariance::new(2);
        let dist = MultivariateNormal::new(2);
        let evaluator = LikelihoodEvaluator::new(
            &mean,
            &vol,
            &dist,
            ParamLayout::new(0, 3, 0),
            &y,
            Array3::zeros((4, 2, 2)),
            &backcast,
            FitProgress::new(),
        );

        let by_obs = evaluator.neg_loglikelihood_by_obs(&params);
        let aggregate = evaluator.neg_loglikelihood(&params);

        assert_eq!(by_obs.len(), 4);
        assert!((by_obs.sum() - aggregate).abs() < 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // A wrong-length parameter vector must produce NaN, never a panic or an
    // error, so the optimizer can reject it through its penalty guard.
    fn wrong_length_parameters_degrade_to_nan() {
        let (y, _, backcast) = small_setup();
        let mean = ZeroMean::new(2);
        let vol = ConstantCovariance::new(2);
        let dist = MultivariateNormal::new(2);
        let evaluator = LikelihoodEvaluator::new(
            &mean,
            &vol,
            &dist,
            ParamLayout::new(0, 3, 0),
            &y,
            Array3::zeros((4, 2, 2)),
            &backcast,
            FitProgress::new(),
        );

        let bad = array![1.0];
        assert!(evaluator.neg_loglikelihood(&bad).is_nan());
        assert!(evaluator.neg_loglikelihood_by_obs(&bad).iter().all(|v| v.is_nan()));
    }

    #[test]
    // Purpose
    // -------
    // Every evaluation must increment the shared progress counter and record
    // the latest value.
    fn evaluations_are_counted() {
        let (y, params, backcast) = small_setup();
        let mean = ZeroMean::new(2);
        let vol = ConstantCovariance::new(2);
        let dist = MultivariateNormal::new(2);
        let progress = FitProgress::new();
        let evaluator = LikelihoodEvaluator::new(
            &mean,
            &vol,
            &dist,
            ParamLayout::new(0, 3, 0),
            &y,
            Array3::zeros((4, 2, 2)),
            &backcast,
            progress.clone(),
        );

        let first = evaluator.neg_loglikelihood(&params);
        let _ = evaluator.neg_loglikelihood_by_obs(&params);

        assert_eq!(progress.evaluations(), 2);
        assert!((progress.last_value() - first).abs() < 1e-10);
    }
}
