//! Collaborator capability traits for multivariate volatility estimation.
//!
//! Purpose
//! -------
//! Define the three pluggable sub-model surfaces the estimation engine
//! composes: a mean model producing residuals, a volatility process
//! producing a conditional covariance path, and an error distribution
//! producing log-likelihoods. The engine itself contains no mean,
//! volatility, or distribution math; everything model-specific flows through
//! these traits.
//!
//! Optional capabilities
//! ---------------------
//! Optional methods return [`Support`], a tagged outcome with a
//! "declines support" branch, instead of raising an error. Callers branch
//! on the outcome: a declined closed-form fit falls through to the general
//! optimization path, a declined R² becomes NaN on the result. Mandatory
//! methods have no such escape hatch.
//!
//! Degradation contract
//! --------------------
//! The likelihood evaluator must be callable with arbitrary parameter
//! vectors, including infeasible ones, an unbounded number of times.
//! `compute_covariance` and the log-likelihood methods therefore must not
//! panic for finite inputs: bad parameters may produce poor values (NaN,
//! −∞ log-likelihood contributions), which the optimizer rejects through
//! its own penalty guard.

use crate::multivariate::errors::MvResult;
use crate::optimization::constrained::types::LinearInequalities;
use ndarray::{Array1, Array2, Array3, ArrayView1, ArrayView2};

/// Outcome of an optional collaborator capability.
///
/// `Declined` is a normal, non-error signal: the collaborator does not
/// provide this capability and the caller should use its fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum Support<T> {
    Available(T),
    Declined,
}

impl<T> Support<T> {
    /// Convert to an `Option`, discarding the declined marker.
    pub fn available(self) -> Option<T> {
        match self {
            Support::Available(value) => Some(value),
            Support::Declined => None,
        }
    }

    pub fn is_declined(&self) -> bool {
        matches!(self, Support::Declined)
    }
}

/// Parameter-covariance estimator selection.
///
/// `Robust` is the Bollerslev-Wooldridge sandwich estimator, which does not
/// assume the information-matrix equality; `Classic` inverts the Hessian
/// alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CovType {
    Robust,
    Classic,
}

/// Conditional mean model: turns observations into residuals.
pub trait MeanModel {
    /// Number of mean parameters.
    fn num_params(&self) -> usize;

    /// Ordered parameter names for the mean block.
    fn parameter_names(&self) -> Vec<String>;

    /// Short human-readable model name for result snapshots.
    fn description(&self) -> String;

    /// Model residuals at `params`.
    ///
    /// `regressors` carries exogenous data for models that use it; plain
    /// models ignore it. Must degrade gracefully for arbitrary finite
    /// `params`.
    fn residuals(
        &self, params: ArrayView1<f64>, y: ArrayView2<f64>, regressors: Option<ArrayView2<f64>>,
    ) -> Array2<f64>;

    /// Default starting values for the mean block.
    ///
    /// Contract for closed-form-backed models: return the non-covariance
    /// leading parameters, or an empty vector when all parameters are
    /// covariance-only.
    fn starting_values(&self, y: ArrayView2<f64>) -> Array1<f64>;

    /// Linear inequality constraints on the mean block (may be zero rows).
    fn constraints(&self) -> LinearInequalities;

    /// One `(lower, upper)` pair per mean parameter.
    fn bounds(&self) -> Vec<(f64, f64)>;

    /// Closed-form estimate of the full parameter vector under constant
    /// covariance and fixed normal errors.
    ///
    /// Only consulted when the plugged volatility process declares closed
    /// form and the distribution has no free parameters (or the model has no
    /// parameters at all). Declining sends the fit down the general
    /// optimization path.
    fn closed_form_fit(&self, y: ArrayView2<f64>, cov_type: CovType) -> Support<Array1<f64>> {
        let _ = (y, cov_type);
        Support::Declined
    }

    /// Coefficient of determination at the fitted mean parameters.
    fn r_squared(&self, params: ArrayView1<f64>, y: ArrayView2<f64>) -> Support<f64> {
        let _ = (params, y);
        Support::Declined
    }
}

/// Conditional covariance process.
pub trait VolatilityProcess {
    /// Number of volatility parameters.
    fn num_params(&self) -> usize;

    /// Ordered parameter names for the volatility block.
    fn parameter_names(&self) -> Vec<String>;

    /// Short human-readable process name for result snapshots.
    fn description(&self) -> String;

    /// Whether parameters can be estimated in closed form (jointly with a
    /// closed-form mean model and a fixed distribution).
    fn closed_form(&self) -> bool;

    /// Fill `sigma` (one `nvar × nvar` matrix per step along axis 0) with
    /// the conditional covariance path implied by `params`.
    ///
    /// `backcast` seeds the recursion before the first observation. Must
    /// degrade gracefully for arbitrary finite `params`.
    fn compute_covariance(
        &self, params: ArrayView1<f64>, resids: &Array2<f64>, sigma: &mut Array3<f64>,
        backcast: &Array2<f64>,
    );

    /// Covariance-like seed for the pre-sample recursion state.
    fn backcast(&self, resids: &Array2<f64>) -> Array2<f64>;

    /// Default starting values computed from residuals.
    fn starting_values(&self, resids: &Array2<f64>) -> Array1<f64>;

    /// Loose per-step `(lower, upper)` variance bounds derived from the
    /// residual scale, one row per observation.
    fn variance_bounds(&self, resids: &Array2<f64>) -> Array2<f64>;

    /// Linear inequality constraints on the volatility block.
    fn constraints(&self) -> LinearInequalities;

    /// One `(lower, upper)` pair per volatility parameter.
    fn bounds(&self, resids: &Array2<f64>) -> Vec<(f64, f64)>;
}

/// Error distribution over standardized residuals.
pub trait Distribution {
    /// Number of distribution shape parameters.
    fn num_params(&self) -> usize;

    /// Ordered parameter names for the distribution block.
    fn parameter_names(&self) -> Vec<String>;

    /// Short human-readable distribution name for result snapshots.
    fn description(&self) -> String;

    /// Log-likelihood contribution of each observation given the residuals
    /// and the covariance path.
    ///
    /// Non-positive-definite covariance steps and infeasible shape
    /// parameters must map to −∞ contributions, never panics.
    fn loglikelihood_by_obs(
        &self, params: ArrayView1<f64>, resids: &Array2<f64>, sigma: &Array3<f64>,
    ) -> Array1<f64>;

    /// Aggregate log-likelihood; by construction the sum of the
    /// per-observation contributions. Implementations may override with a
    /// fused computation but must preserve that identity.
    fn loglikelihood(
        &self, params: ArrayView1<f64>, resids: &Array2<f64>, sigma: &Array3<f64>,
    ) -> f64 {
        self.loglikelihood_by_obs(params, resids, sigma).sum()
    }

    /// Default starting values computed from standardized residuals.
    fn starting_values(&self, std_resids: &Array2<f64>) -> Array1<f64>;

    /// Linear inequality constraints on the distribution block.
    fn constraints(&self) -> LinearInequalities;

    /// One `(lower, upper)` pair per distribution parameter.
    fn bounds(&self, std_resids: &Array2<f64>) -> Vec<(f64, f64)>;
}

/// Check that a collaborator's declared parameter count matches the bound
/// data dimension where applicable.
///
/// The trait-typed slots make wrong-role plug-ins unrepresentable; what can
/// still go wrong at configuration time is a dimension disagreement, which
/// model constructors surface through this helper.
pub fn check_dimension(what: &'static str, expected: usize, found: usize) -> MvResult<()> {
    if expected != found {
        return Err(crate::multivariate::errors::MvError::DimensionMismatch {
            what,
            expected,
            found,
        });
    }
    Ok(())
}
