//! Reference volatility processes: constant covariance and RiskMetrics EWMA.
//!
//! `ConstantCovariance` is the closed-form-capable default; `EwmaCovariance`
//! is the simplest genuinely dynamic process (zero parameters, fixed
//! smoothing) and exists so the general optimization path stays reachable
//! without pulling in heavier recursions.

use crate::multivariate::core::linalg::{distinct_entries, second_moment, unvech, vech};
use crate::multivariate::errors::{MvError, MvResult};
use crate::multivariate::traits::VolatilityProcess;
use crate::optimization::constrained::types::LinearInequalities;
use ndarray::{Array1, Array2, Array3, ArrayView1, Axis};

/// Decay applied to leading observations when building the backcast seed.
const BACKCAST_DECAY: f64 = 0.94;

/// Maximum number of leading observations entering the backcast.
const BACKCAST_WINDOW: usize = 75;

/// Exponentially decayed average of leading residual outer products.
///
/// Shared seed construction for covariance recursions: weights `0.94^i`
/// over the first `min(nobs, 75)` observations, normalized to one.
pub fn decayed_backcast(resids: &Array2<f64>) -> Array2<f64> {
    let nvar = resids.ncols();
    let window = resids.nrows().min(BACKCAST_WINDOW);
    let mut out = Array2::zeros((nvar, nvar));
    if window == 0 {
        return out;
    }
    let mut weight = 1.0;
    let mut total = 0.0;
    for t in 0..window {
        let row = resids.row(t);
        for i in 0..nvar {
            for j in 0..nvar {
                out[[i, j]] += weight * row[i] * row[j];
            }
        }
        total += weight;
        weight *= BACKCAST_DECAY;
    }
    out.mapv_inplace(|v| v / total);
    out
}

/// Loose per-step variance bounds derived from the average residual scale.
fn scale_bounds(resids: &Array2<f64>) -> Array2<f64> {
    let nobs = resids.nrows();
    let moment = second_moment(resids.view());
    let nvar = moment.nrows();
    let mut avg_var = 0.0;
    for i in 0..nvar {
        avg_var += moment[[i, i]];
    }
    avg_var = (avg_var / nvar.max(1) as f64).max(f64::MIN_POSITIVE);

    let mut bounds = Array2::zeros((nobs, 2));
    for t in 0..nobs {
        bounds[[t, 0]] = avg_var / 1e6;
        bounds[[t, 1]] = avg_var * 1e6;
    }
    bounds
}

/// Time-invariant conditional covariance, parameterized by its packed lower
/// triangle.
///
/// The one process with closed-form support: combined with a closed-form
/// mean model and a fixed distribution, its parameters are plain sample
/// moments and the optimizer is never invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantCovariance {
    nvar: usize,
}

impl ConstantCovariance {
    pub fn new(nvar: usize) -> Self {
        Self { nvar }
    }
}

impl VolatilityProcess for ConstantCovariance {
    fn num_params(&self) -> usize {
        distinct_entries(self.nvar)
    }

    fn parameter_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.num_params());
        for i in 0..self.nvar {
            for j in 0..=i {
                names.push(format!("cov[{i},{j}]"));
            }
        }
        names
    }

    fn description(&self) -> String {
        "Constant Covariance".to_string()
    }

    fn closed_form(&self) -> bool {
        true
    }

    /// Every step receives the same unpacked matrix. A packed vector of the
    /// wrong length fills the path with NaN so the evaluator degrades
    /// instead of panicking.
    fn compute_covariance(
        &self, params: ArrayView1<f64>, _resids: &Array2<f64>, sigma: &mut Array3<f64>,
        _backcast: &Array2<f64>,
    ) {
        match unvech(params, self.nvar) {
            Ok(cov) => {
                for t in 0..sigma.shape()[0] {
                    sigma.index_axis_mut(Axis(0), t).assign(&cov);
                }
            }
            Err(_) => sigma.fill(f64::NAN),
        }
    }

    fn backcast(&self, resids: &Array2<f64>) -> Array2<f64> {
        decayed_backcast(resids)
    }

    fn starting_values(&self, resids: &Array2<f64>) -> Array1<f64> {
        vech(second_moment(resids.view()).view())
    }

    fn variance_bounds(&self, resids: &Array2<f64>) -> Array2<f64> {
        scale_bounds(resids)
    }

    fn constraints(&self) -> LinearInequalities {
        LinearInequalities::none(self.num_params())
    }

    /// Diagonal entries are kept strictly positive; off-diagonal entries
    /// range symmetrically over ten times the largest sample variance.
    fn bounds(&self, resids: &Array2<f64>) -> Vec<(f64, f64)> {
        let moment = second_moment(resids.view());
        let mut max_var = f64::MIN_POSITIVE;
        for i in 0..self.nvar {
            max_var = max_var.max(moment[[i, i]]);
        }
        let hi = 10.0 * max_var;

        let mut bounds = Vec::with_capacity(self.num_params());
        for i in 0..self.nvar {
            for j in 0..=i {
                if i == j {
                    bounds.push((max_var * 1e-8, hi));
                } else {
                    bounds.push((-hi, hi));
                }
            }
        }
        bounds
    }
}

/// RiskMetrics exponentially weighted moving average covariance.
///
/// `Σ_t = λ Σ_{t−1} + (1 − λ) ε_{t−1} ε_{t−1}ᵀ`, seeded with the backcast.
/// The smoothing constant is fixed configuration, not an estimated
/// parameter, so the process contributes zero entries to the parameter
/// vector.
#[derive(Debug, Clone, PartialEq)]
pub struct EwmaCovariance {
    nvar: usize,
    lam: f64,
}

impl EwmaCovariance {
    /// Standard RiskMetrics smoothing (λ = 0.94).
    pub fn new(nvar: usize) -> Self {
        Self { nvar, lam: 0.94 }
    }

    /// Custom smoothing constant.
    ///
    /// # Errors
    /// [`MvError::InvalidParameter`] unless `0 < lam < 1`.
    pub fn with_smoothing(nvar: usize, lam: f64) -> MvResult<Self> {
        if !lam.is_finite() || lam <= 0.0 || lam >= 1.0 {
            return Err(MvError::InvalidParameter {
                name: "lam",
                value: lam,
                reason: "Smoothing must lie strictly between zero and one.",
            });
        }
        Ok(Self { nvar, lam })
    }

    /// The smoothing constant λ.
    pub fn smoothing(&self) -> f64 {
        self.lam
    }
}

impl VolatilityProcess for EwmaCovariance {
    fn num_params(&self) -> usize {
        0
    }

    fn parameter_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn description(&self) -> String {
        format!("EWMA Covariance (lam = {})", self.lam)
    }

    fn closed_form(&self) -> bool {
        false
    }

    fn compute_covariance(
        &self, _params: ArrayView1<f64>, resids: &Array2<f64>, sigma: &mut Array3<f64>,
        backcast: &Array2<f64>,
    ) {
        let nobs = sigma.shape()[0];
        let nvar = self.nvar;
        for t in 0..nobs {
            if t == 0 {
                sigma.index_axis_mut(Axis(0), 0).assign(backcast);
                continue;
            }
            let prev = resids.row(t - 1).to_owned();
            for i in 0..nvar {
                for j in 0..nvar {
                    let carried = self.lam * sigma[[t - 1, i, j]];
                    sigma[[t, i, j]] = carried + (1.0 - self.lam) * prev[i] * prev[j];
                }
            }
        }
    }

    fn backcast(&self, resids: &Array2<f64>) -> Array2<f64> {
        decayed_backcast(resids)
    }

    fn starting_values(&self, _resids: &Array2<f64>) -> Array1<f64> {
        Array1::zeros(0)
    }

    fn variance_bounds(&self, resids: &Array2<f64>) -> Array2<f64> {
        scale_bounds(resids)
    }

    fn constraints(&self) -> LinearInequalities {
        LinearInequalities::none(0)
    }

    fn bounds(&self, _resids: &Array2<f64>) -> Vec<(f64, f64)> {
        Vec::new()
    }
}
