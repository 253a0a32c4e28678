//! Reference mean models: zero mean and per-series constant mean.
//!
//! Both support the closed-form no-dynamics estimator (sample moments under
//! constant covariance and normal errors), which is what makes the fast fit
//! path reachable; everything else about them is deliberately minimal.

use crate::multivariate::core::linalg::{second_moment, vech};
use crate::multivariate::traits::{CovType, MeanModel, Support};
use crate::optimization::constrained::types::LinearInequalities;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Mean model with no parameters: residuals are the observations themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZeroMean {
    /// Number of variables the model applies to.
    pub nvar: usize,
}

impl ZeroMean {
    pub fn new(nvar: usize) -> Self {
        Self { nvar }
    }
}

impl MeanModel for ZeroMean {
    fn num_params(&self) -> usize {
        0
    }

    fn parameter_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn description(&self) -> String {
        "Zero Mean".to_string()
    }

    fn residuals(
        &self, _params: ArrayView1<f64>, y: ArrayView2<f64>, _regressors: Option<ArrayView2<f64>>,
    ) -> Array2<f64> {
        y.to_owned()
    }

    fn starting_values(&self, _y: ArrayView2<f64>) -> Array1<f64> {
        Array1::zeros(0)
    }

    fn constraints(&self) -> LinearInequalities {
        LinearInequalities::none(0)
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        Vec::new()
    }

    /// Closed form under constant covariance: the packed sample second
    /// moment of the observations.
    fn closed_form_fit(&self, y: ArrayView2<f64>, _cov_type: CovType) -> Support<Array1<f64>> {
        Support::Available(vech(second_moment(y).view()))
    }
}

/// Per-series intercept mean model: `ε_t = y_t − μ`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantMean {
    nvar: usize,
}

impl ConstantMean {
    pub fn new(nvar: usize) -> Self {
        Self { nvar }
    }

    fn column_means(&self, y: ArrayView2<f64>) -> Array1<f64> {
        y.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(self.nvar))
    }
}

impl MeanModel for ConstantMean {
    fn num_params(&self) -> usize {
        self.nvar
    }

    fn parameter_names(&self) -> Vec<String> {
        (0..self.nvar).map(|i| format!("mu[{i}]")).collect()
    }

    fn description(&self) -> String {
        "Constant Mean".to_string()
    }

    fn residuals(
        &self, params: ArrayView1<f64>, y: ArrayView2<f64>, _regressors: Option<ArrayView2<f64>>,
    ) -> Array2<f64> {
        let mut resids = y.to_owned();
        resids -= &params;
        resids
    }

    fn starting_values(&self, y: ArrayView2<f64>) -> Array1<f64> {
        self.column_means(y)
    }

    fn constraints(&self) -> LinearInequalities {
        LinearInequalities::none(self.nvar)
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        vec![(f64::NEG_INFINITY, f64::INFINITY); self.nvar]
    }

    /// Closed form under constant covariance: sample means followed by the
    /// packed sample covariance of the demeaned observations.
    fn closed_form_fit(&self, y: ArrayView2<f64>, _cov_type: CovType) -> Support<Array1<f64>> {
        let mu = self.column_means(y);
        let resids = self.residuals(mu.view(), y, None);
        let cov = vech(second_moment(resids.view()).view());

        let mut params = Vec::with_capacity(mu.len() + cov.len());
        params.extend(mu.iter().copied());
        params.extend(cov.iter().copied());
        Support::Available(Array1::from(params))
    }

    /// A constant mean explains none of the variation around the mean, so
    /// R² is identically zero.
    fn r_squared(&self, _params: ArrayView1<f64>, _y: ArrayView2<f64>) -> Support<f64> {
        Support::Available(0.0)
    }
}
