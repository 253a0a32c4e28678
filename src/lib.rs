//! mvarch — maximum-likelihood estimation of multivariate volatility models.
//!
//! Purpose
//! -------
//! Serve as the crate root for the estimation engine. A model is the
//! composition of three pluggable sub-models — conditional mean,
//! conditional covariance process, and error distribution — estimated
//! jointly over one flat parameter vector by constrained maximum
//! likelihood, with parameter covariance from numerical derivatives.
//!
//! Key behaviors
//! -------------
//! - Re-export the core modules ([`multivariate`] and [`optimization`]) as
//!   the public crate surface.
//! - [`multivariate`] owns the model layer: parameter layout, composite
//!   likelihood, constraint/bounds assembly, starting-value resolution, fit
//!   orchestration, covariance estimation, and a reference set of sub-model
//!   implementations.
//! - [`optimization`] owns the model-agnostic numerics: the constrained
//!   simplex minimizer and finite-difference derivative helpers.
//!
//! Conventions
//! -----------
//! - The optimizer minimizes; all likelihood objectives are negative
//!   log-likelihoods.
//! - Errors are domain enums ([`multivariate::MvError`],
//!   [`optimization::SolverError`]); recoverable fit conditions are
//!   warnings on the result, surfaced through the `log` facade unless
//!   suppressed.
//! - No global state: progress counters are caller-owned and reset per fit.
//!
//! Downstream usage
//! ----------------
//! ```no_run
//! use mvarch::multivariate::prelude::*;
//! use ndarray::Array2;
//!
//! # fn main() -> MvResult<()> {
//! let y = TimeSeries::new(Array2::zeros((500, 2)))?;
//! let mut model = MultivariateModel::new(
//!     Some(y),
//!     None,
//!     Box::new(ZeroMean::new(2)),
//!     Some(Box::new(EwmaCovariance::new(2))),
//!     Some(Box::new(MultivariateStudentT::new(2))),
//!     None,
//! )?;
//! let result = model.fit(&FitOptions::default())?;
//! let cov = model.compute_param_cov(&result.params, true)?;
//! # let _ = cov;
//! # Ok(())
//! # }
//! ```

pub mod multivariate;
pub mod optimization;
