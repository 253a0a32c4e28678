//! multivariate — maximum-likelihood estimation of multivariate volatility
//! models.
//!
//! Purpose
//! -------
//! Compose three pluggable sub-models — a conditional mean, a conditional
//! covariance process, and an error distribution — into one estimable
//! model. The estimation engine builds the composite likelihood over a
//! single flat parameter vector, assembles block-diagonal constraints and
//! bounds, resolves starting values, drives the constrained optimizer (or a
//! closed-form shortcut when the sub-model combination admits one), and
//! estimates parameter covariance from numerical derivatives.
//!
//! Key behaviors
//! -------------
//! - The parameter vector is always the fixed-order concatenation
//!   `(mean, volatility, distribution)`; [`core::ParamLayout`] owns the
//!   offsets and every decomposition goes through it.
//! - Collaborators are capability traits ([`traits`]); optional abilities
//!   (closed-form fit, R²) return a [`traits::Support`] outcome rather than
//!   erroring, and callers branch on it.
//! - Recoverable conditions (infeasible starting values, optimizer
//!   non-convergence) surface as [`errors::FitWarning`] values on the
//!   result; only configuration errors and singular Hessians are fatal.
//! - Residual and covariance outputs are reshaped to the original sample
//!   length with NaN sentinels outside the estimation window.
//!
//! Downstream usage
//! ----------------
//! Build a [`estimation::MultivariateModel`] from a validated
//! [`core::TimeSeries`] and the collaborators of your choice (the
//! [`models`] module ships a minimal reference set), call
//! [`estimation::MultivariateModel::fit`], then
//! [`estimation::MultivariateModel::compute_param_cov`] for inference.

pub mod constraints;
pub mod core;
pub mod errors;
pub mod estimation;
pub mod likelihood;
pub mod models;
pub mod param_cov;
pub mod starting;
pub mod traits;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{ParamLayout, TimeSeries};
pub use self::errors::{FitWarning, MvError, MvResult};
pub use self::estimation::{FitOptions, FitResult, ModelSnapshot, MultivariateModel};
pub use self::likelihood::LikelihoodEvaluator;
pub use self::models::{
    ConstantCovariance, ConstantMean, EwmaCovariance, MultivariateNormal, MultivariateStudentT,
    ZeroMean,
};
pub use self::traits::{CovType, Distribution, MeanModel, Support, VolatilityProcess};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use mvarch::multivariate::prelude::*;
//
// to import the main estimation surface in a single line.

pub mod prelude {
    pub use super::core::{ParamLayout, TimeSeries};
    pub use super::errors::{FitWarning, MvError, MvResult};
    pub use super::estimation::{FitOptions, FitResult, ModelSnapshot, MultivariateModel};
    pub use super::models::{
        ConstantCovariance, ConstantMean, EwmaCovariance, MultivariateNormal,
        MultivariateStudentT, ZeroMean,
    };
    pub use super::traits::{CovType, Distribution, MeanModel, Support, VolatilityProcess};
}
