//! optimization — generic constrained minimization and numerical derivatives.
//!
//! Purpose
//! -------
//! House the two numerical collaborators the estimation engine relies on:
//! a generic constrained minimizer ([`constrained`]) and finite-difference
//! derivative routines ([`finite_diff`]). Both are model-agnostic: they know
//! nothing about means, volatilities, or distributions, only about objective
//! closures over flat parameter vectors.
//!
//! Conventions
//! -----------
//! - Objectives are minimized; likelihood callers pass negative
//!   log-likelihoods.
//! - All vectors and matrices are `ndarray` containers over `f64`.
//! - Errors bubble up as [`errors::SolverResult`] values; this module and
//!   its children never intentionally panic and use no `unsafe`.

pub mod constrained;
pub mod errors;
pub mod finite_diff;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::constrained::{
    minimize, DisplayMode, FitProgress, LinearInequalities, Params, SolveOptions, SolveOutcome,
};
pub use self::errors::{SolverError, SolverResult};
pub use self::finite_diff::{approx_gradient, approx_hessian, approx_scores};
