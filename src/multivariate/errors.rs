//! Error and warning types for multivariate model estimation.
//!
//! Two severities exist (and only two): [`MvError`] values are fatal and
//! stop execution, while [`FitWarning`] values are recoverable conditions
//! that are recorded on the fit result and, unless suppressed, surfaced
//! through `log::warn!`. Optional collaborator capabilities that are simply
//! not provided are not errors at all; see
//! [`Support`](crate::multivariate::traits::Support).

use crate::optimization::errors::SolverError;

/// Crate-wide result alias for model operations.
pub type MvResult<T> = Result<T, MvError>;

#[derive(Debug)]
pub enum MvError {
    // ---- Configuration ----
    /// Fitting requested with no data bound to the model.
    NoData,
    /// The observation matrix has no rows.
    EmptySample,
    /// Observations must be finite.
    NonFiniteObservation {
        row: usize,
        col: usize,
        value: f64,
    },
    /// Two components disagree on a dimension (e.g. data vs. declared nvar).
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    /// Requested estimation window is empty or out of range.
    InvalidSampleWindow {
        first: usize,
        last: usize,
        nobs: usize,
    },
    /// A model-level numeric parameter is out of its admissible range.
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    // ---- Parameters ----
    /// Flat parameter vector length does not match the model layout.
    ParamLengthMismatch {
        expected: usize,
        found: usize,
    },

    // ---- Covariance estimation ----
    /// The numerical Hessian could not be inverted.
    SingularHessian,

    // ---- Optimizer ----
    /// Wrapper for failures in the optimization layer.
    Solver(SolverError),
}

impl std::error::Error for MvError {}

impl std::fmt::Display for MvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MvError::NoData => {
                write!(f, "Cannot estimate model without data")
            }
            MvError::EmptySample => {
                write!(f, "Observation matrix must contain at least one row")
            }
            MvError::NonFiniteObservation { row, col, value } => {
                write!(f, "Non-finite observation at ({row}, {col}): {value}")
            }
            MvError::DimensionMismatch { what, expected, found } => {
                write!(f, "Dimension mismatch for {what}: expected {expected}, found {found}")
            }
            MvError::InvalidSampleWindow { first, last, nobs } => {
                write!(f, "Invalid sample window [{first}, {last}) for {nobs} observations")
            }
            MvError::InvalidParameter { name, value, reason } => {
                write!(f, "Invalid parameter {name} = {value}: {reason}")
            }
            MvError::ParamLengthMismatch { expected, found } => {
                write!(f, "Parameter vector length mismatch: expected {expected}, found {found}")
            }
            MvError::SingularHessian => {
                write!(f, "Parameter covariance unavailable: numerical Hessian is singular")
            }
            MvError::Solver(err) => {
                write!(f, "Optimizer failure: {err}")
            }
        }
    }
}

impl From<SolverError> for MvError {
    fn from(err: SolverError) -> Self {
        MvError::Solver(err)
    }
}

/// Recoverable conditions surfaced during a fit.
///
/// Warnings never stop execution; they are collected on the
/// [`FitResult`](crate::multivariate::estimation::FitResult) and logged
/// unless the caller suppresses them.
#[derive(Debug, Clone, PartialEq)]
pub enum FitWarning {
    /// User-supplied starting values failed feasibility checks and were
    /// replaced with synthesized defaults.
    StartingValues {
        reason: &'static str,
    },
    /// The optimizer reported a non-zero status; the best iterate found is
    /// still returned.
    Convergence {
        status: i32,
        message: String,
    },
}

impl std::fmt::Display for FitWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitWarning::StartingValues { reason } => {
                write!(
                    f,
                    "User-supplied starting values rejected ({reason}); \
                     synthesized starting values were used instead"
                )
            }
            FitWarning::Convergence { status, message } => {
                write!(
                    f,
                    "The optimizer returned code {status} ({message}); the result \
                     contains the best point found but may not be a true optimum"
                )
            }
        }
    }
}
