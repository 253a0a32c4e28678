//! Error types for the optimization layer.
//!
//! All solver and numerical-derivative failures are reported through
//! [`SolverError`]. Errors raised inside `argmin` are wrapped in the
//! [`SolverError::Backend`] variant so they never leak across module
//! boundaries.

/// Crate-wide result alias for optimizer operations.
pub type SolverResult<T> = Result<T, SolverError>;

#[derive(Debug)]
pub enum SolverError {
    // ---- Options ----
    /// Simplex tolerance needs to be positive and finite.
    InvalidTolerance {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },

    // ---- Problem setup ----
    /// Starting point must be non-empty.
    EmptyStartingPoint,
    /// Starting point entries must be finite.
    NonFiniteStartingPoint {
        index: usize,
        value: f64,
    },
    /// One bound pair per parameter.
    BoundsDimMismatch {
        expected: usize,
        found: usize,
    },
    /// Constraint matrix columns must match the parameter count.
    ConstraintDimMismatch {
        expected: usize,
        found: usize,
    },
    /// Constraint matrix rows must match the offset vector length.
    ConstraintRowMismatch {
        rows: usize,
        offsets: usize,
    },

    // ---- Finite differences ----
    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },
    /// Gradient elements need to be finite.
    InvalidGradient {
        index: usize,
        value: f64,
    },
    /// Hessian matrix dimensions do not match parameter dimensions.
    HessianDimMismatch {
        expected: usize,
        found: (usize, usize),
    },
    /// Hessian values need to be finite.
    InvalidHessian {
        row: usize,
        col: usize,
        value: f64,
    },
    /// Per-observation score rows must have a constant length.
    ScoreDimMismatch {
        expected: usize,
        found: usize,
    },
    /// Score entries need to be finite.
    InvalidScore {
        row: usize,
        col: usize,
        value: f64,
    },

    // ---- Solver outcome ----
    /// The solver did not produce a best parameter vector.
    MissingBestParam,
    /// Estimated parameters must be finite.
    InvalidBestParam {
        index: usize,
        value: f64,
    },

    // ---- Argmin ----
    /// Wrapper for any `argmin` runtime error.
    Backend {
        text: String,
    },
}

impl std::error::Error for SolverError {}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::InvalidTolerance { tol, reason } => {
                write!(f, "Invalid solver tolerance {tol}: {reason}")
            }
            SolverError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            SolverError::EmptyStartingPoint => {
                write!(f, "Starting point must contain at least one parameter")
            }
            SolverError::NonFiniteStartingPoint { index, value } => {
                write!(f, "Non-finite starting value at index {index}: {value}")
            }
            SolverError::BoundsDimMismatch { expected, found } => {
                write!(f, "Bounds dimension mismatch: expected {expected}, found {found}")
            }
            SolverError::ConstraintDimMismatch { expected, found } => {
                write!(f, "Constraint column mismatch: expected {expected}, found {found}")
            }
            SolverError::ConstraintRowMismatch { rows, offsets } => {
                write!(f, "Constraint rows ({rows}) do not match offsets ({offsets})")
            }
            SolverError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            SolverError::InvalidGradient { index, value } => {
                write!(f, "Invalid gradient at index {index}: {value}")
            }
            SolverError::HessianDimMismatch { expected, found } => {
                write!(
                    f,
                    "Hessian dimension mismatch: expected {expected}x{expected}, found {}x{}",
                    found.0, found.1
                )
            }
            SolverError::InvalidHessian { row, col, value } => {
                write!(f, "Invalid Hessian entry at ({row}, {col}): {value}")
            }
            SolverError::ScoreDimMismatch { expected, found } => {
                write!(f, "Score dimension mismatch: expected {expected}, found {found}")
            }
            SolverError::InvalidScore { row, col, value } => {
                write!(f, "Invalid score entry at ({row}, {col}): {value}")
            }
            SolverError::MissingBestParam => {
                write!(f, "Missing best parameter vector from solver")
            }
            SolverError::InvalidBestParam { index, value } => {
                write!(f, "Invalid best parameter at index {index}: {value}")
            }
            SolverError::Backend { text } => {
                write!(f, "Solver backend error: {text}")
            }
        }
    }
}

impl From<argmin::core::Error> for SolverError {
    fn from(err: argmin::core::Error) -> Self {
        SolverError::Backend { text: format!("{err}") }
    }
}
