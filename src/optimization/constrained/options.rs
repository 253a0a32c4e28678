//! Solver-level configuration for the constrained minimizer.

use crate::optimization::{
    constrained::types::{DEFAULT_MAX_ITERS, DEFAULT_SD_TOLERANCE},
    errors::{SolverError, SolverResult},
};

/// How much terminal output the solver produces through the `log` facade.
///
/// Variants:
/// - `Off`: no output beyond iteration lines requested via `update_freq`.
/// - `Final`: a single summary line when the solver terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Off,
    Final,
}

/// Options for a single constrained solve.
///
/// Fields:
/// - `sd_tolerance`: Nelder-Mead terminates when the standard deviation of
///   the simplex cost values falls below this threshold.
/// - `max_iters`: hard cap on the number of iterations.
/// - `display`: final-summary verbosity.
/// - `update_freq`: emit an iteration progress line every `update_freq`
///   iterations; `0` disables iteration output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveOptions {
    pub sd_tolerance: f64,
    pub max_iters: usize,
    pub display: DisplayMode,
    pub update_freq: usize,
}

impl SolveOptions {
    /// Construct validated solver options.
    ///
    /// `None` fields fall back to [`DEFAULT_SD_TOLERANCE`] and
    /// [`DEFAULT_MAX_ITERS`].
    ///
    /// # Errors
    /// - [`SolverError::InvalidTolerance`] for a non-finite or non-positive
    ///   tolerance.
    /// - [`SolverError::InvalidMaxIter`] when `max_iters == 0`.
    pub fn new(
        sd_tolerance: Option<f64>, max_iters: Option<usize>, display: DisplayMode,
        update_freq: usize,
    ) -> SolverResult<Self> {
        let sd_tolerance = sd_tolerance.unwrap_or(DEFAULT_SD_TOLERANCE);
        if !sd_tolerance.is_finite() {
            return Err(SolverError::InvalidTolerance {
                tol: sd_tolerance,
                reason: "Tolerance must be finite.",
            });
        }
        if sd_tolerance <= 0.0 {
            return Err(SolverError::InvalidTolerance {
                tol: sd_tolerance,
                reason: "Tolerance must be positive.",
            });
        }
        let max_iters = max_iters.unwrap_or(DEFAULT_MAX_ITERS);
        if max_iters == 0 {
            return Err(SolverError::InvalidMaxIter {
                max_iter: max_iters,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        Ok(Self { sd_tolerance, max_iters, display, update_freq })
    }
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            sd_tolerance: DEFAULT_SD_TOLERANCE,
            max_iters: DEFAULT_MAX_ITERS,
            display: DisplayMode::Off,
            update_freq: 0,
        }
    }
}
