//! constrained — bounded, linearly constrained minimization via `argmin`.
//!
//! Purpose
//! -------
//! Provide the generic constrained minimizer used for maximum-likelihood
//! estimation: callers hand over an objective closure, a starting point, box
//! bounds, and a linear inequality system `A·x − b ≥ 0`, and receive the
//! best point together with a numeric status code (`0` = converged).
//!
//! Key behaviors
//! -------------
//! - Feasibility is enforced through a penalty guard in
//!   [`problem::ConstrainedProblem`]: bound violations, constraint
//!   violations, and non-finite objective values all evaluate to
//!   [`types::PENALTY_COST`], so the objective itself never has to reject a
//!   point and is never asked to behave outside the feasible region.
//! - The underlying solver is derivative-free (Nelder-Mead) with the initial
//!   simplex built by perturbing the starting point coordinate-wise.
//! - Progress is tracked through the caller-owned [`FitProgress`] handle and
//!   an iteration observer; there is no global state.
//! - Non-convergence is reported through the outcome's status code, never as
//!   an error; the best iterate found is always returned.
//!
//! Downstream usage
//! ----------------
//! The model layer assembles bounds and block-diagonal constraints from its
//! sub-models, wraps the composite negative log-likelihood in a closure, and
//! calls [`minimize`].

pub mod options;
pub mod problem;
pub mod progress;
pub mod run;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::options::{DisplayMode, SolveOptions};
pub use self::progress::{FitProgress, ProgressObserver};
pub use self::run::{minimize, SolveOutcome};
pub use self::types::{Cost, LinearInequalities, Params, PENALTY_COST};
