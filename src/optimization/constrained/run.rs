//! Execution helper that runs the simplex solver on a constrained problem
//! and returns a crate-friendly [`SolveOutcome`].
//!
//! This is the crate's generic constrained minimizer: objective, starting
//! point, box bounds, and linear inequality constraints go in; the best
//! point, its cost, and a numeric status code come out. Status `0` means the
//! solver converged; non-zero codes report non-convergence, which callers
//! treat as a warning rather than a failure.

use crate::optimization::{
    constrained::{
        options::{DisplayMode, SolveOptions},
        problem::ConstrainedProblem,
        progress::{FitProgress, ProgressObserver},
        types::{Cost, LinearInequalities, Params, SIMPLEX_STEP, SIMPLEX_ZERO_STEP},
        validation::{validate_best_param, validate_problem_dims, validate_starting_point},
    },
    errors::SolverResult,
};
use argmin::core::observers::ObserverMode;
use argmin::core::{Executor, State, TerminationReason, TerminationStatus};
use argmin::solver::neldermead::NelderMead;

/// Canonical result of a constrained solve.
///
/// - `params`: best parameter vector found (always present, even when the
///   solver did not fully converge).
/// - `cost`: objective value at `params`.
/// - `status`: `0` = converged, `1` = iteration cap reached, `2` = other
///   solver exit, `3` = no termination reported.
/// - `message`: human-readable termination description.
/// - `iterations`: solver iterations performed.
/// - `func_evals`: objective evaluations counted by the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub params: Params,
    pub cost: f64,
    pub status: i32,
    pub message: String,
    pub iterations: usize,
    pub func_evals: u64,
}

impl SolveOutcome {
    /// Whether the solver reported full convergence.
    pub fn converged(&self) -> bool {
        self.status == 0
    }
}

/// Minimize `objective` over the box `bounds` subject to `A·x − b ≥ 0`.
///
/// # Behavior
/// - Validates the starting point and problem dimensions.
/// - Builds an initial simplex by perturbing `x0` one coordinate at a time.
/// - Wraps the objective in a [`ConstrainedProblem`] so infeasible or
///   non-finite evaluations are penalized instead of raised.
/// - Runs Nelder-Mead with the configured simplex tolerance and iteration
///   cap, observing iterations through `progress`.
/// - Maps the solver's termination status onto a numeric status code.
///
/// # Errors
/// - Validation errors for the starting point, bounds, or constraints.
/// - [`SolverError::Backend`](crate::optimization::errors::SolverError)
///   for any `argmin` runtime failure.
/// - [`SolverError::MissingBestParam`](crate::optimization::errors::SolverError)
///   / `InvalidBestParam` when the solver fails to produce a usable point.
///
/// Non-convergence is *not* an error: the best iterate is returned with a
/// non-zero `status`.
pub fn minimize<F: Fn(&Params) -> Cost>(
    objective: F, x0: &Params, bounds: &[(f64, f64)], constraints: &LinearInequalities,
    opts: &SolveOptions, progress: &FitProgress,
) -> SolverResult<SolveOutcome> {
    validate_starting_point(x0)?;
    validate_problem_dims(x0.len(), bounds, constraints)?;

    let problem = ConstrainedProblem::new(objective, bounds, constraints);
    let solver = NelderMead::new(build_simplex(x0)).with_sd_tolerance(opts.sd_tolerance)?;
    let observer = ProgressObserver::new(progress.clone(), opts.update_freq as u64);

    let executor = Executor::new(problem, solver)
        .configure(|state| state.max_iters(opts.max_iters as u64))
        .add_observer(observer, ObserverMode::Always);

    let mut state = executor.run()?.state().clone();
    let iterations = state.get_iter() as usize;
    let func_evals = state.get_func_counts().get("cost_count").copied().unwrap_or(0);
    let termination = state.get_termination_status().clone();
    let cost = state.get_best_cost();
    let params = validate_best_param(state.take_best_param())?;

    let (status, message) = map_termination(&termination);
    if opts.display == DisplayMode::Final {
        log::info!(
            "Optimization terminated with status {status} ({message}): \
             {iterations} iterations, {func_evals} function evaluations, cost {cost}"
        );
    }

    Ok(SolveOutcome { params, cost, status, message, iterations, func_evals })
}

/// Initial simplex for Nelder-Mead: `x0` plus one vertex per coordinate,
/// shifted by a relative step (absolute for coordinates at zero).
fn build_simplex(x0: &Params) -> Vec<Params> {
    let dim = x0.len();
    let mut simplex = Vec::with_capacity(dim + 1);
    simplex.push(x0.clone());
    for i in 0..dim {
        let mut vertex = x0.clone();
        let step = if vertex[i] != 0.0 { SIMPLEX_STEP * vertex[i].abs() } else { SIMPLEX_ZERO_STEP };
        vertex[i] += step;
        simplex.push(vertex);
    }
    simplex
}

fn map_termination(termination: &TerminationStatus) -> (i32, String) {
    match termination {
        TerminationStatus::Terminated(reason) => match reason {
            TerminationReason::SolverConverged | TerminationReason::TargetCostReached => {
                (0, format!("{reason:?}"))
            }
            TerminationReason::MaxItersReached => (1, "maximum iterations reached".to_string()),
            other => (2, format!("{other:?}")),
        },
        TerminationStatus::NotTerminated => (3, "solver did not terminate".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Unconstrained minimization of a smooth quadratic.
    // - Bound and linear-constraint enforcement through the penalty guard.
    // - Status-code mapping for converged and iteration-capped runs.
    //
    // They intentionally DO NOT cover:
    // - Likelihood objectives (exercised by the model-layer tests).
    // -------------------------------------------------------------------------

    fn unconstrained(dim: usize) -> (Vec<(f64, f64)>, LinearInequalities) {
        (vec![(f64::NEG_INFINITY, f64::INFINITY); dim], LinearInequalities::none(dim))
    }

    #[test]
    // Purpose
    // -------
    // A smooth quadratic with minimum at (1, -2) must be located to a few
    // decimal places and reported as converged (status 0).
    fn quadratic_minimum_is_found_with_converged_status() {
        // Arrange
        let objective = |x: &Params| (x[0] - 1.0).powi(2) + (x[1] + 2.0).powi(2);
        let x0 = array![0.0, 0.0];
        let (bounds, cons) = unconstrained(2);
        let progress = FitProgress::new();

        // Act
        let outcome =
            minimize(objective, &x0, &bounds, &cons, &SolveOptions::default(), &progress)
                .expect("solver should run");

        // Assert
        assert_eq!(outcome.status, 0);
        assert!(outcome.converged());
        assert!((outcome.params[0] - 1.0).abs() < 1e-3);
        assert!((outcome.params[1] + 2.0).abs() < 1e-3);
        assert!(outcome.func_evals > 0);
        assert!(progress.iterations() > 0);
    }

    #[test]
    // Purpose
    // -------
    // With the unconstrained minimum outside the feasible region, the solver
    // must settle near the constraint boundary instead.
    //
    // Given
    // -----
    // - Objective (x0 - 2)^2 with the bound x0 <= 1.
    //
    // Expect
    // ------
    // - The best point respects the bound and sits near x0 = 1.
    fn bounds_are_respected() {
        let objective = |x: &Params| (x[0] - 2.0).powi(2);
        let x0 = array![0.5];
        let bounds = vec![(-1.0, 1.0)];
        let cons = LinearInequalities::none(1);
        let progress = FitProgress::new();

        let outcome =
            minimize(objective, &x0, &bounds, &cons, &SolveOptions::default(), &progress)
                .expect("solver should run");

        assert!(outcome.params[0] <= 1.0);
        assert!(outcome.params[0] > 0.8);
    }

    #[test]
    // Purpose
    // -------
    // A linear inequality x0 + x1 - 1 >= 0 must keep the solution on the
    // feasible side even though the unconstrained minimum is the origin.
    fn linear_constraints_are_respected() {
        let objective = |x: &Params| x.dot(x);
        let x0 = array![1.0, 1.0];
        let bounds = vec![(-5.0, 5.0), (-5.0, 5.0)];
        let cons = LinearInequalities::new(array![[1.0, 1.0]], array![1.0]).expect("valid");
        let progress = FitProgress::new();

        let outcome =
            minimize(objective, &x0, &bounds, &cons, &SolveOptions::default(), &progress)
                .expect("solver should run");

        let slack = outcome.params[0] + outcome.params[1] - 1.0;
        assert!(slack >= -1e-8, "constraint violated: slack = {slack}");
        // The constrained minimum of ||x||^2 on x0 + x1 >= 1 is (0.5, 0.5).
        assert!((outcome.cost - 0.5).abs() < 1e-2);
    }

    #[test]
    // Purpose
    // -------
    // An iteration cap of one forces a non-zero status while still returning
    // the best iterate found so far.
    fn iteration_cap_maps_to_nonzero_status() {
        let objective = |x: &Params| (x[0] - 1.0).powi(2);
        let x0 = array![50.0];
        let (bounds, cons) = unconstrained(1);
        let opts = SolveOptions::new(None, Some(1), DisplayMode::Off, 0).expect("valid options");
        let progress = FitProgress::new();

        let outcome = minimize(objective, &x0, &bounds, &cons, &opts, &progress)
            .expect("solver should run");

        assert_eq!(outcome.status, 1);
        assert!(!outcome.converged());
        assert_eq!(outcome.params.len(), 1);
    }
}
