//! Adapter that exposes a bounded, linearly constrained objective as an
//! `argmin` problem.
//!
//! The simplex solver itself is unconstrained, so feasibility is enforced in
//! the cost evaluation: any point that leaves the box bounds, violates a
//! constraint row, or produces a non-finite objective value is assigned
//! [`PENALTY_COST`]. The solver therefore treats infeasible and degenerate
//! points as arbitrarily bad without the objective ever needing to guard
//! itself, and the objective is only invoked on feasible points.

use crate::optimization::constrained::types::{Cost, LinearInequalities, Params, PENALTY_COST};
use argmin::core::{CostFunction, Error};

/// Bridges an objective closure plus feasibility data to `argmin`'s
/// [`CostFunction`].
pub struct ConstrainedProblem<'a, F: Fn(&Params) -> Cost> {
    objective: F,
    bounds: &'a [(f64, f64)],
    constraints: &'a LinearInequalities,
}

impl<'a, F: Fn(&Params) -> Cost> ConstrainedProblem<'a, F> {
    pub fn new(
        objective: F, bounds: &'a [(f64, f64)], constraints: &'a LinearInequalities,
    ) -> Self {
        Self { objective, bounds, constraints }
    }

    fn within_bounds(&self, x: &Params) -> bool {
        x.iter().zip(self.bounds.iter()).all(|(&v, &(lo, hi))| v >= lo && v <= hi)
    }
}

impl<'a, F: Fn(&Params) -> Cost> CostFunction for ConstrainedProblem<'a, F> {
    type Param = Params;
    type Output = Cost;

    /// Evaluate the guarded cost at `x`.
    ///
    /// Returns [`PENALTY_COST`] for non-finite inputs, bound violations,
    /// constraint violations, and non-finite objective values; the wrapped
    /// objective value otherwise. Never returns an error.
    fn cost(&self, x: &Self::Param) -> Result<Self::Output, Error> {
        if x.iter().any(|v| !v.is_finite()) {
            return Ok(PENALTY_COST);
        }
        if !self.within_bounds(x) {
            return Ok(PENALTY_COST);
        }
        if !self.constraints.satisfied(x.view()) {
            return Ok(PENALTY_COST);
        }
        let value = (self.objective)(x);
        if value.is_finite() { Ok(value) } else { Ok(PENALTY_COST) }
    }
}
