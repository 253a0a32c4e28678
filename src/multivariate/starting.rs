//! Starting-value resolution for constrained likelihood optimization.
//!
//! User-supplied starting values are convenient but easy to get wrong, so
//! they are validated against the assembled constraint system and bounds
//! before the optimizer ever sees them. An infeasible vector is replaced by
//! the synthesized defaults with a warning; it is never a hard error.

use crate::multivariate::errors::FitWarning;
use crate::optimization::constrained::types::LinearInequalities;
use ndarray::Array1;

/// Outcome of starting-value resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStart {
    /// The vector the optimizer will start from.
    pub values: Array1<f64>,
    /// Present when user-supplied values were rejected.
    pub warning: Option<FitWarning>,
}

/// Validate `user` starting values or fall back to `synthesized` defaults.
///
/// Acceptance requires all three of:
/// - total length equal to the parameter count (taken from `bounds`),
/// - every assembled constraint row satisfied strictly (`A·x − b > 0`),
/// - every value strictly inside its bound pair.
///
/// The synthesized defaults are the concatenation, in block order, of the
/// three sub-models' own starting values and are assumed feasible by
/// construction.
pub fn resolve_starting_values(
    user: Option<&Array1<f64>>, synthesized: Array1<f64>, constraints: &LinearInequalities,
    bounds: &[(f64, f64)],
) -> ResolvedStart {
    let Some(sv) = user else {
        return ResolvedStart { values: synthesized, warning: None };
    };

    match feasibility(sv, constraints, bounds) {
        Ok(()) => ResolvedStart { values: sv.clone(), warning: None },
        Err(reason) => ResolvedStart {
            values: synthesized,
            warning: Some(FitWarning::StartingValues { reason }),
        },
    }
}

fn feasibility(
    sv: &Array1<f64>, constraints: &LinearInequalities, bounds: &[(f64, f64)],
) -> Result<(), &'static str> {
    if sv.len() != bounds.len() {
        return Err("wrong length");
    }
    if sv.iter().any(|v| !v.is_finite()) {
        return Err("non-finite value");
    }
    if !constraints.satisfied_strict(sv.view()) {
        return Err("constraints not satisfied strictly");
    }
    for (&value, &(lo, hi)) in sv.iter().zip(bounds.iter()) {
        if !(value > lo && value < hi) {
            return Err("value outside bounds");
        }
    }
    Ok(())
}
