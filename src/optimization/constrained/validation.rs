//! Validation helpers for the constrained minimizer.
//!
//! These helpers standardize error reporting by returning domain-specific
//! [`SolverError`] variants, keeping the runner free of ad-hoc checks.

use crate::optimization::{
    constrained::types::{LinearInequalities, Params},
    errors::{SolverError, SolverResult},
};

/// Validate a starting point: non-empty with all finite entries.
///
/// # Errors
/// - [`SolverError::EmptyStartingPoint`] for a zero-length vector.
/// - [`SolverError::NonFiniteStartingPoint`] with the index/value of the
///   first offending element.
pub fn validate_starting_point(x0: &Params) -> SolverResult<()> {
    if x0.is_empty() {
        return Err(SolverError::EmptyStartingPoint);
    }
    for (index, &value) in x0.iter().enumerate() {
        if !value.is_finite() {
            return Err(SolverError::NonFiniteStartingPoint { index, value });
        }
    }
    Ok(())
}

/// Validate that the problem pieces agree on the parameter dimension.
///
/// # Errors
/// - [`SolverError::BoundsDimMismatch`] when the bound count differs from
///   the parameter count.
/// - [`SolverError::ConstraintDimMismatch`] when the constraint matrix has
///   the wrong number of columns.
pub fn validate_problem_dims(
    dim: usize, bounds: &[(f64, f64)], constraints: &LinearInequalities,
) -> SolverResult<()> {
    if bounds.len() != dim {
        return Err(SolverError::BoundsDimMismatch { expected: dim, found: bounds.len() });
    }
    if constraints.num_params() != dim {
        return Err(SolverError::ConstraintDimMismatch {
            expected: dim,
            found: constraints.num_params(),
        });
    }
    Ok(())
}

/// Validate and unwrap the solver's best parameter vector.
///
/// # Errors
/// - [`SolverError::MissingBestParam`] if the solver produced none.
/// - [`SolverError::InvalidBestParam`] if any element is non-finite.
pub fn validate_best_param(best: Option<Params>) -> SolverResult<Params> {
    match best {
        Some(params) => {
            for (index, &value) in params.iter().enumerate() {
                if !value.is_finite() {
                    return Err(SolverError::InvalidBestParam { index, value });
                }
            }
            Ok(params)
        }
        None => Err(SolverError::MissingBestParam),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn empty_starting_point_is_rejected() {
        match validate_starting_point(&Params::zeros(0)) {
            Err(SolverError::EmptyStartingPoint) => {}
            other => panic!("Expected EmptyStartingPoint, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_starting_point_reports_first_offender() {
        match validate_starting_point(&array![0.0, f64::NAN, f64::INFINITY]) {
            Err(SolverError::NonFiniteStartingPoint { index: 1, .. }) => {}
            other => panic!("Expected NonFiniteStartingPoint at index 1, got {other:?}"),
        }
    }

    #[test]
    fn mismatched_bounds_are_rejected() {
        let cons = LinearInequalities::none(2);
        match validate_problem_dims(2, &[(-1.0, 1.0)], &cons) {
            Err(SolverError::BoundsDimMismatch { expected: 2, found: 1 }) => {}
            other => panic!("Expected BoundsDimMismatch, got {other:?}"),
        }
    }

    #[test]
    fn mismatched_constraint_columns_are_rejected() {
        let cons = LinearInequalities::none(3);
        match validate_problem_dims(2, &[(-1.0, 1.0), (-1.0, 1.0)], &cons) {
            Err(SolverError::ConstraintDimMismatch { expected: 2, found: 3 }) => {}
            other => panic!("Expected ConstraintDimMismatch, got {other:?}"),
        }
    }

    #[test]
    fn missing_best_param_is_reported() {
        match validate_best_param(None) {
            Err(SolverError::MissingBestParam) => {}
            other => panic!("Expected MissingBestParam, got {other:?}"),
        }
    }
}
