//! Validation helpers for constrained minimization.
//!
//! - **Tolerance checks**: [`verify_tol_grad`], [`verify_tol_cost`] ensure
//!   numeric tolerances are finite and strictly positive when provided.
//! - **Starting points**: [`validate_start`] enforces length and finiteness
//!   of an initial guess.
//! - **Gradient validation**: [`validate_grad`] enforces correct dimension
//!   and finite entries.
//! - **Solutions**: [`validate_solution`] ensures a candidate `x̂` exists and
//!   contains only finite values.
//! - **Objective values**: [`validate_value`] checks cost outputs for
//!   finiteness.
use crate::optimization::{
    errors::{OptError, OptResult},
    solver::{Grad, Theta},
};

/// Validate the optional gradient-norm tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional cost-change tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolCost`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate an initial guess against the problem dimension.
///
/// # Errors
/// - [`OptError::DimensionMismatch`] if `x0.len() != dim`.
/// - [`OptError::InvalidStart`] at the first non-finite entry.
pub fn validate_start(x0: &Theta, dim: usize) -> OptResult<()> {
    if x0.len() != dim {
        return Err(OptError::DimensionMismatch {
            what: "starting point",
            expected: dim,
            found: x0.len(),
        });
    }
    for (index, &value) in x0.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidStart { index, value });
        }
    }
    Ok(())
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] with the index/value/reason of the first
///   offending element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate and unwrap a solution vector.
///
/// # Errors
/// - [`OptError::MissingSolution`] if no vector was provided.
/// - [`OptError::InvalidSolution`] if any element is non-finite.
pub fn validate_solution(x_hat: Option<Theta>) -> OptResult<Theta> {
    match x_hat {
        Some(x) => {
            for (index, &value) in x.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidSolution {
                        index,
                        value,
                        reason: "Solution entries must be finite.",
                    });
                }
            }
            Ok(x)
        }
        None => Err(OptError::MissingSolution),
    }
}

/// Validate that a scalar cost is finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn tolerances_accept_none_and_positive_values() {
        assert!(verify_tol_grad(None).is_ok());
        assert!(verify_tol_cost(Some(1e-12)).is_ok());
        assert!(matches!(verify_tol_cost(Some(0.0)), Err(OptError::InvalidTolCost { .. })));
        assert!(matches!(
            verify_tol_grad(Some(f64::INFINITY)),
            Err(OptError::InvalidTolGrad { .. })
        ));
    }

    #[test]
    fn validate_start_checks_length_then_entries() {
        assert!(validate_start(&array![1.0, 2.0], 2).is_ok());
        assert!(matches!(
            validate_start(&array![1.0], 2),
            Err(OptError::DimensionMismatch { expected: 2, found: 1, .. })
        ));
        let err = validate_start(&array![1.0, f64::NAN], 2).unwrap_err();
        assert!(matches!(err, OptError::InvalidStart { index: 1, .. }));
    }

    #[test]
    fn validate_grad_reports_first_bad_entry() {
        assert_eq!(
            validate_grad(&array![1.0], 2),
            Err(OptError::GradientDimMismatch { expected: 2, found: 1 })
        );
        assert!(matches!(
            validate_grad(&array![0.0, f64::INFINITY], 2),
            Err(OptError::InvalidGradient { index: 1, .. })
        ));
    }

    #[test]
    fn validate_solution_requires_present_finite_vector() {
        assert_eq!(validate_solution(None), Err(OptError::MissingSolution));
        assert_eq!(validate_solution(Some(array![0.5])), Ok(array![0.5]));
        assert!(validate_value(f64::NAN).is_err());
        assert!(validate_value(-3.0).is_ok());
    }
}
