//! Adapter that exposes an [`Objective`] plus constraints as an `argmin`
//! problem.
//!
//! Constraints and bounds are folded into a quadratic penalty:
//! `c(x) = f(x) + μ · (Σ_eq c_k(x)² + Σ_ineq min(0, c_k(x))² + d(x, box)²)`.
//! A feasible point therefore pays no penalty and `c(x) = f(x)`.
//! Gradients of `c` come from finite differences of the cost closure.
use std::cell::RefCell;

use crate::optimization::{
    errors::{OptError, OptResult},
    solver::{
        traits::{Bounds, ConstraintSet, Objective},
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges an [`Objective`] and its constraints to `argmin`'s
/// `CostFunction` and `Gradient`.
#[derive(Debug)]
pub struct PenalizedProblem<'a, O: Objective> {
    pub objective: &'a O,
    pub constraints: &'a ConstraintSet,
    pub bounds: Option<&'a Bounds>,
    pub penalty: f64,
}

impl<'a, O: Objective> Clone for PenalizedProblem<'a, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, O: Objective> Copy for PenalizedProblem<'a, O> {}

impl<'a, O: Objective> PenalizedProblem<'a, O> {
    pub fn new(
        objective: &'a O, constraints: &'a ConstraintSet, bounds: Option<&'a Bounds>,
        penalty: f64,
    ) -> Self {
        Self { objective, constraints, bounds, penalty }
    }

    /// Unweighted sum of squared constraint and bound violations at `x`.
    pub fn violation(&self, x: &Theta) -> OptResult<f64> {
        let mut total = self.constraints.squared_violation(x)?;
        if let Some(bounds) = self.bounds {
            total += bounds.squared_violation(x);
        }
        Ok(total)
    }

    /// Objective and penalized cost at `x`, in that order.
    ///
    /// # Errors
    /// - Propagates objective and constraint errors.
    /// - [`OptError::NonFiniteCost`] if either value is not finite.
    pub fn evaluate(&self, x: &Theta) -> OptResult<(f64, Cost)> {
        let value = self.objective.value(x)?;
        if !value.is_finite() {
            return Err(OptError::NonFiniteCost { value });
        }
        let cost = value + self.penalty * self.violation(x)?;
        if !cost.is_finite() {
            return Err(OptError::NonFiniteCost { value: cost });
        }
        Ok((value, cost))
    }
}

impl<'a, O: Objective> CostFunction for PenalizedProblem<'a, O> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the penalized cost `c(x)`.
    ///
    /// # Errors
    /// Propagates any `OptError` from [`PenalizedProblem::evaluate`].
    fn cost(&self, x: &Self::Param) -> Result<Self::Output, Error> {
        let (_, cost) = self.evaluate(x)?;
        Ok(cost)
    }
}

impl<'a, O: Objective> Gradient for PenalizedProblem<'a, O> {
    type Param = Theta;
    type Gradient = Grad;

    /// Finite-difference gradient of the penalized cost.
    ///
    /// Central differences are tried first. If a cost evaluation fails
    /// during the sweep, or the result is not finite, the gradient is
    /// recomputed once with forward differences.
    ///
    /// The FD closure must return `f64`, so the first error raised inside it
    /// is parked in `closure_err` and `NaN` is returned in its place.
    ///
    /// # Errors
    /// - Any error raised by cost evaluations during the forward sweep.
    /// - Validation errors if the gradient is still non-finite.
    fn gradient(&self, x: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = x.len();
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let cost_func = |x: &Theta| -> f64 {
            match self.cost(x) {
                Ok(val) => val,
                Err(e) => {
                    let mut slot = closure_err.borrow_mut();
                    if slot.is_none() {
                        *slot = Some(e);
                    }
                    f64::NAN
                }
            }
        };
        let fd_grad = x.central_diff(&cost_func);
        if closure_err.borrow().is_some() {
            return run_fd_diff(x, &cost_func, &closure_err);
        }
        match validate_grad(&fd_grad, dim) {
            Ok(()) => Ok(fd_grad),
            Err(_) => run_fd_diff(x, &cost_func, &closure_err),
        }
    }
}

/// Forward-difference gradient of `func` at `x`, with error capture.
///
/// Clears `closure_err`, runs `forward_diff`, then returns the captured
/// error if there is one, otherwise the validated gradient.
fn run_fd_diff<G: Fn(&Theta) -> f64>(
    x: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> Result<Grad, Error> {
    closure_err.replace(None);
    let fd_grad = x.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_grad(&fd_grad, x.len())?;
    Ok(fd_grad)
}
