//! High-level entry point for constrained minimization.
//!
//! Wraps the objective, constraints and bounds in a [`PenalizedProblem`],
//! builds the solver selected by [`SolverOptions::method`], and delegates
//! the run to the matching runner.
use crate::optimization::{
    errors::{OptError, OptResult},
    solver::{
        Theta,
        adapter::PenalizedProblem,
        builders::{build_nelder_mead, build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::{run_lbfgs, run_nelder_mead},
        traits::{
            Bounds, ConstraintSet, LineSearcher, Objective, SolveOutcome, SolverMethod,
            SolverOptions,
        },
        validation::validate_start,
    },
};

/// Minimize `objective` subject to `constraints` and optional `bounds`,
/// starting from `x0`.
///
/// # Behavior
/// - Validates `x0` (length and finiteness), then calls
///   `objective.check(&x0)`.
/// - Checks that `bounds`, if given, match the objective dimension.
/// - Runs Nelder–Mead or L-BFGS on the penalized cost.
///
/// # Errors
/// - [`OptError::DimensionMismatch`] for an empty problem or mismatched
///   bounds, [`OptError::InvalidStart`] for a non-finite start.
/// - Propagates builder and runtime errors, including domain errors raised
///   by the objective as [`OptError::Domain`].
///
/// # Example
/// ```
/// use ndarray::array;
/// use population_structure::optimization::errors::OptResult;
/// use population_structure::optimization::solver::{
///     minimize, ConstraintSet, Objective, SolverOptions, Theta,
/// };
///
/// struct Shifted;
/// impl Objective for Shifted {
///     fn dim(&self) -> usize { 2 }
///     fn value(&self, x: &Theta) -> OptResult<f64> {
///         Ok((x[0] - 1.0).powi(2) + (x[1] + 2.0).powi(2))
///     }
/// }
///
/// let out = minimize(&Shifted, &ConstraintSet::new(), None, array![0.0, 0.0],
///     &SolverOptions::default())?;
/// assert!(out.objective < 1e-6);
/// # Ok::<(), population_structure::optimization::errors::OptError>(())
/// ```
pub fn minimize<O: Objective>(
    objective: &O, constraints: &ConstraintSet, bounds: Option<&Bounds>, x0: Theta,
    opts: &SolverOptions,
) -> OptResult<SolveOutcome> {
    let dim = objective.dim();
    if dim == 0 {
        return Err(OptError::DimensionMismatch { what: "unknown vector", expected: 1, found: 0 });
    }
    validate_start(&x0, dim)?;
    objective.check(&x0)?;
    if let Some(b) = bounds {
        if b.dim() != dim {
            return Err(OptError::DimensionMismatch {
                what: "bounds",
                expected: dim,
                found: b.dim(),
            });
        }
    }
    let problem = PenalizedProblem::new(objective, constraints, bounds, opts.penalty);
    match opts.method {
        SolverMethod::NelderMead => {
            let solver = build_nelder_mead(&x0, opts)?;
            run_nelder_mead(&x0, opts, problem, solver)
        }
        SolverMethod::Lbfgs(LineSearcher::MoreThuente) => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(x0, opts, problem, solver)
        }
        SolverMethod::Lbfgs(LineSearcher::HagerZhang) => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(x0, opts, problem, solver)
        }
    }
}
