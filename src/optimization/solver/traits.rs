//! Public API surface for constrained minimization.
//!
//! - [`Objective`]: trait implemented by every residual-norm problem.
//! - [`ConstraintSet`] and [`ConstraintKind`]: constraint functions plus the
//!   reading (`= 0` or `≥ 0`) the solver applies to each.
//! - [`Bounds`]: box constraints on the unknown vector.
//! - [`SolverOptions`], [`Tolerances`], [`SolverMethod`], [`LineSearcher`]:
//!   configuration for the driver.
//! - [`SolveOutcome`]: normalized result returned by the high-level
//!   `minimize` API.
//!
//! Convention: the solver minimizes the penalized cost
//! `c(x) = f(x) + μ · (constraint and bound violations)²`; the outcome
//! reports both `c(x̂)` and the bare objective `f(x̂)`.
use crate::optimization::{
    errors::{OptError, OptResult},
    solver::{
        Cost, FnEvalMap, Grad, Theta,
        types::DEFAULT_PENALTY,
        validation::{validate_solution, validate_value, verify_tol_cost, verify_tol_grad},
    },
};
use crate::structure::{Constraint, PopResult};
use argmin::core::TerminationStatus;
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// Scalar objective over a flat unknown vector.
///
/// Required:
/// - `dim()`: expected length of the unknown vector.
/// - `value(&Theta) -> OptResult<Cost>`: evaluate the objective. Domain
///   problems (e.g. an Fst of exactly 1) must be returned as errors, never
///   clamped.
///
/// Optional:
/// - `check(&Theta) -> OptResult<()>`: validation hook called once before
///   solving. The default checks the length against `dim()`.
pub trait Objective {
    fn dim(&self) -> usize;
    fn value(&self, x: &Theta) -> OptResult<Cost>;

    fn check(&self, x: &Theta) -> OptResult<()> {
        if x.len() != self.dim() {
            return Err(OptError::DimensionMismatch {
                what: "starting point",
                expected: self.dim(),
                found: x.len(),
            });
        }
        Ok(())
    }
}

/// How the solver reads a constraint value `c(x)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// `c(x) = 0`
    Equality,
    /// `c(x) ≥ 0`
    Inequality,
}

impl ConstraintKind {
    /// Amount by which `value` violates the constraint (0 when satisfied).
    #[inline]
    pub fn violation(self, value: f64) -> f64 {
        match self {
            ConstraintKind::Equality => value.abs(),
            ConstraintKind::Inequality => (-value).max(0.0),
        }
    }
}

/// Constraint functions paired with how each is to be read.
#[derive(Debug, Default)]
pub struct ConstraintSet {
    entries: Vec<(Box<dyn Constraint>, ConstraintKind)>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn push<C: Constraint + 'static>(&mut self, constraint: C, kind: ConstraintKind) {
        self.entries.push((Box::new(constraint), kind));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&dyn Constraint, ConstraintKind)> {
        self.entries.iter().map(|(c, kind)| (c.as_ref(), *kind))
    }

    /// Sum of squared violations at `x`.
    pub fn squared_violation(&self, x: &Theta) -> PopResult<f64> {
        let view = x.view();
        let mut total = 0.0;
        for (constraint, kind) in self.iter() {
            let v = kind.violation(constraint.evaluate(&view)?);
            total += v * v;
        }
        Ok(total)
    }

    /// `true` iff every constraint is satisfied within `tol`.
    pub fn is_satisfied(&self, x: &Theta, tol: f64) -> PopResult<bool> {
        let view = x.view();
        for (constraint, kind) in self.iter() {
            if kind.violation(constraint.evaluate(&view)?) > tol {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Box constraints `lower ≤ x ≤ upper`; infinite entries are unbounded.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pub lower: Theta,
    pub upper: Theta,
}

impl Bounds {
    /// Construct validated bounds.
    ///
    /// # Errors
    /// - [`OptError::DimensionMismatch`] if `lower` and `upper` differ in
    ///   length.
    /// - [`OptError::InvalidBounds`] for a NaN entry or `lower > upper`.
    pub fn new(lower: Theta, upper: Theta) -> OptResult<Self> {
        if lower.len() != upper.len() {
            return Err(OptError::DimensionMismatch {
                what: "upper bounds",
                expected: lower.len(),
                found: upper.len(),
            });
        }
        for (index, (l, u)) in lower.iter().zip(upper.iter()).enumerate() {
            if l.is_nan() || u.is_nan() {
                return Err(OptError::InvalidBounds { index, reason: "Bounds must not be NaN." });
            }
            if l > u {
                return Err(OptError::InvalidBounds {
                    index,
                    reason: "Lower bound exceeds upper bound.",
                });
            }
        }
        Ok(Self { lower, upper })
    }

    /// `0 ≤ x` on every coordinate.
    pub fn non_negative(dim: usize) -> Self {
        Self { lower: Theta::zeros(dim), upper: Theta::from_elem(dim, f64::INFINITY) }
    }

    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    /// Sum of squared distances from `x` to the box.
    pub fn squared_violation(&self, x: &Theta) -> f64 {
        let mut total = 0.0;
        for ((&xi, &l), &u) in x.iter().zip(self.lower.iter()).zip(self.upper.iter()) {
            let v = (l - xi).max(0.0) + (xi - u).max(0.0);
            total += v * v;
        }
        total
    }
}

/// Choice of line search used inside the L-BFGS solver.
///
/// Parsing:
/// This enum implements `FromStr` and accepts case-insensitive names
/// (`"MoreThuente"`, `"HagerZhang"`). Unknown names return
/// `OptError::InvalidLineSearch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Solver algorithm.
///
/// - `NelderMead`: derivative-free simplex search. Robust on the
///   non-smooth residual norms and rounded conservation constraints used
///   in this crate, and therefore the default.
/// - `Lbfgs(LineSearcher)`: quasi-Newton with finite-difference gradients.
///
/// Parsing accepts `"NelderMead"`, `"LBFGS"` (More–Thuente),
/// `"LBFGS-MoreThuente"` and `"LBFGS-HagerZhang"`, case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverMethod {
    NelderMead,
    Lbfgs(LineSearcher),
}

impl FromStr for SolverMethod {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        match lower.as_str() {
            "neldermead" | "nelder-mead" => Ok(SolverMethod::NelderMead),
            "lbfgs" | "l-bfgs" => Ok(SolverMethod::Lbfgs(LineSearcher::MoreThuente)),
            _ => match lower.strip_prefix("lbfgs-") {
                Some(ls) => Ok(SolverMethod::Lbfgs(ls.parse()?)),
                None => Err(OptError::InvalidSolverMethod {
                    name: s.to_string(),
                    reason: "Valid options are 'NelderMead', 'LBFGS', 'LBFGS-MoreThuente' or \
                             'LBFGS-HagerZhang'.",
                }),
            },
        }
    }
}

/// Driver-level configuration.
///
/// Fields:
/// - `tols: Tolerances` — numerical tolerances and iteration limits.
///   Nelder–Mead uses `tol_cost` as its simplex standard-deviation
///   tolerance; L-BFGS uses both `tol_grad` and `tol_cost`.
/// - `method: SolverMethod` — algorithm.
/// - `penalty: f64` — weight `μ` on squared constraint/bound violations.
/// - `verbose: bool` — if `true`, attaches an observer (behind the
///   `obs_slog` feature) and prints progress.
/// - `lbfgs_mem: Option<usize>` — L-BFGS history size (default 7).
///
/// Default:
/// - `tols`: `tol_grad = None`, `tol_cost = 1e-10`, `max_iter = 5000`
/// - `method`: `NelderMead`
/// - `penalty`: `1e3`
/// - `verbose`: `false`
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOptions {
    pub tols: Tolerances,
    pub method: SolverMethod,
    pub penalty: f64,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl SolverOptions {
    /// Create a new set of solver options.
    ///
    /// # Errors
    /// - [`OptError::InvalidPenalty`] if `penalty` is non-finite or ≤ 0.
    /// - [`OptError::InvalidLBFGSMem`] if `lbfgs_mem == Some(0)`.
    pub fn new(
        tols: Tolerances, method: SolverMethod, penalty: f64, verbose: bool,
        lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if !penalty.is_finite() {
            return Err(OptError::InvalidPenalty {
                value: penalty,
                reason: "Penalty weight must be finite.",
            });
        }
        if penalty <= 0.0 {
            return Err(OptError::InvalidPenalty {
                value: penalty,
                reason: "Penalty weight must be positive.",
            });
        }
        if let Some(m) = lbfgs_mem {
            if m == 0 {
                return Err(OptError::InvalidLBFGSMem {
                    mem: m,
                    reason: "L-BFGS memory must be greater than zero.",
                });
            }
        }
        Ok(Self { tols, method, penalty, verbose, lbfgs_mem })
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: None, tol_cost: Some(1e-10), max_iter: Some(5000) },
            method: SolverMethod::NelderMead,
            penalty: DEFAULT_PENALTY,
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Numerical tolerances and iteration limits used by the solver.
///
/// - `tol_grad`: terminate when the gradient norm falls below this threshold.
/// - `tol_cost`: terminate when the change in cost (or the simplex spread)
///   falls below this threshold.
/// - `max_iter`: hard cap on the number of iterations.
///
/// Any field can be `None` but **at least one** of the three must be provided
/// (see [`Tolerances::new`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Rules
    /// - At least one of `tol_grad`, `tol_cost`, or `max_iter` must be `Some`.
    /// - If provided, tolerances must be **finite and strictly positive**.
    /// - If provided, `max_iter` must be `> 0`.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for non-finite or non-positive tolerances.
    /// - `OptError::InvalidMaxIter` if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Canonical result returned by `minimize`.
///
/// - `x_hat`: best unknown vector found.
/// - `objective`: bare objective `f(x̂)` (no penalty).
/// - `cost`: penalized cost `c(x̂)` the solver minimized.
/// - `converged`: `true` if the solver reported a terminating status other
///   than `NotTerminated`.
/// - `status`: human-readable termination status string.
/// - `iterations`: number of solver iterations performed.
/// - `fn_evals`: function-evaluation counters reported by `argmin`.
/// - `grad_norm`: norm of the last available gradient, if present.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub x_hat: Theta,
    pub objective: f64,
    pub cost: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl SolveOutcome {
    /// Build a validated [`SolveOutcome`] from raw solver state.
    ///
    /// Performs:
    /// - `x_hat` check via `validate_solution` (present and all finite).
    /// - `objective` and `cost` checks via `validate_value` (finite).
    /// - Maps `TerminationStatus` into `(converged, status)`.
    /// - Computes `grad_norm` if a gradient was provided.
    ///
    /// # Errors
    /// - Propagates any validation errors.
    pub fn new(
        x_hat: Theta, objective: f64, cost: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let x_hat = validate_solution(Some(x_hat))?;
        validate_value(objective)?;
        validate_value(cost)?;
        let (converged, status) = match termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            other => (true, format!("{other:?}")),
        };
        let iterations = iterations as usize;
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self { x_hat, objective, cost, converged, status, iterations, fn_evals, grad_norm })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::constraint_generator;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Validation rules of `Tolerances`, `SolverOptions`, and `Bounds`.
    // - Parsing of `LineSearcher` and `SolverMethod`.
    // - Violation accounting in `ConstraintKind`, `ConstraintSet`, and
    //   `Bounds`.
    // - `SolveOutcome` status mapping and validation.
    // -------------------------------------------------------------------------

    #[test]
    fn tolerances_require_at_least_one_setting() {
        assert_eq!(Tolerances::new(None, None, None), Err(OptError::NoTolerancesProvided));
        assert!(Tolerances::new(None, None, Some(10)).is_ok());
    }

    #[test]
    fn tolerances_reject_invalid_values() {
        assert!(matches!(
            Tolerances::new(Some(-1.0), None, None),
            Err(OptError::InvalidTolGrad { .. })
        ));
        assert!(matches!(
            Tolerances::new(None, Some(f64::NAN), None),
            Err(OptError::InvalidTolCost { .. })
        ));
        assert!(matches!(
            Tolerances::new(None, None, Some(0)),
            Err(OptError::InvalidMaxIter { max_iter: 0, .. })
        ));
    }

    #[test]
    fn solver_options_validate_penalty_and_memory() {
        let tols = Tolerances::new(None, Some(1e-8), Some(100)).unwrap();
        assert!(matches!(
            SolverOptions::new(tols, SolverMethod::NelderMead, 0.0, false, None),
            Err(OptError::InvalidPenalty { .. })
        ));
        assert!(matches!(
            SolverOptions::new(tols, SolverMethod::NelderMead, f64::INFINITY, false, None),
            Err(OptError::InvalidPenalty { .. })
        ));
        assert!(matches!(
            SolverOptions::new(
                tols,
                SolverMethod::Lbfgs(LineSearcher::HagerZhang),
                10.0,
                false,
                Some(0)
            ),
            Err(OptError::InvalidLBFGSMem { mem: 0, .. })
        ));
        assert!(SolverOptions::new(tols, SolverMethod::NelderMead, 10.0, true, Some(5)).is_ok());
    }

    #[test]
    fn default_solver_options_are_valid() {
        let d = SolverOptions::default();
        let rebuilt = SolverOptions::new(
            Tolerances::new(d.tols.tol_grad, d.tols.tol_cost, d.tols.max_iter).unwrap(),
            d.method,
            d.penalty,
            d.verbose,
            d.lbfgs_mem,
        )
        .unwrap();
        assert_eq!(rebuilt, d);
    }

    #[test]
    // Purpose
    // -------
    // Verify method names parse case-insensitively and carry the line
    // search choice.
    //
    // Given
    // -----
    // - Several spellings, one invalid method and one invalid line search.
    //
    // Expect
    // ------
    // - Matching variants; `InvalidSolverMethod` / `InvalidLineSearch`
    //   for the invalid names.
    fn solver_method_parsing() {
        assert_eq!("neldermead".parse::<SolverMethod>(), Ok(SolverMethod::NelderMead));
        assert_eq!("Nelder-Mead".parse::<SolverMethod>(), Ok(SolverMethod::NelderMead));
        assert_eq!(
            "LBFGS".parse::<SolverMethod>(),
            Ok(SolverMethod::Lbfgs(LineSearcher::MoreThuente))
        );
        assert_eq!(
            "lbfgs-HagerZhang".parse::<SolverMethod>(),
            Ok(SolverMethod::Lbfgs(LineSearcher::HagerZhang))
        );
        assert!(matches!(
            "simplex".parse::<SolverMethod>(),
            Err(OptError::InvalidSolverMethod { .. })
        ));
        assert!(matches!(
            "lbfgs-backtracking".parse::<SolverMethod>(),
            Err(OptError::InvalidLineSearch { .. })
        ));
    }

    #[test]
    fn constraint_kind_violation() {
        assert_eq!(ConstraintKind::Equality.violation(-0.5), 0.5);
        assert_eq!(ConstraintKind::Equality.violation(0.0), 0.0);
        assert_eq!(ConstraintKind::Inequality.violation(2.0), 0.0);
        assert_eq!(ConstraintKind::Inequality.violation(-2.0), 2.0);
    }

    #[test]
    // Purpose
    // -------
    // Check the squared-violation total of a mixed constraint set.
    //
    // Given
    // -----
    // - x = [1, 3].
    // - x0 − x1 ≥ 0 (violated by 2) and x1 − x0 = 0 (violated by 2).
    // - x1 − x0 ≥ 0 (satisfied).
    //
    // Expect
    // ------
    // - Squared violation 4 + 4 = 8, and `is_satisfied` false.
    fn constraint_set_accumulates_squared_violations() {
        // Arrange
        let mut set = ConstraintSet::new();
        set.push(constraint_generator(0, 1), ConstraintKind::Inequality);
        set.push(constraint_generator(1, 0), ConstraintKind::Equality);
        set.push(constraint_generator(1, 0), ConstraintKind::Inequality);
        let x = array![1.0, 3.0];

        // Act
        let total = set.squared_violation(&x).unwrap();

        // Assert
        assert_eq!(set.len(), 3);
        assert_eq!(total, 8.0);
        assert_eq!(set.is_satisfied(&x, 1e-9), Ok(false));
        assert_eq!(set.is_satisfied(&array![2.0, 2.0], 1e-9), Ok(true));
    }

    #[test]
    fn bounds_validation_and_violation() {
        assert!(matches!(
            Bounds::new(array![0.0, 1.0], array![1.0]),
            Err(OptError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            Bounds::new(array![2.0], array![1.0]),
            Err(OptError::InvalidBounds { index: 0, .. })
        ));
        let b = Bounds::new(array![0.0, 0.0], array![1.0, f64::INFINITY]).unwrap();
        assert_eq!(b.squared_violation(&array![0.5, 10.0]), 0.0);
        assert_eq!(b.squared_violation(&array![-1.0, 10.0]), 1.0);
        assert_eq!(b.squared_violation(&array![3.0, -2.0]), 8.0);
        assert_eq!(Bounds::non_negative(3).dim(), 3);
    }

    #[test]
    fn solve_outcome_maps_status_and_validates() {
        let out = SolveOutcome::new(
            array![1.0, 2.0],
            0.5,
            0.5,
            TerminationStatus::NotTerminated,
            3,
            FnEvalMap::new(),
            Some(array![3.0, 4.0]),
        )
        .unwrap();
        assert!(!out.converged);
        assert_eq!(out.status, "Not terminated");
        assert_eq!(out.grad_norm, Some(5.0));

        let bad = SolveOutcome::new(
            array![f64::NAN],
            0.5,
            0.5,
            TerminationStatus::NotTerminated,
            0,
            FnEvalMap::new(),
            None,
        );
        assert!(matches!(bad, Err(OptError::InvalidSolution { index: 0, .. })));
    }
}
