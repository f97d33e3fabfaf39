//! inference::coalescence — estimate coalescence times from pairwise Fst.
//!
//! Purpose
//! -------
//! Package the Slatkin residual, the "between ≥ within" ordering
//! constraints, and non-negativity bounds into a single problem that can be
//! handed to [`minimize`], then turn the solution back into a symmetric
//! `n × n` coalescence-time matrix.
//!
//! Conventions
//! -----------
//! - Fst observations are an upper-triangular vector in pair order
//!   (`structure::layout`); [`CoalescenceProblem::from_fst_matrix`] reads
//!   the upper triangle of a full matrix.
//! - Unknowns use the coalescence-only layout: `C(n,2)` between-population
//!   times, then `n` within-population times.
use ndarray::{Array1, Array2};

use crate::inference::ensemble::Restartable;
use crate::optimization::{
    errors::OptResult,
    solver::{
        Bounds, ConstraintKind, ConstraintSet, Cost, Objective, SolveOutcome, SolverOptions,
        Theta, minimize,
    },
};
use crate::structure::{
    combinatorics::num_pairs,
    constraints::constraint_generator,
    errors::{PopError, PopResult},
    feasibility::check_constraint,
    layout::{
        coalescence_len, coalescence_vector_to_matrix, expect_len, fst_matrix_to_vector,
        slatkin_ratio,
    },
    objectives::compute_coalescence,
};

/// F → T problem for `n` populations.
#[derive(Debug)]
pub struct CoalescenceProblem {
    fst: Array1<f64>,
    n: usize,
    constraints: ConstraintSet,
    bounds: Bounds,
}

/// Result of [`CoalescenceProblem::fit`].
#[derive(Debug, Clone, PartialEq)]
pub struct CoalescenceFit {
    /// Symmetric coalescence-time matrix.
    pub matrix: Array2<f64>,
    pub outcome: SolveOutcome,
    /// `check_constraint(&matrix)`.
    pub feasible: bool,
}

impl CoalescenceProblem {
    /// Build the problem from an upper-triangular Fst vector.
    ///
    /// Every Fst value is domain-checked here so a bad input fails before
    /// the solver starts.
    ///
    /// # Errors
    /// - [`PopError::DegenerateShape`] for `n == 0`.
    /// - [`PopError::LengthMismatch`] if `fst.len() != C(n,2)`.
    /// - [`PopError::InvalidFst`] for a value outside (−1, 1).
    pub fn new(fst: Array1<f64>, n: usize) -> PopResult<Self> {
        if n == 0 {
            return Err(PopError::DegenerateShape { n });
        }
        let pairs = num_pairs(n);
        expect_len("Fst vector", fst.len(), pairs)?;
        for (index, &f) in fst.iter().enumerate() {
            slatkin_ratio(f, index)?;
        }

        let mut constraints = ConstraintSet::new();
        let mut k = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                constraints.push(constraint_generator(k, pairs + i), ConstraintKind::Inequality);
                constraints.push(constraint_generator(k, pairs + j), ConstraintKind::Inequality);
                k += 1;
            }
        }
        let bounds = Bounds::non_negative(coalescence_len(n));
        Ok(Self { fst, n, constraints, bounds })
    }

    /// Build the problem from the upper triangle of a square Fst matrix.
    ///
    /// # Errors
    /// [`PopError::NotSquare`] plus everything [`CoalescenceProblem::new`]
    /// returns.
    pub fn from_fst_matrix(fst: &Array2<f64>) -> PopResult<Self> {
        let vector = fst_matrix_to_vector(&fst.view())?;
        Self::new(vector, fst.nrows())
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Unit within-population times, with each between-population time set
    /// by the Slatkin identity so the residual starts at zero.
    pub fn default_start(&self) -> Theta {
        let mut x0 = Theta::ones(coalescence_len(self.n));
        for (k, &f) in self.fst.iter().enumerate() {
            x0[k] = (1.0 + f) / (1.0 - f);
        }
        x0
    }

    /// Minimize the Slatkin residual from `x0`.
    ///
    /// # Errors
    /// Propagates every error of [`minimize`].
    pub fn fit(&self, x0: Theta, opts: &SolverOptions) -> OptResult<CoalescenceFit> {
        let outcome = minimize(self, &self.constraints, Some(&self.bounds), x0, opts)?;
        let matrix = coalescence_vector_to_matrix(&outcome.x_hat.view(), self.n)?;
        let feasible = check_constraint(&matrix);
        Ok(CoalescenceFit { matrix, outcome, feasible })
    }
}

impl Objective for CoalescenceProblem {
    fn dim(&self) -> usize {
        coalescence_len(self.n)
    }

    fn value(&self, x: &Theta) -> OptResult<Cost> {
        Ok(compute_coalescence(&x.view(), &self.fst.view(), self.n)?)
    }
}

impl Restartable for CoalescenceProblem {
    fn solve_from(
        &self, x0: Theta, opts: &SolverOptions,
    ) -> OptResult<(Array2<f64>, SolveOutcome)> {
        let fit = self.fit(x0, opts)?;
        Ok((fit.matrix, fit.outcome))
    }
}
