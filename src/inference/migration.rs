//! inference::migration — estimate migration rates and within-population
//! coalescence times jointly from an Fst matrix.
//!
//! The objective is the joint residual norm (`f_to_m`) over the joint
//! unknown layout: `n² − n` off-diagonal migration rates followed by `n`
//! within-population times. Each population's flow balance enters as an
//! equality constraint, and every unknown is bounded below by zero.
use ndarray::{Array1, Array2};

use crate::inference::ensemble::Restartable;
use crate::optimization::{
    errors::OptResult,
    solver::{
        Bounds, ConstraintKind, ConstraintSet, Cost, LineSearcher, Objective, SolveOutcome,
        SolverMethod, SolverOptions, Theta, minimize,
    },
};
use crate::structure::{
    constraints::cons_migration_constraint_generator,
    errors::{PopError, PopResult},
    feasibility::check_conservative,
    layout::{joint_len, joint_unknowns, slatkin_ratio, split_joint_unknowns, square_dim},
    objectives::f_to_m,
};

/// Starting migration rate on every off-diagonal entry.
const START_MIGRATION: f64 = 0.5;

/// F → (M, T) problem for `n` populations.
#[derive(Debug)]
pub struct MigrationProblem {
    /// Row-major `n × n` Fst matrix.
    fst: Array1<f64>,
    n: usize,
    constraints: ConstraintSet,
    bounds: Bounds,
}

/// Result of [`MigrationProblem::fit`].
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationFit {
    /// `n × n` migration matrix with zero diagonal.
    pub migration: Array2<f64>,
    /// Within-population coalescence times.
    pub within: Array1<f64>,
    pub outcome: SolveOutcome,
    /// `check_conservative(&migration)`.
    pub conservative: bool,
}

impl MigrationProblem {
    /// Build the problem from a square Fst matrix. The diagonal is ignored;
    /// off-diagonal values are domain-checked.
    ///
    /// # Errors
    /// - [`PopError::NotSquare`] for a non-square matrix.
    /// - [`PopError::DegenerateShape`] for an empty matrix.
    /// - [`PopError::InvalidFst`] for an off-diagonal value outside (−1, 1),
    ///   indexed by its row-major position.
    pub fn new(fst: &Array2<f64>) -> PopResult<Self> {
        let n = square_dim(&fst.view())?;
        if n == 0 {
            return Err(PopError::DegenerateShape { n });
        }
        for ((i, k), &f) in fst.indexed_iter() {
            if i != k {
                slatkin_ratio(f, n * i + k)?;
            }
        }
        let flat: Array1<f64> = fst.iter().copied().collect();

        let mut constraints = ConstraintSet::new();
        for i in 0..n {
            constraints.push(cons_migration_constraint_generator(n, i), ConstraintKind::Equality);
        }
        let bounds = Bounds::non_negative(joint_len(n));
        Ok(Self { fst: flat, n, constraints, bounds })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Off-diagonal migration rates `0.5`, within-population times `1.0`.
    pub fn default_start(&self) -> Theta {
        let mut x0 = Theta::from_elem(joint_len(self.n), START_MIGRATION);
        let off = self.n * self.n - self.n;
        x0.slice_mut(ndarray::s![off..]).fill(1.0);
        x0
    }

    /// Joint start vector from a migration matrix and within-times.
    ///
    /// # Errors
    /// Shape errors from [`joint_unknowns`], or
    /// [`PopError::ShapeMismatch`] if `migration` is not `n × n`.
    pub fn start_from(&self, migration: &Array2<f64>, within: &Array1<f64>) -> PopResult<Theta> {
        if migration.dim() != (self.n, self.n) {
            return Err(PopError::ShapeMismatch {
                expected: (self.n, self.n),
                found: migration.dim(),
            });
        }
        joint_unknowns(&migration.view(), &within.view())
    }

    /// Solver configuration for this problem: L-BFGS with More–Thuente line
    /// search, every other setting as in `SolverOptions::default()`.
    ///
    /// Avoid Nelder–Mead here. Each initial simplex vertex moves one rate by
    /// 5%, which unbalances a rounded row sum and pays at least `μ · 0.01²`,
    /// so the simplex contracts around the start.
    pub fn default_options() -> SolverOptions {
        SolverOptions {
            method: SolverMethod::Lbfgs(LineSearcher::MoreThuente),
            ..SolverOptions::default()
        }
    }

    /// Minimize the joint residual from `x0`.
    ///
    /// Use [`MigrationProblem::default_options`] unless a specific solver is
    /// required.
    ///
    /// # Errors
    /// Propagates every error of [`minimize`].
    pub fn fit(&self, x0: Theta, opts: &SolverOptions) -> OptResult<MigrationFit> {
        let outcome = minimize(self, &self.constraints, Some(&self.bounds), x0, opts)?;
        let (migration, within) = split_joint_unknowns(&outcome.x_hat.view(), self.n)?;
        let conservative = check_conservative(&migration);
        Ok(MigrationFit { migration, within, outcome, conservative })
    }
}

impl Objective for MigrationProblem {
    fn dim(&self) -> usize {
        joint_len(self.n)
    }

    fn value(&self, x: &Theta) -> OptResult<Cost> {
        Ok(f_to_m(&x.view(), &self.fst.view(), self.n)?)
    }
}

impl Restartable for MigrationProblem {
    fn solve_from(
        &self, x0: Theta, opts: &SolverOptions,
    ) -> OptResult<(Array2<f64>, SolveOutcome)> {
        let fit = self.fit(x0, opts)?;
        Ok((fit.migration, fit.outcome))
    }
}
