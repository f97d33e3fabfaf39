//! inference::ensemble — repeated solves from several starting points.
//!
//! The Fst → T and Fst → (M, T) systems are usually under-determined, so
//! a single solve reports one point of a solution set. Solving from
//! several starts and summarizing the resulting matrices (elementwise mean,
//! diameter) shows how well the data pin the estimate down.
use ndarray::Array2;

use crate::optimization::{
    errors::{OptError, OptResult},
    solver::{SolveOutcome, SolverOptions, Theta},
};
use crate::structure::diagnostics::{diameter, matrix_mean};

/// A problem that can be solved from an arbitrary start and reports its
/// estimate as a matrix.
pub trait Restartable {
    fn solve_from(
        &self, x0: Theta, opts: &SolverOptions,
    ) -> OptResult<(Array2<f64>, SolveOutcome)>;
}

/// Matrices and outcomes from one solve per start, plus their summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Ensemble {
    pub estimates: Vec<Array2<f64>>,
    pub outcomes: Vec<SolveOutcome>,
    /// Elementwise mean of `estimates`.
    pub mean: Array2<f64>,
    /// Largest pairwise `matrix_distance` between `estimates`.
    pub diameter: f64,
}

impl Ensemble {
    /// Solve `problem` from every start in `starts`.
    ///
    /// # Errors
    /// - [`OptError::NoStartingPoints`] if `starts` is empty.
    /// - The first error raised by a solve.
    /// - [`OptError::Domain`] wrapping `DegenerateShape` when two or more
    ///   estimates are `1 × 1` (their distance is undefined).
    pub fn from_restarts<P, I>(problem: &P, starts: I, opts: &SolverOptions) -> OptResult<Self>
    where
        P: Restartable + ?Sized,
        I: IntoIterator<Item = Theta>,
    {
        let mut estimates = Vec::new();
        let mut outcomes = Vec::new();
        for x0 in starts {
            let (matrix, outcome) = problem.solve_from(x0, opts)?;
            estimates.push(matrix);
            outcomes.push(outcome);
        }
        if estimates.is_empty() {
            return Err(OptError::NoStartingPoints);
        }
        let mean = matrix_mean(&estimates)?;
        let diameter = diameter(&estimates)?;
        Ok(Self { estimates, outcomes, mean, diameter })
    }

    pub fn len(&self) -> usize {
        self.estimates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }

    /// Index of the run with the lowest penalized cost (first on ties), or
    /// `None` for an ensemble without runs.
    pub fn best_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (idx, out) in self.outcomes.iter().enumerate() {
            match best {
                Some(b) if self.outcomes[b].cost <= out.cost => {}
                _ => best = Some(idx),
            }
        }
        best
    }

    /// Estimate and outcome of the lowest-cost run.
    pub fn best(&self) -> Option<(&Array2<f64>, &SolveOutcome)> {
        let idx = self.best_index()?;
        Some((self.estimates.get(idx)?, self.outcomes.get(idx)?))
    }
}

/// `base` scaled by each factor in turn.
///
/// Scaling keeps zeros at zero and preserves sign, so starts built from a
/// non-negative base stay inside non-negative bounds.
pub fn scaled_starts(base: &Theta, factors: &[f64]) -> Vec<Theta> {
    factors.iter().map(|&s| base * s).collect()
}
