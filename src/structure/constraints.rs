//! structure::constraints — constraint functions handed to an optimizer.
//!
//! Purpose
//! -------
//! Provide small value types that capture indices at construction time and
//! evaluate a scalar constraint against any candidate unknown vector. An
//! optimizer holds them as `Box<dyn Constraint>` and calls
//! [`Constraint::evaluate`] repeatedly.
//!
//! Key behaviors
//! -------------
//! - [`constraint_generator`] → [`OrderingConstraint`]: `x[i] − x[j]`.
//!   Pairing a between-population index with a within-population index
//!   encodes "between ≥ within".
//! - [`cons_migration_constraint_generator`] → [`ConservationConstraint`]:
//!   rebuilds `M` from the off-diagonal block of `x` and returns
//!   `round₂(Σ_k M(i,k)) − round₂(Σ_k M(k,i))`.
//!
//! Conventions
//! -----------
//! - Constraints return a raw scalar. Whether it is read as `= 0` or
//!   `≥ 0` is decided by whoever assembles the optimizer's constraint set
//!   (see `optimization::ConstraintKind`), never here.
use ndarray::ArrayView1;

use crate::structure::{
    errors::{PopError, PopResult},
    feasibility::round2,
    layout::migration_from_unknowns,
};

/// A scalar function of the optimizer's unknown vector.
pub trait Constraint: std::fmt::Debug {
    fn evaluate(&self, x: &ArrayView1<f64>) -> PopResult<f64>;
}

/// `x[i] − x[j]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderingConstraint {
    pub i: usize,
    pub j: usize,
}

impl Constraint for OrderingConstraint {
    fn evaluate(&self, x: &ArrayView1<f64>) -> PopResult<f64> {
        let len = x.len();
        let xi = x.get(self.i).ok_or(PopError::IndexOutOfBounds { index: self.i, len })?;
        let xj = x.get(self.j).ok_or(PopError::IndexOutOfBounds { index: self.j, len })?;
        Ok(xi - xj)
    }
}

/// Flow balance at population `i` of an `n`-population migration matrix
/// stored in the joint unknown layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConservationConstraint {
    pub n: usize,
    pub i: usize,
}

impl Constraint for ConservationConstraint {
    fn evaluate(&self, x: &ArrayView1<f64>) -> PopResult<f64> {
        if self.i >= self.n {
            return Err(PopError::IndexOutOfBounds { index: self.i, len: self.n });
        }
        let m = migration_from_unknowns(x, self.n)?;
        Ok(round2(m.row(self.i).sum()) - round2(m.column(self.i).sum()))
    }
}

/// Ordering constraint `x[i] − x[j]`.
pub fn constraint_generator(i: usize, j: usize) -> OrderingConstraint {
    OrderingConstraint { i, j }
}

/// Conservation constraint for population `i` out of `n`.
pub fn cons_migration_constraint_generator(n: usize, i: usize) -> ConservationConstraint {
    ConservationConstraint { n, i }
}
