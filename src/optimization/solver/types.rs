//! solver::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the numeric types and argmin solver aliases used by the
//! constrained-minimization driver, so the rest of the optimizer stays
//! agnostic to `ndarray` and argmin generics.
//!
//! Conventions
//! -----------
//! - `Theta` is the flat unknown vector in whatever layout the objective
//!   documents (coalescence-only or joint).
//! - `Cost` is the penalized scalar the solver minimizes; the unpenalized
//!   objective value is reported separately in the outcome.
//! - This module defines no runtime behavior.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    neldermead::NelderMead,
    quasinewton::LBFGS,
};
use ndarray::Array1;
use std::collections::HashMap;

/// Flat unknown vector handed to the solver.
pub type Theta = Array1<f64>;

/// Gradient of the penalized cost, matching the shape of `Theta`.
pub type Grad = Array1<f64>;

/// Scalar value minimized by the solver.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps human-readable counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Default quadratic-penalty weight applied to constraint and bound
/// violations.
pub const DEFAULT_PENALTY: f64 = 1e3;

/// Hager–Zhang line search specialized to this crate’s numeric types.
pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

/// More–Thuente line search specialized to this crate’s numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS solver wired to the Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS solver wired to the More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;

/// Derivative-free Nelder–Mead simplex solver.
pub type Simplex = NelderMead<Theta, Cost>;
