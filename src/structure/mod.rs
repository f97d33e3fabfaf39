//! structure — Fst/coalescence identities, constraints, and diagnostics.
//!
//! Purpose
//! -------
//! Hold the numerical core that turns Fst observations into something an
//! optimizer can work with: objective functions, constraint functions,
//! feasibility predicates for the solutions it returns, and diagnostics for
//! comparing repeated solves. Everything here is a pure function of its
//! inputs.
//!
//! Key behaviors
//! -------------
//! - [`combinatorics`]: exact `C(n, k)` for sizing pairwise layouts.
//! - [`layout`]: flat unknown/Fst layouts, pair indexing, matrix
//!   conversions, and the domain-checked Slatkin ratio.
//! - [`objectives`]: the coalescence-only residual
//!   ([`compute_coalescence`]) and the joint migration + coalescence
//!   residual ([`f_to_m`]).
//! - [`constraints`]: ordering and conservation constraint values built by
//!   [`constraint_generator`] and [`cons_migration_constraint_generator`].
//! - [`feasibility`]: [`check_constraint`] and [`check_conservative`].
//! - [`diagnostics`]: [`matrix_distance`], [`diameter`], [`matrix_mean`].
//!
//! Invariants & assumptions
//! ------------------------
//! - No state is held between calls; every routine may be called from
//!   multiple threads on independent inputs.
//! - Fatal problems (bad lengths, Fst on or beyond ±1, `k > n`, empty
//!   collections) are reported as [`PopError`]; feasibility checks return
//!   `bool`.
//!
//! Conventions
//! -----------
//! - Vectors and matrices are `ndarray` containers over `f64`; flat inputs
//!   are taken as `ArrayView1` so callers can pass owned arrays, slices, or
//!   optimizer state without copying.
//! - No logging or I/O happens in this subtree.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its invariants and error
//!   branches; `tests/` exercises the objectives together with the solver.

pub mod combinatorics;
pub mod constraints;
pub mod diagnostics;
pub mod errors;
pub mod feasibility;
pub mod layout;
pub mod objectives;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::combinatorics::comb;
pub use self::constraints::{
    ConservationConstraint, Constraint, OrderingConstraint, cons_migration_constraint_generator,
    constraint_generator,
};
pub use self::diagnostics::{diameter, matrix_distance, matrix_mean};
pub use self::errors::{PopError, PopResult};
pub use self::feasibility::{check_conservative, check_constraint};
pub use self::objectives::{compute_coalescence, f_to_m};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use population_structure::structure::prelude::*;
//
// to import the structure-core surface in a single line.

pub mod prelude {
    pub use super::combinatorics::comb;
    pub use super::constraints::{
        Constraint, cons_migration_constraint_generator, constraint_generator,
    };
    pub use super::diagnostics::{diameter, matrix_distance, matrix_mean};
    pub use super::errors::{PopError, PopResult};
    pub use super::feasibility::{check_conservative, check_constraint};
    pub use super::objectives::{compute_coalescence, f_to_m};
}
