//! optimization — constrained minimization and its error surface.
//!
//! Purpose
//! -------
//! Provide the argmin-backed minimization layer used by the inference
//! drivers, together with a single error/result surface. Callers implement
//! an objective, attach constraints and bounds, and receive a validated
//! outcome without touching backend solver details.
//!
//! Key behaviors
//! -------------
//! - [`solver`]: the `Objective` contract, constraint sets, bounds,
//!   solver configuration, and the `minimize` entry point (Nelder–Mead or
//!   L-BFGS on a quadratic-penalty cost).
//! - [`errors`]: configuration issues, numerical failures, backend solver
//!   errors, and domain errors from `structure` normalized into
//!   `OptError` / `OptResult<T>`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite once validation has passed; invalid states are
//!   reported as `OptError`, not panics.
//! - Domain errors raised inside an objective or constraint travel through
//!   argmin's type-erased error and come back out as
//!   `OptError::Domain(PopError)`.
//!
//! Conventions
//! -----------
//! - Public entry points that can fail return `OptResult<T>`; callers never
//!   see raw argmin errors.
//! - No I/O or logging, except the optional progress observer behind the
//!   `obs_slog` feature.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules cover solver wiring, tolerance handling,
//!   penalty accounting, and solves on toy objectives; `errors` covers the
//!   conversions from backend and domain errors.

pub mod errors;
pub mod solver;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use population_structure::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::solver::prelude::*;
}
