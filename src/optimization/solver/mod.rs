//! solver — argmin-powered constrained minimization.
//!
//! Purpose
//! -------
//! Provide the minimization layer used by the inference drivers: callers
//! implement [`Objective`], describe constraints with a [`ConstraintSet`]
//! and optional [`Bounds`], and call [`minimize`].
//!
//! Key behaviors
//! -------------
//! - Fold constraints and bounds into a quadratic penalty via
//!   [`adapter::PenalizedProblem`], which implements argmin's
//!   `CostFunction` and a finite-difference `Gradient`.
//! - Select Nelder–Mead or L-BFGS (More–Thuente / Hager–Zhang) through
//!   [`builders`] based on [`SolverMethod`].
//! - Execute through [`run`] and normalize results into a
//!   [`SolveOutcome`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Objectives report domain problems as errors, never by clamping; a
//!   non-finite cost anywhere aborts the solve with
//!   [`OptError::NonFiniteCost`](crate::optimization::errors::OptError).
//! - Configuration types ([`Tolerances`], [`SolverOptions`], [`Bounds`])
//!   are validated on construction.
//!
//! Conventions
//! -----------
//! - Unknowns are a flat [`Theta`] (`Array1<f64>`) in whatever layout the
//!   objective documents.
//! - Inequality constraints read `c(x) ≥ 0`; equality constraints read
//!   `c(x) = 0`.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover configuration, penalty accounting,
//!   finite-difference fallbacks, and solves on smooth toy objectives.
//! - `tests/` drives the solver through the population-genetic problems.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::minimize;
pub use self::traits::{
    Bounds, ConstraintKind, ConstraintSet, LineSearcher, Objective, SolveOutcome, SolverMethod,
    SolverOptions, Tolerances,
};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, DEFAULT_PENALTY, FnEvalMap, Grad, Theta};

pub mod prelude {
    pub use super::api::minimize;
    pub use super::traits::{
        Bounds, ConstraintKind, ConstraintSet, Objective, SolveOutcome, SolverMethod,
        SolverOptions, Tolerances,
    };
    pub use super::types::Theta;
}
