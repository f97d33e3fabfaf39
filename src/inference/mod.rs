//! inference — end-to-end estimation drivers built on the optimizer.
//!
//! Purpose
//! -------
//! Turn observed pairwise Fst into population-structure estimates by
//! packaging the residual objectives, constraint factories, and bounds of
//! [`crate::structure`] into problems solved by
//! [`crate::optimization::solver::minimize`].
//!
//! Key behaviors
//! -------------
//! - [`CoalescenceProblem`]: F → T. Slatkin residual, "between ≥ within"
//!   ordering constraints, non-negative times. Fits report whether the
//!   resulting matrix passes `check_constraint`.
//! - [`MigrationProblem`]: F → (M, T). Joint residual, per-population flow
//!   balance as equality constraints, non-negative unknowns. Fits report
//!   whether the migration matrix passes `check_conservative`.
//! - [`Ensemble`]: repeated solves from several starts, summarized by the
//!   elementwise mean and the diameter.
//! - [`fit_by_components`]: F → T per connected component of a migration
//!   network, reassembled with `+∞` between components.
//!
//! Invariants & assumptions
//! ------------------------
//! - Fst inputs are domain-checked when a problem is constructed, so a
//!   value of ±1 fails before any solver work.
//! - Errors surface as [`OptError`](crate::optimization::errors::OptError);
//!   domain and shape problems arrive wrapped in `OptError::Domain`.
//!
//! Downstream usage
//! ----------------
//! - Build a problem, take `default_start()` (or build starts explicitly),
//!   and call `fit` with a `SolverOptions`
//!   (`MigrationProblem::default_options()` for migration fits).
//! - Use [`Ensemble::from_restarts`] with [`scaled_starts`] to gauge how
//!   well the data determine the estimate.
//!
//! Testing notes
//! -------------
//! - Unit tests sit next to each driver; `tests/` runs the full pipeline on
//!   synthesized inputs.

pub mod coalescence;
pub mod components;
pub mod ensemble;
pub mod migration;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::coalescence::{CoalescenceFit, CoalescenceProblem};
pub use self::components::{ComponentFit, fit_by_components};
pub use self::ensemble::{Ensemble, Restartable, scaled_starts};
pub use self::migration::{MigrationFit, MigrationProblem};

pub mod prelude {
    pub use super::coalescence::{CoalescenceFit, CoalescenceProblem};
    pub use super::components::{ComponentFit, fit_by_components};
    pub use super::ensemble::{Ensemble, scaled_starts};
    pub use super::migration::{MigrationFit, MigrationProblem};
}
