//! graph — connected-component decomposition of migration networks.
//!
//! Purpose
//! -------
//! Let a disconnected migration network be solved component by component:
//! label the components, cut the full matrix into per-component blocks,
//! and put solved blocks back together without assuming global
//! connectivity.
//!
//! Key behaviors
//! -------------
//! - [`find_components`] labels components by breadth-first search over
//!   the undirected view of the migration matrix.
//! - [`split_migration_matrix`] and [`split_migration`] extract the induced
//!   submatrix of each component (works for any matrix indexed by
//!   population, e.g. Fst matrices as well as migration matrices).
//! - [`reassemble_matrix`] rebuilds a full matrix, filling cross-component
//!   entries according to [`MatrixKind`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Labels are 1-based and assigned in discovery order; new components
//!   start at the smallest unvisited vertex.
//! - Errors use the shared [`PopError`](crate::structure::PopError).
//!
//! Testing notes
//! -------------
//! - Unit tests in [`components`] cover labeling, round trips, and fill
//!   values; `tests/` runs component-wise inference end to end.

pub mod components;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::components::{
    ComponentMap, MatrixKind, find_components, reassemble_matrix, split_migration,
    split_migration_matrix,
};
