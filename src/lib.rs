//! population_structure — Fst, coalescence times, and migration rates.
//!
//! Purpose
//! -------
//! Serve as the crate root for inferring population structure from
//! pairwise Fst: coalescence-time matrices via the Slatkin identity,
//! migration matrices via the joint migration + coalescence identities,
//! and component-wise solving of disconnected migration networks.
//!
//! Key behaviors
//! -------------
//! - [`structure`]: combinatorics, flat layouts, residual objectives,
//!   constraint factories, feasibility predicates, and restart diagnostics.
//! - [`graph`]: connected components of a migration network, splitting
//!   and reassembly of per-component matrices.
//! - [`optimization`]: argmin-backed constrained minimization with a
//!   validated configuration surface.
//! - [`inference`]: F → T and F → (M, T) drivers, restart ensembles, and
//!   component-wise F → T.
//!
//! Invariants & assumptions
//! ------------------------
//! - Fst values entering any identity must lie strictly inside (−1, 1);
//!   anything else is an error, never clamped.
//! - All numerical routines are pure; the only output is the optional
//!   solver progress observer behind the `obs_slog` feature.
//!
//! Conventions
//! -----------
//! - Populations are indexed `0..n`; unordered pairs `i < j` are
//!   enumerated row-major over the upper triangle.
//! - `structure` and `graph` report [`PopError`](structure::PopError);
//!   `optimization` and `inference` report
//!   [`OptError`](optimization::errors::OptError), which wraps `PopError`.
//!
//! Testing notes
//! -------------
//! - Unit tests live in each module; `tests/` runs the end-to-end pipeline
//!   on inputs synthesized from known coalescence matrices.

pub mod graph;
pub mod inference;
pub mod optimization;
pub mod structure;
