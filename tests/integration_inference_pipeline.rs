//! Integration tests for the population-structure inference pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end path from observed Fst to estimated
//!   coalescence times and migration rates, through the public API only.
//! - Use inputs synthesized from known coalescence matrices, so exact
//!   solutions are available to compare against.
//!
//! Coverage
//! --------
//! - `structure`: layout conversions, the Slatkin identity, feasibility
//!   predicates, and diagnostics as seen by a caller.
//! - `inference`: `CoalescenceProblem`, `MigrationProblem`, `Ensemble`,
//!   and `fit_by_components`.
//! - `graph`: component discovery and reassembly around a solve.
//! - `optimization::solver`: `SolverOptions` built from parsed method
//!   names and validated tolerances.
//!
//! Exclusions
//! ----------
//! - Fine-grained checks of individual helpers; those are unit-tested next
//!   to the code.
//! - The `obs_slog` observer, which only prints progress.
use approx::assert_abs_diff_eq;
use ndarray::{Array2, array};
use population_structure::{
    graph::{MatrixKind, reassemble_matrix, split_migration, split_migration_matrix},
    inference::{CoalescenceProblem, Ensemble, MigrationProblem, fit_by_components, scaled_starts},
    optimization::{
        errors::OptError,
        solver::{Objective, SolverMethod, SolverOptions, Tolerances},
    },
    structure::{
        PopError, check_constraint, compute_coalescence,
        layout::{coalescence_matrix_to_vector, coalescence_to_fst, fst_matrix_to_vector},
    },
};

/// Purpose
/// -------
/// A four-population coalescence matrix whose between-population times
/// all exceed both within-population times.
///
/// Returns
/// -------
/// - Symmetric `4 × 4` matrix with diagonal (1, 2, 1.5, 3).
fn reference_coalescence() -> Array2<f64> {
    array![
        [1.0, 2.5, 2.0, 4.0],
        [2.5, 2.0, 3.0, 3.5],
        [2.0, 3.0, 1.5, 3.2],
        [4.0, 3.5, 3.2, 3.0],
    ]
}

/// Purpose
/// -------
/// Default solver configuration with a tighter iteration cap, parsed from
/// a method name the way a front-end would.
fn nelder_mead_options() -> SolverOptions {
    let tols = Tolerances::new(None, Some(1e-12), Some(4000)).unwrap();
    let method: SolverMethod = "NelderMead".parse().unwrap();
    SolverOptions::new(tols, method, 1e3, false, None).unwrap()
}

#[test]
// Purpose
// -------
// Fst synthesized from a known T must be reproduced exactly by the
// default start, and the fitted matrix must map back to the same Fst.
//
// Given
// -----
// - The reference coalescence matrix and its implied Fst.
//
// Expect
// ------
// - The reference unknown vector has zero residual.
// - The fit from the default start has zero residual, passes
//   `check_constraint`, and its implied Fst matches the input.
fn coalescence_fit_reproduces_synthesized_fst() {
    // Arrange
    let t = reference_coalescence();
    let f = coalescence_to_fst(&t.view()).unwrap();
    let f_vec = fst_matrix_to_vector(&f.view()).unwrap();
    let t_vec = coalescence_matrix_to_vector(&t.view()).unwrap();
    let problem = CoalescenceProblem::new(f_vec.clone(), 4).unwrap();

    // Act
    let fit = problem.fit(problem.default_start(), &nelder_mead_options()).unwrap();

    // Assert
    let reference_residual = compute_coalescence(&t_vec.view(), &f_vec.view(), 4).unwrap();
    assert_abs_diff_eq!(reference_residual, 0.0, epsilon = 1e-12);
    assert!(fit.outcome.objective < 1e-9);
    assert!(fit.feasible);
    assert!(check_constraint(&fit.matrix));
    let implied = coalescence_to_fst(&fit.matrix.view()).unwrap();
    for (a, b) in implied.iter().zip(f.iter()) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-6);
    }
}

#[test]
// Purpose
// -------
// The Slatkin identity is homogeneous in T, so scaled copies of an exact
// solution are exact too. Restarting from them should leave each run at
// its start and expose the non-identifiability through the diameter.
//
// Given
// -----
// - The reference Fst, starts = default × {0.8, 1.25, 1.5}.
//
// Expect
// ------
// - Every start and every fitted objective is (numerically) zero.
// - Mean is `4 × 4`, diameter strictly positive, best run has the
//   smallest cost.
fn coalescence_restart_ensemble() {
    // Arrange
    let f = coalescence_to_fst(&reference_coalescence().view()).unwrap();
    let problem = CoalescenceProblem::from_fst_matrix(&f).unwrap();
    let starts = scaled_starts(&problem.default_start(), &[0.8, 1.25, 1.5]);
    let initial: Vec<f64> = starts.iter().map(|x| problem.value(x).unwrap()).collect();

    // Act
    let ens = Ensemble::from_restarts(&problem, starts, &nelder_mead_options()).unwrap();

    // Assert
    assert_eq!(ens.len(), 3);
    for (out, start) in ens.outcomes.iter().zip(&initial) {
        assert_abs_diff_eq!(*start, 0.0, epsilon = 1e-12);
        assert!(out.objective <= 1e-12);
    }
    assert_eq!(ens.mean.dim(), (4, 4));
    assert!(ens.diameter.is_finite() && ens.diameter > 0.0);
    let (_, best) = ens.best().unwrap();
    assert!(ens.outcomes.iter().all(|o| best.cost <= o.cost));
}

#[test]
// Purpose
// -------
// The joint F → (M, T) solve, run with the problem's own solver
// configuration, should lower the residual from the default start and
// return matrices in the documented layout.
//
// Given
// -----
// - Three populations with uniform Fst 0.2.
//
// Expect
// ------
// - Penalized cost no larger than the starting residual (≈ 0.968; the
//   start is balanced and inside the bounds, so it pays no penalty).
// - Zero-diagonal migration matrix. A rate below zero pays μ·m², which
//   cannot exceed the final cost, so m ≥ −√(initial / μ).
fn migration_fit_on_uniform_fst() {
    // Arrange
    let mut f = Array2::from_elem((3, 3), 0.2);
    f.diag_mut().fill(0.0);
    let problem = MigrationProblem::new(&f).unwrap();
    let x0 = problem.default_start();
    let initial = problem.value(&x0).unwrap();

    // Act
    let fit = problem.fit(x0, &MigrationProblem::default_options()).unwrap();

    // Assert
    assert!(fit.outcome.cost <= initial);
    assert_eq!(fit.migration.dim(), (3, 3));
    assert_eq!(fit.within.len(), 3);
    for i in 0..3 {
        assert_eq!(fit.migration[[i, i]], 0.0);
    }
    let slack = (initial / 1e3).sqrt();
    assert!(fit.migration.iter().all(|&m| m >= -slack));
}

#[test]
// Purpose
// -------
// Component-wise solving must agree with splitting and reassembling by
// hand, and cross-component Fst must reassemble with fill value 1.
//
// Given
// -----
// - Migration network with components {0, 1} and {2, 3}.
// - Fst synthesized from the reference T (cross-component values are
//   ignored by the solver).
//
// Expect
// ------
// - Components [[0, 1], [2, 3]].
// - Finite times inside each component, +∞ across components.
// - Reassembling the Fst blocks with `MatrixKind::Fst` puts 1.0 across
//   components and the original values inside.
fn component_pipeline() {
    // Arrange
    let migration = array![
        [0.0, 0.3, 0.0, 0.0],
        [0.1, 0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 0.2],
        [0.0, 0.0, 0.6, 0.0],
    ];
    let f = coalescence_to_fst(&reference_coalescence().view()).unwrap();

    // Act
    let out = fit_by_components(&migration, &f, &nelder_mead_options()).unwrap();
    let (_, components) = split_migration(&migration).unwrap();
    let fst_blocks = split_migration_matrix(&f, &components).unwrap();
    let fst_back = reassemble_matrix(&fst_blocks, &components, MatrixKind::Fst).unwrap();

    // Assert
    assert_eq!(out.components, vec![vec![0, 1], vec![2, 3]]);
    assert_eq!(components, out.components);
    for &(a, b) in &[(0, 1), (2, 3)] {
        assert!(out.matrix[[a, b]].is_finite());
        assert_eq!(out.matrix[[a, b]], out.matrix[[b, a]]);
        assert_abs_diff_eq!(fst_back[[a, b]], f[[a, b]], epsilon = 1e-15);
    }
    for &(a, b) in &[(0, 2), (0, 3), (1, 2), (1, 3)] {
        assert_eq!(out.matrix[[a, b]], f64::INFINITY);
        assert_eq!(fst_back[[a, b]], 1.0);
    }
    assert!(out.feasible());
}

#[test]
fn invalid_fst_is_rejected_before_solving() {
    let err = CoalescenceProblem::new(array![0.2, 1.0, 0.1], 3).unwrap_err();
    assert_eq!(err, PopError::InvalidFst { index: 1, value: 1.0 });

    let mut f = Array2::from_elem((2, 2), 0.0);
    f[[0, 1]] = -1.5;
    f[[1, 0]] = -1.5;
    let err = MigrationProblem::new(&f).unwrap_err();
    assert!(matches!(err, PopError::InvalidFst { index: 1, .. }));

    let bad_shapes =
        fit_by_components(&Array2::zeros((3, 3)), &Array2::zeros((2, 2)), &nelder_mead_options());
    assert!(matches!(bad_shapes, Err(OptError::Domain(PopError::ShapeMismatch { .. }))));
}
