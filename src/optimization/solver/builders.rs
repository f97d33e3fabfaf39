//! solver::builders — solver construction helpers.
//!
//! Purpose
//! -------
//! Hide argmin's generic wiring behind small builders that apply
//! crate-level [`SolverOptions`], so the driver can request a configured
//! solver without touching argmin-specific types.
//!
//! Key behaviors
//! -------------
//! - [`build_nelder_mead`] seeds a simplex around the starting point and
//!   applies `tol_cost` as the simplex standard-deviation tolerance.
//! - [`build_optimizer_hager_zhang`] / [`build_optimizer_more_thuente`]
//!   construct L-BFGS with the chosen line search; [`configure_lbfgs`]
//!   applies gradient and cost tolerances.
//!
//! Conventions
//! -----------
//! - L-BFGS builders do not set the initial point or `max_iters`; those
//!   are runtime concerns applied by the runner. Nelder–Mead carries its
//!   initial point inside the simplex.
//! - Invalid tolerances rejected by argmin surface as [`OptError`]
//!   through `From<argmin::core::Error>`.
//!
//! [`OptError`]: crate::optimization::errors::OptError
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    solver::{
        traits::SolverOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Simplex, Theta,
        },
    },
};

/// Relative displacement of each simplex vertex from the starting point.
const SIMPLEX_STEP: f64 = 0.05;

/// Absolute displacement used for coordinates that start at zero.
const SIMPLEX_ZERO_STEP: f64 = 0.00025;

/// Vertices of the initial simplex around `x0`.
///
/// Vertex 0 is `x0`; vertex `k + 1` moves coordinate `k` by 5% of its
/// value, or by `0.00025` when that coordinate is zero.
pub fn initial_simplex(x0: &Theta) -> Vec<Theta> {
    let mut vertices = Vec::with_capacity(x0.len() + 1);
    vertices.push(x0.clone());
    for k in 0..x0.len() {
        let mut v = x0.clone();
        v[k] = if v[k] != 0.0 { v[k] * (1.0 + SIMPLEX_STEP) } else { SIMPLEX_ZERO_STEP };
        vertices.push(v);
    }
    vertices
}

/// Build a Nelder–Mead solver seeded at `x0`.
///
/// # Errors
/// - `OptError` (via `From<argmin::core::Error>`) if argmin rejects the
///   standard-deviation tolerance.
pub fn build_nelder_mead(x0: &Theta, opts: &SolverOptions) -> OptResult<Simplex> {
    let mut solver = Simplex::new(initial_simplex(x0));
    if let Some(tol) = opts.tols.tol_cost {
        solver = solver.with_sd_tolerance(tol)?;
    }
    Ok(solver)
}

/// Build L-BFGS with Hager–Zhang line search.
///
/// Uses `opts.lbfgs_mem` as the history size, falling back to
/// [`DEFAULT_LBFGS_MEM`].
pub fn build_optimizer_hager_zhang(opts: &SolverOptions) -> OptResult<LbfgsHagerZhang> {
    let hager_zhang = HagerZhangLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(hager_zhang, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Build L-BFGS with More–Thuente line search.
pub fn build_optimizer_more_thuente(opts: &SolverOptions) -> OptResult<LbfgsMoreThuente> {
    let more_thuente = MoreThuenteLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(more_thuente, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Apply optional gradient and cost-change tolerances to an L-BFGS solver.
///
/// When a tolerance is `None` the corresponding argmin default stays in
/// effect.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &SolverOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::solver::traits::{LineSearcher, SolverMethod, Tolerances};
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Geometry of the initial Nelder–Mead simplex.
    // - Construction of Nelder–Mead and both L-BFGS variants from options.
    //
    // They intentionally DO NOT cover:
    // - Executor behavior, which is tested through `minimize`.
    // -------------------------------------------------------------------------

    fn lbfgs_opts(ls: LineSearcher, mem: Option<usize>) -> SolverOptions {
        let tols = Tolerances::new(Some(1e-6), Some(1e-8), Some(50)).unwrap();
        SolverOptions::new(tols, SolverMethod::Lbfgs(ls), 1e3, false, mem).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Check that each simplex vertex perturbs exactly one coordinate.
    //
    // Given
    // -----
    // - x0 = [2, 0, -1].
    //
    // Expect
    // ------
    // - Four vertices: x0, then [2.1, 0, -1], [2, 0.00025, -1], [2, 0, -1.05].
    fn initial_simplex_perturbs_one_coordinate_per_vertex() {
        // Arrange
        let x0 = array![2.0, 0.0, -1.0];

        // Act
        let simplex = initial_simplex(&x0);

        // Assert
        assert_eq!(simplex.len(), 4);
        assert_eq!(simplex[0], x0);
        assert_eq!(simplex[1], array![2.0 * 1.05, 0.0, -1.0]);
        assert_eq!(simplex[2], array![2.0, 0.00025, -1.0]);
        assert_eq!(simplex[3], array![2.0, 0.0, -1.0 * 1.05]);
    }

    #[test]
    fn build_nelder_mead_with_default_options() {
        let opts = SolverOptions::default();
        assert!(build_nelder_mead(&array![1.0, 1.0], &opts).is_ok());
    }

    #[test]
    fn build_lbfgs_variants_with_default_and_explicit_memory() {
        assert!(build_optimizer_hager_zhang(&lbfgs_opts(LineSearcher::HagerZhang, None)).is_ok());
        assert!(
            build_optimizer_more_thuente(&lbfgs_opts(LineSearcher::MoreThuente, Some(9))).is_ok()
        );
    }

    #[test]
    fn configure_lbfgs_respects_absent_tolerances() {
        let raw = LBFGS::new(MoreThuenteLS::new(), DEFAULT_LBFGS_MEM);
        let tols = Tolerances::new(None, None, Some(50)).unwrap();
        let opts = SolverOptions::new(
            tols,
            SolverMethod::Lbfgs(LineSearcher::MoreThuente),
            1e3,
            false,
            None,
        )
        .unwrap();
        assert!(configure_lbfgs(raw, &opts).is_ok());
    }
}
