//! inference::components — solve F → T one migration component at a time.
//!
//! Populations in different connected components of the migration network
//! never exchange migrants, so their coalescence times are infinite and
//! each component can be fitted on its own Fst submatrix.
use ndarray::Array2;

use crate::graph::{MatrixKind, reassemble_matrix, split_migration, split_migration_matrix};
use crate::inference::coalescence::{CoalescenceFit, CoalescenceProblem};
use crate::optimization::{errors::OptResult, solver::SolverOptions};
use crate::structure::errors::PopError;

/// Result of [`fit_by_components`].
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentFit {
    /// Full `n × n` coalescence matrix; `+∞` between components.
    pub matrix: Array2<f64>,
    /// Vertices of each component, in label order.
    pub components: Vec<Vec<usize>>,
    /// One fit per component, aligned with `components`.
    pub fits: Vec<CoalescenceFit>,
}

impl ComponentFit {
    /// `true` iff every component fit passed `check_constraint`.
    pub fn feasible(&self) -> bool {
        self.fits.iter().all(|f| f.feasible)
    }
}

/// Split `migration` into connected components, fit coalescence times for
/// each component's Fst submatrix from its default start, and reassemble.
///
/// # Errors
/// - [`PopError::ShapeMismatch`] if `fst` and `migration` differ in shape.
/// - Graph, problem-construction, and solver errors from the steps above.
pub fn fit_by_components(
    migration: &Array2<f64>, fst: &Array2<f64>, opts: &SolverOptions,
) -> OptResult<ComponentFit> {
    if fst.dim() != migration.dim() {
        return Err(PopError::ShapeMismatch { expected: migration.dim(), found: fst.dim() }.into());
    }
    let (_, components) = split_migration(migration)?;
    let fst_blocks = split_migration_matrix(fst, &components)?;

    let mut fits = Vec::with_capacity(components.len());
    for block in &fst_blocks {
        let problem = CoalescenceProblem::from_fst_matrix(block)?;
        fits.push(problem.fit(problem.default_start(), opts)?);
    }
    let blocks: Vec<Array2<f64>> = fits.iter().map(|f| f.matrix.clone()).collect();
    let matrix = reassemble_matrix(&blocks, &components, MatrixKind::Coalescence)?;
    Ok(ComponentFit { matrix, components, fits })
}
