//! graph::components — connected components of a migration network.
//!
//! Purpose
//! -------
//! Decompose a migration matrix into independently solvable sub-problems
//! and reassemble per-component results into a full matrix.
//!
//! Key behaviors
//! -------------
//! - [`find_components`]: breadth-first labeling over the undirected view
//!   of `M` (edge `i–j` iff `M[i][j] ≠ 0` or `M[j][i] ≠ 0`). Labels are
//!   1-based in discovery order; each component lists its vertices in BFS
//!   discovery order, starting vertex first.
//! - [`split_migration_matrix`] / [`split_migration`]: induced submatrix
//!   per component, rows and columns in the component's vertex order.
//! - [`reassemble_matrix`]: inverse of the split; entries between
//!   different components keep the [`MatrixKind`] fill value (`1.0` for
//!   Fst, `+∞` for coalescence times).
//!
//! Invariants & assumptions
//! ------------------------
//! - A new component always starts at the smallest unvisited vertex, so
//!   labeling is reproducible for a given matrix.
//! - Components returned by [`find_components`] partition `0..n`.
//!   [`reassemble_matrix`] checks that its inputs do too.
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::str::FromStr;

use ndarray::{Array2, Axis};

use crate::structure::{
    errors::{PopError, PopResult},
    layout::square_dim,
};

/// Component label (1-based) → vertices in BFS discovery order.
pub type ComponentMap = BTreeMap<usize, Vec<usize>>;

/// Kind of matrix being reassembled; selects the fill value used for
/// entries between different components.
///
/// Parsing accepts `"fst"` and `"coalescence"` case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixKind {
    Fst,
    Coalescence,
}

impl MatrixKind {
    /// `1.0` for Fst (maximal differentiation), `+∞` for coalescence times.
    pub fn fill_value(self) -> f64 {
        match self {
            MatrixKind::Fst => 1.0,
            MatrixKind::Coalescence => f64::INFINITY,
        }
    }
}

impl FromStr for MatrixKind {
    type Err = PopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fst" => Ok(MatrixKind::Fst),
            "coalescence" => Ok(MatrixKind::Coalescence),
            _ => Err(PopError::InvalidMatrixKind { name: s.to_string() }),
        }
    }
}

/// Label the connected components of `matrix` viewed as an undirected
/// graph.
///
/// # Errors
/// [`PopError::NotSquare`] for a non-square matrix.
pub fn find_components(matrix: &Array2<f64>) -> PopResult<ComponentMap> {
    let n = square_dim(&matrix.view())?;
    let mut components = ComponentMap::new();
    let mut not_visited: BTreeSet<usize> = (0..n).collect();
    let mut queue = VecDeque::new();
    let mut label = 0;

    while let Some(start) = not_visited.pop_first() {
        label += 1;
        components.insert(label, vec![start]);
        queue.push_back(start);
        while let Some(cur) = queue.pop_front() {
            for i in 0..n {
                if !not_visited.contains(&i) {
                    continue;
                }
                if matrix[[cur, i]] != 0.0 || matrix[[i, cur]] != 0.0 {
                    not_visited.remove(&i);
                    queue.push_back(i);
                    if let Some(members) = components.get_mut(&label) {
                        members.push(i);
                    }
                }
            }
        }
    }
    Ok(components)
}

/// Induced submatrix of `migration_matrix` for each component, aligned with
/// `components`.
///
/// # Errors
/// - [`PopError::NotSquare`] for a non-square matrix.
/// - [`PopError::IndexOutOfBounds`] if a component names a vertex `≥ n`.
pub fn split_migration_matrix(
    migration_matrix: &Array2<f64>, components: &[Vec<usize>],
) -> PopResult<Vec<Array2<f64>>> {
    let n = square_dim(&migration_matrix.view())?;
    components
        .iter()
        .map(|component| {
            if let Some(&bad) = component.iter().find(|&&v| v >= n) {
                return Err(PopError::IndexOutOfBounds { index: bad, len: n });
            }
            Ok(migration_matrix.select(Axis(0), component).select(Axis(1), component))
        })
        .collect()
}

/// Find the components of `migration_matrix` and split it along them.
///
/// Returns `(sub_matrices, components)` with components ordered by label.
pub fn split_migration(
    migration_matrix: &Array2<f64>,
) -> PopResult<(Vec<Array2<f64>>, Vec<Vec<usize>>)> {
    let components: Vec<Vec<usize>> = find_components(migration_matrix)?.into_values().collect();
    let sub_matrices = split_migration_matrix(migration_matrix, &components)?;
    Ok((sub_matrices, components))
}

/// Reassemble a full matrix from per-component submatrices.
///
/// The result is `N × N` with `N` the total number of listed vertices,
/// initialized to `which.fill_value()`, with each component's block
/// overwritten by its submatrix.
///
/// # Errors
/// - [`PopError::InvalidComponents`] if the counts differ, a submatrix is
///   not `k × k` for its `k`-vertex component, or a vertex is listed twice.
/// - [`PopError::IndexOutOfBounds`] if a vertex is `≥ N`.
pub fn reassemble_matrix(
    sub_matrices: &[Array2<f64>], connected_components: &[Vec<usize>], which: MatrixKind,
) -> PopResult<Array2<f64>> {
    if sub_matrices.len() != connected_components.len() {
        return Err(PopError::InvalidComponents {
            reason: "number of submatrices differs from number of components",
        });
    }
    let num_nodes: usize = connected_components.iter().map(Vec::len).sum();
    let mut seen = vec![false; num_nodes];
    for &v in connected_components.iter().flatten() {
        if v >= num_nodes {
            return Err(PopError::IndexOutOfBounds { index: v, len: num_nodes });
        }
        if std::mem::replace(&mut seen[v], true) {
            return Err(PopError::InvalidComponents {
                reason: "vertex listed in more than one component",
            });
        }
    }

    let mut out = Array2::from_elem((num_nodes, num_nodes), which.fill_value());
    for (component, sub) in connected_components.iter().zip(sub_matrices) {
        let k = component.len();
        if sub.dim() != (k, k) {
            return Err(PopError::InvalidComponents {
                reason: "submatrix shape does not match its component size",
            });
        }
        for (a, &row) in component.iter().enumerate() {
            for (b, &col) in component.iter().enumerate() {
                out[[row, col]] = sub[[a, b]];
            }
        }
    }
    Ok(out)
}
