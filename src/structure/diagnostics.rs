//! structure::diagnostics — variability of matrices across solver restarts.
//!
//! Purpose
//! -------
//! Summarize a collection of same-shape matrices produced by independent
//! optimizer runs: a normalized elementwise distance, the diameter (largest
//! pairwise distance), and the elementwise mean.
//!
//! Conventions
//! -----------
//! - [`matrix_distance`] sums absolute differences over **all** entries,
//!   diagonal included, but divides by the off-diagonal count `n² − n`.
//!   This normalization is part of the contract and is reproduced exactly.
//! - Collections are plain slices; order carries no meaning.
use ndarray::Array2;

use crate::structure::errors::{PopError, PopResult};

/// Normalized elementwise distance `Σ |a − b| / (n² − n)` between two
/// `n × n` matrices.
///
/// # Errors
/// - [`PopError::NotSquare`] if `a` is not square.
/// - [`PopError::ShapeMismatch`] if `b` differs in shape from `a`.
/// - [`PopError::DegenerateShape`] for `n ≤ 1` (the denominator is zero).
pub fn matrix_distance(a: &Array2<f64>, b: &Array2<f64>) -> PopResult<f64> {
    let (rows, cols) = a.dim();
    if rows != cols {
        return Err(PopError::NotSquare { rows, cols });
    }
    if b.dim() != a.dim() {
        return Err(PopError::ShapeMismatch { expected: a.dim(), found: b.dim() });
    }
    let n = rows;
    if n * n <= n {
        return Err(PopError::DegenerateShape { n });
    }
    let total: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum();
    Ok(total / (n * n - n) as f64)
}

/// Largest pairwise [`matrix_distance`] in a collection; `0.0` when the
/// collection holds fewer than two matrices.
///
/// # Errors
/// Propagates the first error from [`matrix_distance`].
pub fn diameter(mats: &[Array2<f64>]) -> PopResult<f64> {
    let mut max_diam = 0.0_f64;
    for i in 0..mats.len() {
        for j in 0..i {
            max_diam = max_diam.max(matrix_distance(&mats[i], &mats[j])?);
        }
    }
    Ok(max_diam)
}

/// Elementwise arithmetic mean of a collection of same-shape matrices.
///
/// # Errors
/// - [`PopError::EmptyCollection`] for an empty slice.
/// - [`PopError::ShapeMismatch`] if any matrix differs in shape from the
///   first.
pub fn matrix_mean(mats: &[Array2<f64>]) -> PopResult<Array2<f64>> {
    let first = mats.first().ok_or(PopError::EmptyCollection)?;
    let mut acc = Array2::<f64>::zeros(first.dim());
    for m in mats {
        if m.dim() != first.dim() {
            return Err(PopError::ShapeMismatch { expected: first.dim(), found: m.dim() });
        }
        acc += m;
    }
    Ok(acc / mats.len() as f64)
}
