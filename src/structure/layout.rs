//! structure::layout — flat unknown/Fst layouts and their matrix forms.
//!
//! Purpose
//! -------
//! Centralize every conversion between the flat vectors handed to an
//! optimizer and the `n × n` matrices they describe, so the objective
//! builders, constraint factories, and inference drivers agree on a single
//! indexing convention.
//!
//! Conventions
//! -----------
//! - Pairs `(i, j)` with `i < j` are enumerated row-major over the upper
//!   triangle: `(0,1), (0,2), …, (0,n−1), (1,2), …`. [`pair_index`] maps a
//!   pair to its position.
//! - Coalescence-only unknowns: `C(n,2)` between-population times in pair
//!   order, then `n` within-population times.
//! - Joint unknowns: `n² − n` off-diagonal migration rates `M(i,k)`,
//!   `k ≠ i`, ordered by `i` then `k`, then `n` within-population times.
//! - Upper-triangular Fst vectors (`compute_coalescence`) and full
//!   row-major Fst matrices (`f_to_m`) are distinct layouts. Converting
//!   between them is always explicit ([`fst_vector_to_matrix`],
//!   [`fst_matrix_to_vector`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Every helper validates lengths and shapes and reports
//!   [`PopError::LengthMismatch`] / [`PopError::NotSquare`] instead of
//!   panicking.
//! - [`slatkin_ratio`] is the only place Fst values are domain-checked.
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::structure::{
    combinatorics::num_pairs,
    errors::{PopError, PopResult},
};

/// Length of the coalescence-only unknown vector, `C(n,2) + n`.
pub fn coalescence_len(n: usize) -> usize {
    num_pairs(n) + n
}

/// Length of the joint migration + coalescence unknown vector, `n²`.
pub fn joint_len(n: usize) -> usize {
    n * n
}

/// Position of the unordered pair `(i, j)`, `i < j < n`, in the
/// upper-triangular enumeration.
///
/// # Errors
/// [`PopError::InvalidPair`] if `i >= j` or `j >= n`.
pub fn pair_index(i: usize, j: usize, n: usize) -> PopResult<usize> {
    if i >= j || j >= n {
        return Err(PopError::InvalidPair { i, j, n });
    }
    Ok(i * n - i * (i + 1) / 2 + (j - i - 1))
}

/// Slatkin ratio `(1 + f) / (1 − f)` for an Fst value at flat position
/// `index`.
///
/// # Errors
/// [`PopError::InvalidFst`] when `f` is non-finite or `|f| >= 1`.
#[inline]
pub fn slatkin_ratio(f: f64, index: usize) -> PopResult<f64> {
    if !f.is_finite() || f <= -1.0 || f >= 1.0 {
        return Err(PopError::InvalidFst { index, value: f });
    }
    Ok((1.0 + f) / (1.0 - f))
}

/// Return `n` for a square matrix.
///
/// # Errors
/// [`PopError::NotSquare`] otherwise.
pub fn square_dim(m: &ArrayView2<f64>) -> PopResult<usize> {
    let (rows, cols) = m.dim();
    if rows != cols {
        return Err(PopError::NotSquare { rows, cols });
    }
    Ok(rows)
}

pub(crate) fn expect_len(what: &'static str, found: usize, expected: usize) -> PopResult<()> {
    if found != expected {
        return Err(PopError::LengthMismatch { what, expected, found });
    }
    Ok(())
}

/// Build the symmetric coalescence-time matrix described by a
/// coalescence-only unknown vector.
///
/// # Errors
/// [`PopError::LengthMismatch`] if `t.len() != C(n,2) + n`.
pub fn coalescence_vector_to_matrix(t: &ArrayView1<f64>, n: usize) -> PopResult<Array2<f64>> {
    expect_len("coalescence unknowns", t.len(), coalescence_len(n))?;
    let pairs = num_pairs(n);
    let mut out = Array2::zeros((n, n));
    let mut k = 0;
    for i in 0..n {
        out[[i, i]] = t[pairs + i];
        for j in (i + 1)..n {
            out[[i, j]] = t[k];
            out[[j, i]] = t[k];
            k += 1;
        }
    }
    Ok(out)
}

/// Flatten a coalescence-time matrix into the coalescence-only unknown
/// layout. Only the upper triangle and diagonal are read.
///
/// # Errors
/// [`PopError::NotSquare`] for a non-square matrix.
pub fn coalescence_matrix_to_vector(t: &ArrayView2<f64>) -> PopResult<Array1<f64>> {
    let n = square_dim(t)?;
    let mut out = Vec::with_capacity(coalescence_len(n));
    for i in 0..n {
        for j in (i + 1)..n {
            out.push(t[[i, j]]);
        }
    }
    out.extend((0..n).map(|i| t[[i, i]]));
    Ok(Array1::from(out))
}

/// Expand an upper-triangular Fst vector into a symmetric matrix with a
/// zero diagonal.
///
/// # Errors
/// [`PopError::LengthMismatch`] if `f.len() != C(n,2)`.
pub fn fst_vector_to_matrix(f: &ArrayView1<f64>, n: usize) -> PopResult<Array2<f64>> {
    expect_len("Fst vector", f.len(), num_pairs(n))?;
    let mut out = Array2::zeros((n, n));
    let mut k = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            out[[i, j]] = f[k];
            out[[j, i]] = f[k];
            k += 1;
        }
    }
    Ok(out)
}

/// Read the upper triangle of an Fst matrix in pair order.
///
/// # Errors
/// [`PopError::NotSquare`] for a non-square matrix.
pub fn fst_matrix_to_vector(f: &ArrayView2<f64>) -> PopResult<Array1<f64>> {
    let n = square_dim(f)?;
    let mut out = Vec::with_capacity(num_pairs(n));
    for i in 0..n {
        for j in (i + 1)..n {
            out.push(f[[i, j]]);
        }
    }
    Ok(Array1::from(out))
}

/// Rebuild the `n × n` migration matrix from the off-diagonal block at the
/// front of `x` (zero diagonal). Entries past `n² − n` are ignored, so the
/// full joint vector can be passed directly.
///
/// # Errors
/// [`PopError::LengthMismatch`] if `x` holds fewer than `n² − n` entries.
pub fn migration_from_unknowns(x: &ArrayView1<f64>, n: usize) -> PopResult<Array2<f64>> {
    let off = n * n.saturating_sub(1);
    if x.len() < off {
        return Err(PopError::LengthMismatch {
            what: "migration unknowns",
            expected: off,
            found: x.len(),
        });
    }
    let mut m = Array2::zeros((n, n));
    let mut values = x.iter();
    for i in 0..n {
        for k in 0..n {
            if k == i {
                continue;
            }
            if let Some(&v) = values.next() {
                m[[i, k]] = v;
            }
        }
    }
    Ok(m)
}

/// Split a joint unknown vector into the migration matrix and the vector
/// of within-population coalescence times.
///
/// # Errors
/// [`PopError::LengthMismatch`] if `u.len() != n²`.
pub fn split_joint_unknowns(
    u: &ArrayView1<f64>, n: usize,
) -> PopResult<(Array2<f64>, Array1<f64>)> {
    expect_len("joint unknowns", u.len(), joint_len(n))?;
    let m = migration_from_unknowns(u, n)?;
    let t = u.slice(ndarray::s![n * n - n..]).to_owned();
    Ok((m, t))
}

/// Inverse of [`split_joint_unknowns`]. The diagonal of `m` is ignored.
///
/// # Errors
/// - [`PopError::NotSquare`] for a non-square `m`.
/// - [`PopError::LengthMismatch`] if `within.len() != n`.
pub fn joint_unknowns(m: &ArrayView2<f64>, within: &ArrayView1<f64>) -> PopResult<Array1<f64>> {
    let n = square_dim(m)?;
    expect_len("within-population times", within.len(), n)?;
    let mut out = Vec::with_capacity(joint_len(n));
    for i in 0..n {
        for k in 0..n {
            if k != i {
                out.push(m[[i, k]]);
            }
        }
    }
    out.extend(within.iter().copied());
    Ok(Array1::from(out))
}

/// Fst matrix implied by a coalescence-time matrix under the Slatkin
/// identity: `F(i,j) = (T(i,j) − T̄) / (T(i,j) + T̄)` with
/// `T̄ = ½ (T(i,i) + T(j,j))`. The diagonal is zero.
///
/// Entries where `T(i,j) + T̄ == 0` are reported as `NaN`; the matrix is
/// otherwise exact for any `T` produced by the identity.
///
/// # Errors
/// [`PopError::NotSquare`] for a non-square matrix.
pub fn coalescence_to_fst(t: &ArrayView2<f64>) -> PopResult<Array2<f64>> {
    let n = square_dim(t)?;
    let mut out = Array2::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let within = 0.5 * (t[[i, i]] + t[[j, j]]);
            let denom = t[[i, j]] + within;
            out[[i, j]] = if denom == 0.0 { f64::NAN } else { (t[[i, j]] - within) / denom };
        }
    }
    Ok(out)
}
