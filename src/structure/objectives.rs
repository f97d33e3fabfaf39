//! structure::objectives — residual functions relating Fst to coalescence
//! times and migration rates.
//!
//! Purpose
//! -------
//! Turn a candidate unknown vector and a fixed set of Fst observations into
//! a single non-negative scalar (the Euclidean norm of a residual vector)
//! that an optimizer drives toward zero.
//!
//! Key behaviors
//! -------------
//! - [`compute_coalescence`]: Slatkin identity for every unordered pair,
//!   `T(i,j) − ½ (T(i,i) + T(j,j)) · (1 + f)/(1 − f)`, over the
//!   coalescence-only layout and an upper-triangular Fst vector.
//! - [`f_to_m`]: joint migration + coalescence identities over the joint
//!   layout and a full row-major `n × n` Fst matrix; `n` "self" equations
//!   followed by `C(n,2)` "pair" equations, each normalized to target 1.
//! - The residual vectors themselves are exposed
//!   ([`coalescence_residuals`], [`joint_residuals`]) for diagnostics.
//!
//! Invariants & assumptions
//! ------------------------
//! - Lengths are validated up front; a mismatch is a
//!   [`PopError::LengthMismatch`], never a silent truncation.
//! - Every Fst value that enters a Slatkin ratio must lie strictly inside
//!   (−1, 1); otherwise [`PopError::InvalidFst`] is returned. Diagonal
//!   entries of the Fst matrix are never read by [`f_to_m`].
//!
//! Conventions
//! -----------
//! - The two Fst layouts are distinct: `compute_coalescence` indexes the
//!   `C(n,2)` vector by pair position; `f_to_m` indexes the `n²` matrix by
//!   `n·i + k`. Callers convert explicitly via `structure::layout`.
//! - `M_i = Σ_{k≠i} M(i,k)` is the total incoming migration of population
//!   `i`.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the `n = 2` reduction of the Slatkin residual, exact
//!   zeros on synthesized inputs, hand-evaluated joint equations for
//!   `n = 2` and `n = 3`, and the domain/length error branches.
use ndarray::{Array1, Array2, ArrayView1};

use crate::structure::{
    combinatorics::num_pairs,
    errors::PopResult,
    layout::{coalescence_len, expect_len, joint_len, migration_from_unknowns, slatkin_ratio},
};

/// Residual vector of the Slatkin identity, one entry per unordered pair in
/// upper-triangular order.
///
/// # Errors
/// - [`PopError::LengthMismatch`](crate::structure::errors::PopError::LengthMismatch)
///   if `t.len() != C(n,2) + n` or `f.len() != C(n,2)`.
/// - [`PopError::InvalidFst`](crate::structure::errors::PopError::InvalidFst)
///   for any Fst value outside (−1, 1).
pub fn coalescence_residuals(
    t: &ArrayView1<f64>, f: &ArrayView1<f64>, n: usize,
) -> PopResult<Array1<f64>> {
    expect_len("coalescence unknowns", t.len(), coalescence_len(n))?;
    let pairs = num_pairs(n);
    expect_len("Fst vector", f.len(), pairs)?;

    let mut residuals = Vec::with_capacity(pairs);
    let mut k = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            let ratio = slatkin_ratio(f[k], k)?;
            residuals.push(t[k] - 0.5 * (t[pairs + i] + t[pairs + j]) * ratio);
            k += 1;
        }
    }
    Ok(Array1::from(residuals))
}

/// Euclidean norm of [`coalescence_residuals`]; zero iff `t` satisfies
/// every pairwise Slatkin identity.
pub fn compute_coalescence(t: &ArrayView1<f64>, f: &ArrayView1<f64>, n: usize) -> PopResult<f64> {
    Ok(l2_norm(&coalescence_residuals(t, f, n)?))
}

/// Residual vector of the joint identities: `n` self equations (population
/// order) followed by one pair equation per unordered pair (upper-triangular
/// order), each of the form `LHS − 1`.
///
/// Self equation for `i`:
/// `(1 + M_i) T(i,i) − ½ Σ_{k≠i} M(i,k) (T(k,k) + T(i,i)) g(i,k) − 1`.
///
/// Pair equation for `i < j`:
/// `¼ [ (M_i + M_j)(T(i,i) + T(j,j)) g(i,j)
///      − Σ_{k≠i,j} M(i,k)(T(k,k) + T(j,j)) g(i,k)
///      − Σ_{k≠i,j} M(j,k)(T(k,k) + T(i,i)) g(j,k) ] − 1`,
///
/// where `g(a,b) = (1 + F(a,b)) / (1 − F(a,b))`.
///
/// # Errors
/// - [`PopError::LengthMismatch`](crate::structure::errors::PopError::LengthMismatch)
///   if `u.len() != n²` or `f.len() != n²`.
/// - [`PopError::InvalidFst`](crate::structure::errors::PopError::InvalidFst)
///   for any off-diagonal Fst value outside (−1, 1).
pub fn joint_residuals(
    u: &ArrayView1<f64>, f: &ArrayView1<f64>, n: usize,
) -> PopResult<Array1<f64>> {
    expect_len("joint unknowns", u.len(), joint_len(n))?;
    expect_len("Fst matrix", f.len(), n * n)?;

    let m = migration_from_unknowns(u, n)?;
    let t = u.slice(ndarray::s![n * n - n..]);
    let g = slatkin_matrix(f, n)?;
    let incoming: Vec<f64> = m.outer_iter().map(|row| row.sum()).collect();

    let mut residuals = Vec::with_capacity(n + num_pairs(n));
    for i in 0..n {
        let mut flow = 0.0;
        for k in (0..n).filter(|&k| k != i) {
            flow += m[[i, k]] * (t[k] + t[i]) * g[[i, k]];
        }
        residuals.push((1.0 + incoming[i]) * t[i] - 0.5 * flow - 1.0);
    }
    for i in 0..n {
        for j in (i + 1)..n {
            let mut lhs = (incoming[i] + incoming[j]) * (t[i] + t[j]) * g[[i, j]];
            for k in (0..n).filter(|&k| k != i && k != j) {
                lhs -= m[[i, k]] * (t[k] + t[j]) * g[[i, k]];
                lhs -= m[[j, k]] * (t[k] + t[i]) * g[[j, k]];
            }
            residuals.push(0.25 * lhs - 1.0);
        }
    }
    Ok(Array1::from(residuals))
}

/// Euclidean norm of [`joint_residuals`].
pub fn f_to_m(u: &ArrayView1<f64>, f: &ArrayView1<f64>, n: usize) -> PopResult<f64> {
    Ok(l2_norm(&joint_residuals(u, f, n)?))
}

/// Off-diagonal Slatkin ratios of a row-major Fst matrix; diagonal left 0.
fn slatkin_matrix(f: &ArrayView1<f64>, n: usize) -> PopResult<Array2<f64>> {
    let mut g = Array2::zeros((n, n));
    for i in 0..n {
        for k in (0..n).filter(|&k| k != i) {
            let idx = n * i + k;
            g[[i, k]] = slatkin_ratio(f[idx], idx)?;
        }
    }
    Ok(g)
}

#[inline]
fn l2_norm(v: &Array1<f64>) -> f64 {
    v.dot(v).sqrt()
}
