//! Binomial coefficients for indexing unordered population pairs.
//!
//! `C(n, 2)` sizes every pairwise layout in this crate, so `comb` must be
//! exact. The multiplicative formula keeps intermediates bounded by the
//! result (times `k`), which avoids the factorial overflow that a naive
//! `n! / (k! (n-k)!)` hits past `n ≈ 20`.
use crate::structure::errors::{PopError, PopResult};

/// Exact binomial coefficient `C(n, k)`.
///
/// Uses the symmetric reduction `k ← min(k, n − k)` and the running
/// product `c ← c · (n − k + i) / i`, which is exact at every step.
///
/// # Errors
/// - [`PopError::CombDomain`] if `k > n`.
/// - [`PopError::CombOverflow`] if the result does not fit in `u64`.
pub fn comb(n: u64, k: u64) -> PopResult<u64> {
    if k > n {
        return Err(PopError::CombDomain { n, k });
    }
    let k_small = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 1..=u128::from(k_small) {
        let factor = u128::from(n - k_small) + i;
        acc = acc.checked_mul(factor).ok_or(PopError::CombOverflow { n, k })? / i;
    }
    u64::try_from(acc).map_err(|_| PopError::CombOverflow { n, k })
}

/// Number of unordered pairs among `n` populations, `C(n, 2)`.
///
/// Infallible for any `n` that indexes memory: `C(n, 2) < n²`.
pub fn num_pairs(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}
