//! Post-hoc acceptance tests for optimizer output.
//!
//! Both predicates return `bool` and never error: a `false` is an answer,
//! not a failure. Non-square input is simply infeasible.
use ndarray::Array2;

/// Column index of the first minimum in `row` (left-to-right, strict `<`),
/// or `None` for an empty row. A NaN counts as smaller than everything, so
/// the first NaN in the row wins.
fn first_argmin<'a, I: IntoIterator<Item = &'a f64>>(row: I) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &v) in row.into_iter().enumerate() {
        if v.is_nan() {
            return Some(idx);
        }
        match best {
            None => best = Some((idx, v)),
            Some((_, b)) if v < b => best = Some((idx, v)),
            _ => {}
        }
    }
    best.map(|(idx, _)| idx)
}

/// `true` iff for every row `i` the first-occurrence argmin of row `i` is
/// column `i`, i.e. the within-population time is the row minimum.
///
/// Ties resolve to the earliest column, so a row whose minimum is shared
/// by column `i` and an earlier column is rejected. A NaN is the row
/// minimum: row `i` passes if its first NaN sits at column `i`, and fails
/// if it sits anywhere else.
pub fn check_constraint(t: &Array2<f64>) -> bool {
    let (rows, cols) = t.dim();
    if rows != cols {
        return false;
    }
    t.outer_iter().enumerate().all(|(i, row)| first_argmin(row.iter()) == Some(i))
}

/// `true` iff every population's row sum equals its column sum after
/// rounding both to two decimals (half-to-even). Stops at the first
/// violation in row order.
pub fn check_conservative(m: &Array2<f64>) -> bool {
    let (rows, cols) = m.dim();
    if rows != cols {
        return false;
    }
    for i in 0..rows {
        if round2(m.row(i).sum()) != round2(m.column(i).sum()) {
            return false;
        }
    }
    true
}

/// Round to two decimals with ties to even.
#[inline]
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `check_constraint` on strictly diagonal-minimal matrices, off-diagonal
    //   minima, ties (first-occurrence argmin), and NaN entries.
    // - `check_conservative` on symmetric, balanced asymmetric, and
    //   unbalanced matrices, plus 2-decimal tolerance.
    // - Non-square inputs for both predicates.
    // -------------------------------------------------------------------------

    #[test]
    fn check_constraint_accepts_strict_diagonal_minima() {
        let t = array![[1.0, 2.0, 3.0], [2.0, 1.5, 4.0], [3.0, 4.0, 0.5]];
        assert!(check_constraint(&t));
    }

    #[test]
    fn check_constraint_rejects_off_diagonal_minimum() {
        let t = array![[1.0, 2.0, 3.0], [0.5, 1.5, 4.0], [3.0, 4.0, 0.5]];
        assert!(!check_constraint(&t));
    }

    #[test]
    // Purpose
    // -------
    // Pin the tie-breaking rule: the first column holding the row minimum
    // wins.
    //
    // Given
    // -----
    // - Row 0 ties columns 0 and 1 (first is the diagonal).
    // - Row 1 ties columns 0 and 1 (first is off-diagonal).
    //
    // Expect
    // ------
    // - A matrix with only the row-0 tie is accepted; adding the row-1 tie
    //   rejects it.
    fn check_constraint_uses_first_occurrence_argmin_on_ties() {
        // Arrange
        let accepted = array![[1.0, 1.0], [2.0, 1.0]];
        let rejected = array![[1.0, 1.0], [1.0, 1.0]];

        // Act / Assert
        assert!(check_constraint(&accepted));
        assert!(!check_constraint(&rejected));
    }

    #[test]
    // Purpose
    // -------
    // Pin NaN handling: the first NaN in a row is its minimum.
    //
    // Given
    // -----
    // - Row 1 = [2, NaN]: first NaN on the diagonal.
    // - Row 1 = [NaN, 1]: first NaN off the diagonal.
    // - Row 0 = [NaN, NaN]: first NaN on the diagonal.
    //
    // Expect
    // ------
    // - Accepted, rejected, accepted.
    fn check_constraint_treats_first_nan_as_row_minimum() {
        // Arrange
        let nan = f64::NAN;
        let diagonal_nan = array![[1.0, 2.0], [2.0, nan]];
        let off_diagonal_nan = array![[1.0, 2.0], [nan, 1.0]];
        let leading_nans = array![[nan, nan], [2.0, 1.0]];

        // Act / Assert
        assert!(check_constraint(&diagonal_nan));
        assert!(!check_constraint(&off_diagonal_nan));
        assert!(check_constraint(&leading_nans));
    }

    #[test]
    fn predicates_reject_non_square() {
        let t = Array2::<f64>::zeros((2, 3));
        assert!(!check_constraint(&t));
        assert!(!check_conservative(&t));
    }

    #[test]
    fn check_conservative_accepts_symmetric_matrices() {
        let m = array![[0.0, 0.3, 1.2], [0.3, 0.0, 0.7], [1.2, 0.7, 0.0]];
        assert!(check_conservative(&m));
    }

    #[test]
    // Purpose
    // -------
    // Accept an asymmetric but balanced (cyclic) flow and reject it after a
    // single entry is perturbed.
    //
    // Given
    // -----
    // - A 3-cycle with rate 0.5 on each edge: every row and column sums to
    //   0.5.
    // - The same matrix with M(0,1) raised to 0.8.
    //
    // Expect
    // ------
    // - `true` for the cycle, `false` after the perturbation.
    fn check_conservative_cycle_and_single_perturbation() {
        // Arrange
        let cycle = array![[0.0, 0.5, 0.0], [0.0, 0.0, 0.5], [0.5, 0.0, 0.0]];
        let mut broken = cycle.clone();
        broken[[0, 1]] = 0.8;

        // Act / Assert
        assert!(check_conservative(&cycle));
        assert!(!check_conservative(&broken));
    }

    #[test]
    fn check_conservative_tolerates_sub_rounding_noise() {
        let m = array![[0.0, 0.501], [0.499, 0.0]];
        assert!(check_conservative(&m));
        let off = array![[0.0, 0.52], [0.49, 0.0]];
        assert!(!check_conservative(&off));
    }

    #[test]
    fn round2_rounds_half_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(1.0), 1.0);
        assert_eq!(round2(-0.004), -0.0);
    }
}
