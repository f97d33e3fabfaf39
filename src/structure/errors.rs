//! structure::errors — domain and layout errors for the structure core.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias shared by every numerical
//! routine in `structure` and `graph`: combinatorics, layout conversions,
//! matrix diagnostics, objective builders, and constraint evaluation.
//!
//! Key behaviors
//! -------------
//! - Separate *domain* failures (Fst on or outside ±1, `k > n`, empty
//!   collections) from *shape/layout* failures (wrong vector lengths,
//!   non-square or mismatched matrices).
//! - Attach human-readable `Display` messages that embed the offending
//!   value or index so diagnostics are meaningful without extra context.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every variant is fatal for the call that produced it; nothing in this
//!   crate retries or clamps. Feasibility predicates never produce a
//!   `PopError`, they return `false`.
//! - Variants are small and cloneable so they can cross the optimizer
//!   boundary (see `optimization::errors::OptError::Domain`).
//!
//! Testing notes
//! -------------
//! - Unit tests below check that payloads appear in `Display` output.

pub type PopResult<T> = Result<T, PopError>;

/// PopError — failures raised by structure-core computations.
///
/// Variants
/// --------
/// - `InvalidFst { index, value }`
///   An Fst entry is non-finite or outside the open interval (−1, 1), so
///   the Slatkin ratio `(1+f)/(1−f)` is undefined or meaningless. `index`
///   is the flat position in the caller's Fst layout.
/// - `CombDomain { n, k }`
///   `k > n` in `comb(n, k)`.
/// - `CombOverflow { n, k }`
///   `C(n, k)` does not fit in a `u64`.
/// - `LengthMismatch { what, expected, found }`
///   A flat vector does not have the length its layout requires.
/// - `NotSquare { rows, cols }`
///   A matrix expected to be `n × n` is not square.
/// - `ShapeMismatch { expected, found }`
///   Two matrices that must share a shape do not.
/// - `DegenerateShape { n }`
///   A matrix is too small for the requested statistic (`n² − n == 0`).
/// - `EmptyCollection`
///   A matrix collection passed to `matrix_mean` was empty.
/// - `IndexOutOfBounds { index, len }`
///   A constraint or component referenced a position past the end of its
///   input.
/// - `InvalidPair { i, j, n }`
///   A pair index was requested for `i >= j` or `j >= n`.
/// - `InvalidComponents { reason }`
///   Component lists and submatrices do not describe a partition that can
///   be reassembled.
/// - `InvalidMatrixKind { name }`
///   An unknown matrix kind name was parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum PopError {
    // ---- Domain ----
    InvalidFst { index: usize, value: f64 },
    CombDomain { n: u64, k: u64 },
    CombOverflow { n: u64, k: u64 },
    EmptyCollection,
    DegenerateShape { n: usize },

    // ---- Shape / layout ----
    LengthMismatch { what: &'static str, expected: usize, found: usize },
    NotSquare { rows: usize, cols: usize },
    ShapeMismatch { expected: (usize, usize), found: (usize, usize) },
    IndexOutOfBounds { index: usize, len: usize },
    InvalidPair { i: usize, j: usize, n: usize },
    InvalidComponents { reason: &'static str },

    // ---- Configuration ----
    InvalidMatrixKind { name: String },
}

impl std::error::Error for PopError {}

impl std::fmt::Display for PopError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Domain ----
            PopError::InvalidFst { index, value } => {
                write!(f, "Invalid Fst value {value} at index {index}: must be finite and in (-1, 1)")
            }
            PopError::CombDomain { n, k } => {
                write!(f, "Invalid binomial coefficient arguments: k = {k} exceeds n = {n}")
            }
            PopError::CombOverflow { n, k } => {
                write!(f, "Binomial coefficient C({n}, {k}) overflows u64")
            }
            PopError::EmptyCollection => {
                write!(f, "Matrix collection is empty")
            }
            PopError::DegenerateShape { n } => {
                write!(f, "Matrix of size {n}x{n} has no off-diagonal entries")
            }

            // ---- Shape / layout ----
            PopError::LengthMismatch { what, expected, found } => {
                write!(f, "Length mismatch for {what}: expected {expected}, found {found}")
            }
            PopError::NotSquare { rows, cols } => {
                write!(f, "Matrix must be square, found {rows}x{cols}")
            }
            PopError::ShapeMismatch { expected, found } => {
                write!(f, "Matrix shape mismatch: expected {expected:?}, found {found:?}")
            }
            PopError::IndexOutOfBounds { index, len } => {
                write!(f, "Index {index} out of bounds for length {len}")
            }
            PopError::InvalidPair { i, j, n } => {
                write!(f, "Invalid population pair ({i}, {j}) for n = {n}: need i < j < n")
            }
            PopError::InvalidComponents { reason } => {
                write!(f, "Invalid connected components: {reason}")
            }

            // ---- Configuration ----
            PopError::InvalidMatrixKind { name } => {
                write!(f, "Invalid matrix kind '{name}': valid options are 'fst' or 'coalescence'")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Payload embedding in `Display` messages for representative variants.
    //
    // They intentionally DO NOT cover:
    // - Conversion into `OptError`, which is tested in `optimization::errors`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that `InvalidFst` reports both the offending value and index.
    //
    // Given
    // -----
    // - `PopError::InvalidFst { index: 4, value: 1.0 }`.
    //
    // Expect
    // ------
    // - The message contains "4" and "1".
    fn invalid_fst_display_includes_index_and_value() {
        // Arrange
        let err = PopError::InvalidFst { index: 4, value: 1.0 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("index 4"), "Message should include index.\nGot: {msg}");
        assert!(msg.contains("value 1"), "Message should include value.\nGot: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Ensure that `LengthMismatch` names the layout and both lengths.
    //
    // Given
    // -----
    // - A mismatch for "coalescence unknowns" with expected 6 and found 5.
    //
    // Expect
    // ------
    // - The message contains the layout name, "6" and "5".
    fn length_mismatch_display_names_layout() {
        // Arrange
        let err = PopError::LengthMismatch { what: "coalescence unknowns", expected: 6, found: 5 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("coalescence unknowns"));
        assert!(msg.contains("expected 6"));
        assert!(msg.contains("found 5"));
    }

    #[test]
    fn invalid_matrix_kind_display_echoes_name() {
        let err = PopError::InvalidMatrixKind { name: "migration".to_string() };
        assert!(err.to_string().contains("'migration'"));
    }
}
