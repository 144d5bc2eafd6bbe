//! Error types for code construction, encoding and decoding.

use crate::types::MatrixKind;

/// Inversion of zero in GF(256).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("zero has no multiplicative inverse in GF(256)")]
pub struct DomainError;

/// Errors raised while building a [`Code`](crate::Code).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Fragment counts violate `m > k > 0`.
    #[error("invalid fragment counts: m={m}, k={k} (need m > k > 0)")]
    InvalidCounts { m: usize, k: usize },

    /// The total data size does not split into `k` equal fragments.
    #[error("total size {total_size} is not divisible by k={k}")]
    SizeNotDivisible { total_size: usize, k: usize },

    /// The field has too few distinct elements for `m` fragments.
    #[error("{m} fragments requested, GF(256) supports at most {max}")]
    TooManyFragments { m: usize, max: usize },

    /// The requested generator construction cannot guarantee that every
    /// `k x k` sub-matrix is invertible.
    #[error("{kind:?} generator is not supported for k={k} (at most k={max_k})")]
    UnsupportedMatrix {
        kind: MatrixKind,
        k: usize,
        max_k: usize,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Parameters could not be parsed.
    #[error("invalid code parameters: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised by [`encode`](crate::encode) and [`decode`](crate::decode).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodingError {
    /// A buffer or list does not have the length the code requires.
    #[error("{what} has wrong length: expected {expected}, got {got}")]
    SizeMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// An erasure index is out of range or repeated.
    #[error("invalid erasure index {index}: {reason}")]
    InvalidErasure { index: usize, reason: &'static str },

    /// The decode sub-matrix built from the surviving rows has no inverse.
    #[error("decode matrix for surviving rows {rows:?} is singular")]
    SingularMatrix { rows: Vec<usize> },
}
