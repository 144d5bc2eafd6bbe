use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::matrix::{self, Matrix, VANDERMONDE_MAX_K};
use crate::tables::MulTables;

/// Generator-matrix construction policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixKind {
    /// Vandermonde for small `k`, Cauchy otherwise.
    #[default]
    Auto,
    Vandermonde,
    Cauchy,
}

impl MatrixKind {
    /// The concrete construction used for `k` data fragments.
    pub fn resolve(self, k: usize) -> MatrixKind {
        match self {
            MatrixKind::Auto if k <= VANDERMONDE_MAX_K => MatrixKind::Vandermonde,
            MatrixKind::Auto => MatrixKind::Cauchy,
            other => other,
        }
    }
}

/// Parameters for building a [`Code`].
///
/// ```json
/// { "m": 12, "k": 8, "total_size": 4096, "matrix": "cauchy" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeParams {
    /// Total fragment count (data + parity).
    #[serde(rename = "m")]
    pub total_fragments: usize,
    /// Data fragment count.
    #[serde(rename = "k")]
    pub data_fragments: usize,
    /// Bytes of data per encode call; split into `k` equal fragments.
    pub total_size: usize,
    #[serde(default)]
    pub matrix: MatrixKind,
}

impl CodeParams {
    /// Parse parameters from JSON bytes.
    pub fn from_json(data: &[u8]) -> Result<Self, ConfigError> {
        let params: CodeParams = serde_json::from_slice(data)?;
        Ok(params)
    }
}

/// An `(m, k)` systematic Reed-Solomon code over GF(256) with a fixed
/// fragment size.
///
/// Immutable after construction. It can be shared across threads; every
/// encode or decode call builds its own scratch buffers.
#[derive(Debug, Clone)]
pub struct Code {
    m: usize,
    k: usize,
    shard_size: usize,
    kind: MatrixKind,
    generator: Matrix,
    /// Tables for the parity rows `k..m`, which never change.
    parity_tables: MulTables,
}

impl Code {
    /// Build a code with the default generator policy.
    pub fn new(m: usize, k: usize, total_size: usize) -> Result<Self, ConfigError> {
        Self::with_matrix(m, k, total_size, MatrixKind::Auto)
    }

    /// Build a code with an explicit generator construction.
    pub fn with_matrix(
        m: usize,
        k: usize,
        total_size: usize,
        kind: MatrixKind,
    ) -> Result<Self, ConfigError> {
        matrix::validate_counts(m, k)?;
        if total_size % k != 0 {
            return Err(ConfigError::SizeNotDivisible { total_size, k });
        }

        let kind = kind.resolve(k);
        let generator = matrix::generator(m, k, kind)?;
        let parity_tables = MulTables::new(&generator.sub_rows(k, m));
        let shard_size = total_size / k;

        debug!(m, k, shard_size, ?kind, "built erasure code");

        Ok(Self {
            m,
            k,
            shard_size,
            kind,
            generator,
            parity_tables,
        })
    }

    pub fn from_params(params: &CodeParams) -> Result<Self, ConfigError> {
        Self::with_matrix(
            params.total_fragments,
            params.data_fragments,
            params.total_size,
            params.matrix,
        )
    }

    /// Total fragment count `m`.
    pub fn total_fragments(&self) -> usize {
        self.m
    }

    /// Data fragment count `k`.
    pub fn data_fragments(&self) -> usize {
        self.k
    }

    /// Parity fragment count `m - k`; also the most erasures decode tolerates.
    pub fn parity_fragments(&self) -> usize {
        self.m - self.k
    }

    /// Bytes per fragment.
    pub fn shard_size(&self) -> usize {
        self.shard_size
    }

    /// Bytes of original data per encode call: `k * shard_size`.
    pub fn data_size(&self) -> usize {
        self.k * self.shard_size
    }

    /// Bytes of parity per encode call: `(m - k) * shard_size`.
    pub fn parity_size(&self) -> usize {
        self.parity_fragments() * self.shard_size
    }

    /// The construction actually used (never `Auto`).
    pub fn matrix_kind(&self) -> MatrixKind {
        self.kind
    }

    /// The `m x k` generator matrix. Row `i` belongs to fragment slot `i`.
    pub fn generator(&self) -> &Matrix {
        &self.generator
    }

    pub(crate) fn parity_tables(&self) -> &MulTables {
        &self.parity_tables
    }

    /// Code over an arbitrary `m x k` generator, skipping construction checks.
    #[cfg(test)]
    pub(crate) fn from_generator(generator: Matrix, shard_size: usize) -> Self {
        let (m, k) = (generator.rows(), generator.cols());
        Self {
            m,
            k,
            shard_size,
            kind: MatrixKind::Auto,
            parity_tables: MulTables::new(&generator.sub_rows(k, m)),
            generator,
        }
    }
}
