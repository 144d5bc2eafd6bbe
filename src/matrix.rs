//! Dense matrices over GF(256) and generator-matrix construction.
//!
//! A generator matrix is `m x k`. Its top `k x k` block is the identity, so
//! data fragments pass through encoding unchanged, and rows `k..m` hold the
//! parity coefficients.

use std::fmt;

use crate::error::ConfigError;
use crate::gf;
use crate::types::MatrixKind;

/// Largest total fragment count the field can support.
pub const MAX_FRAGMENTS: usize = gf::GROUP_ORDER;

/// Largest `k` for which [`MatrixKind::Auto`] picks the Vandermonde construction.
///
/// Every square sub-matrix of the systematic Vandermonde matrix is invertible
/// up to `k = 3`. From `k = 4` on, some minors reduce to sums like
/// `a + b + c` of distinct powers of 2, which vanish for large enough `m`.
pub const VANDERMONDE_MAX_K: usize = 3;

/// Row-major matrix of field elements.
#[derive(Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<u8>,
}

impl Matrix {
    /// All-zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0u8; rows * cols],
        }
    }

    /// `n x n` identity.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.set(i, i, 1);
        }
        m
    }

    /// Build from row slices. Returns `None` if the rows are ragged.
    pub fn from_rows(rows: &[&[u8]]) -> Option<Self> {
        let cols = rows.first().map_or(0, |r| r.len());
        if rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        Some(Self {
            rows: rows.len(),
            cols,
            data: rows.concat(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// # Panics
    ///
    /// Panics if `r` or `c` is out of range.
    pub fn get(&self, r: usize, c: usize) -> u8 {
        self.row(r)[c]
    }

    /// # Panics
    ///
    /// Panics if `r` or `c` is out of range.
    pub fn set(&mut self, r: usize, c: usize, v: u8) {
        let cols = self.cols;
        self.data[r * cols..(r + 1) * cols][c] = v;
    }

    /// # Panics
    ///
    /// Panics if `r >= rows()`.
    pub fn row(&self, r: usize) -> &[u8] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    /// Flat row-major storage.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// New matrix made of the given rows, in the given order.
    ///
    /// # Panics
    ///
    /// Panics if any index is `>= rows()`.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &r in indices {
            data.extend_from_slice(self.row(r));
        }
        Self {
            rows: indices.len(),
            cols: self.cols,
            data,
        }
    }

    /// Rows `start..end` as a new matrix.
    ///
    /// # Panics
    ///
    /// Panics if `start > end` or `end > rows()`.
    pub fn sub_rows(&self, start: usize, end: usize) -> Self {
        Self {
            rows: end - start,
            cols: self.cols,
            data: self.data[start * self.cols..end * self.cols].to_vec(),
        }
    }

    /// Matrix product `self * rhs`. Returns `None` on a dimension mismatch.
    #[cfg(test)]
    pub(crate) fn multiply(&self, rhs: &Matrix) -> Option<Matrix> {
        if self.cols != rhs.rows {
            return None;
        }
        let mut out = Matrix::zeros(self.rows, rhs.cols);
        for r in 0..self.rows {
            for i in 0..self.cols {
                let a = self.get(r, i);
                if a == 0 {
                    continue;
                }
                let start = r * out.cols;
                gf::mul_add_slice(a, rhs.row(i), &mut out.data[start..start + out.cols]);
            }
        }
        Some(out)
    }

    /// Inverse by Gauss-Jordan elimination. `None` if the matrix is not
    /// square or is singular.
    pub fn invert(&self) -> Option<Matrix> {
        if self.rows != self.cols {
            return None;
        }
        let n = self.rows;
        let mut work = self.clone();
        let mut inv = Matrix::identity(n);

        for col in 0..n {
            let pivot_row = (col..n).find(|&r| work.get(r, col) != 0)?;
            if pivot_row != col {
                work.swap_rows(pivot_row, col);
                inv.swap_rows(pivot_row, col);
            }

            let scale = gf::invert(work.get(col, col)).ok()?;
            work.scale_row(col, scale);
            inv.scale_row(col, scale);

            for r in 0..n {
                let factor = work.get(r, col);
                if r == col || factor == 0 {
                    continue;
                }
                work.add_scaled_row(col, r, factor);
                inv.add_scaled_row(col, r, factor);
            }
        }
        Some(inv)
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        for c in 0..self.cols {
            self.data.swap(a * self.cols + c, b * self.cols + c);
        }
    }

    fn scale_row(&mut self, r: usize, factor: u8) {
        for v in &mut self.data[r * self.cols..(r + 1) * self.cols] {
            *v = gf::multiply(*v, factor);
        }
    }

    /// `row[dst] ^= factor * row[src]`
    fn add_scaled_row(&mut self, src: usize, dst: usize, factor: u8) {
        let cols = self.cols;
        let (src_row, dst_row) = if src < dst {
            let (head, tail) = self.data.split_at_mut(dst * cols);
            (&head[src * cols..(src + 1) * cols], &mut tail[..cols])
        } else {
            let (head, tail) = self.data.split_at_mut(src * cols);
            (&tail[..cols], &mut head[dst * cols..(dst + 1) * cols])
        };
        gf::mul_add_slice(factor, src_row, dst_row);
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix({}x{}) [", self.rows, self.cols)?;
        for r in 0..self.rows {
            write!(f, " ")?;
            for v in self.row(r) {
                write!(f, " {:02x}", v)?;
            }
            writeln!(f)?;
        }
        write!(f, "]")
    }
}

/// Check `m > k > 0` and that the field can supply `m` evaluation points.
pub fn validate_counts(m: usize, k: usize) -> Result<(), ConfigError> {
    if k == 0 || m <= k {
        return Err(ConfigError::InvalidCounts { m, k });
    }
    if m > MAX_FRAGMENTS {
        return Err(ConfigError::TooManyFragments {
            m,
            max: MAX_FRAGMENTS,
        });
    }
    Ok(())
}

/// Systematic Vandermonde generator: parity row `i` is
/// `[1, g, g^2, .., g^(k-1)]` with `g = 2^(i-k)`.
///
/// Only built for `k <= VANDERMONDE_MAX_K`; larger `k` returns
/// [`ConfigError::UnsupportedMatrix`].
pub fn vandermonde(m: usize, k: usize) -> Result<Matrix, ConfigError> {
    validate_counts(m, k)?;
    if k > VANDERMONDE_MAX_K {
        return Err(ConfigError::UnsupportedMatrix {
            kind: MatrixKind::Vandermonde,
            k,
            max_k: VANDERMONDE_MAX_K,
        });
    }
    let mut matrix = Matrix::zeros(m, k);
    for i in 0..k {
        matrix.set(i, i, 1);
    }
    let mut point = 1u8;
    for i in k..m {
        let mut p = 1u8;
        for j in 0..k {
            matrix.set(i, j, p);
            p = gf::multiply(p, point);
        }
        point = gf::multiply(point, 2);
    }
    Ok(matrix)
}

/// Systematic Cauchy generator: parity entry `(i, j)` is `1 / (i ^ j)`.
///
/// Rows use the points `k..m` and columns the points `0..k`, which are
/// disjoint, so every square sub-matrix of the parity block is invertible.
pub fn cauchy(m: usize, k: usize) -> Result<Matrix, ConfigError> {
    validate_counts(m, k)?;
    let mut matrix = Matrix::zeros(m, k);
    for i in 0..k {
        matrix.set(i, i, 1);
    }
    for i in k..m {
        for j in 0..k {
            matrix.set(i, j, gf::invert((i ^ j) as u8)?);
        }
    }
    Ok(matrix)
}

/// Build the generator for `(m, k)` under the given construction policy.
pub fn generator(m: usize, k: usize, kind: MatrixKind) -> Result<Matrix, ConfigError> {
    match kind.resolve(k) {
        MatrixKind::Vandermonde => vandermonde(m, k),
        _ => cauchy(m, k),
    }
}

/// Every way to choose `k` items out of `0..n`, in lexicographic order.
#[cfg(test)]
pub(crate) fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    fn walk(start: usize, n: usize, k: usize, cur: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if cur.len() == k {
            out.push(cur.clone());
            return;
        }
        for i in start..n {
            cur.push(i);
            walk(i + 1, n, k, cur, out);
            cur.pop();
        }
    }
    let mut out = Vec::new();
    walk(0, n, k, &mut Vec::with_capacity(k), &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_systematic(matrix: &Matrix, k: usize) {
        for r in 0..k {
            for c in 0..k {
                assert_eq!(matrix.get(r, c), (r == c) as u8, "({r},{c})");
            }
        }
    }

    #[test]
    fn test_identity_inverts_to_itself() {
        let id = Matrix::identity(5);
        assert_eq!(id.invert().unwrap(), id);
    }

    #[test]
    fn test_invert_times_original_is_identity() {
        let m = Matrix::from_rows(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 10]]).unwrap();
        let inv = m.invert().expect("invertible");
        assert_eq!(m.multiply(&inv).unwrap(), Matrix::identity(3));
        assert_eq!(inv.multiply(&m).unwrap(), Matrix::identity(3));
    }

    #[test]
    fn test_invert_needs_row_swap() {
        let m = Matrix::from_rows(&[&[0, 1], &[1, 0]]).unwrap();
        assert_eq!(m.invert().unwrap(), m);
    }

    #[test]
    fn test_invert_singular() {
        // Second row is 2 * first row.
        let m = Matrix::from_rows(&[&[1, 3], &[2, 6]]).unwrap();
        assert!(m.invert().is_none());

        let zero = Matrix::zeros(3, 3);
        assert!(zero.invert().is_none());
    }

    #[test]
    fn test_invert_non_square() {
        assert!(Matrix::zeros(2, 3).invert().is_none());
    }

    #[test]
    #[should_panic]
    fn test_get_column_out_of_range_panics() {
        // Must not wrap into the next row.
        Matrix::identity(2).get(0, 2);
    }

    #[test]
    #[should_panic]
    fn test_set_column_out_of_range_panics() {
        Matrix::zeros(2, 2).set(0, 2, 1);
    }

    #[test]
    #[should_panic]
    fn test_select_rows_out_of_range_panics() {
        Matrix::identity(3).select_rows(&[0, 3]);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        assert!(Matrix::from_rows(&[&[1, 2], &[3]]).is_none());
    }

    #[test]
    fn test_mul_dimension_mismatch() {
        assert!(Matrix::zeros(2, 3).multiply(&Matrix::zeros(2, 3)).is_none());
    }

    #[test]
    fn test_select_rows_and_sub_rows() {
        let m = vandermonde(5, 2).unwrap();
        let picked = m.select_rows(&[4, 0]);
        assert_eq!(picked.row(0), m.row(4));
        assert_eq!(picked.row(1), &[1, 0]);

        let parity = m.sub_rows(2, 5);
        assert_eq!(parity.rows(), 3);
        assert_eq!(parity.row(0), m.row(2));
    }

    #[test]
    fn test_vandermonde_rows() {
        let m = vandermonde(6, 3).unwrap();
        assert_systematic(&m, 3);
        assert_eq!(m.row(3), &[1, 1, 1]);
        assert_eq!(m.row(4), &[1, 2, 4]);
        assert_eq!(m.row(5), &[1, 4, 16]);
    }

    #[test]
    fn test_cauchy_rows() {
        let m = cauchy(7, 4).unwrap();
        assert_systematic(&m, 4);
        for i in 4..7 {
            for j in 0..4 {
                assert_eq!(gf::multiply(m.get(i, j), (i ^ j) as u8), 1);
            }
        }
    }

    #[test]
    fn test_generator_policy() {
        let auto_small = generator(5, 3, MatrixKind::Auto).unwrap();
        assert_eq!(auto_small, vandermonde(5, 3).unwrap());

        let auto_large = generator(8, 4, MatrixKind::Auto).unwrap();
        assert_eq!(auto_large, cauchy(8, 4).unwrap());

        let forced = generator(5, 2, MatrixKind::Cauchy).unwrap();
        assert_eq!(forced, cauchy(5, 2).unwrap());
    }

    #[test]
    fn test_vandermonde_rejects_large_k() {
        for k in [4, 5, 10] {
            assert!(matches!(
                vandermonde(k + 4, k),
                Err(ConfigError::UnsupportedMatrix {
                    kind: MatrixKind::Vandermonde,
                    max_k: VANDERMONDE_MAX_K,
                    ..
                })
            ));
            assert!(matches!(
                generator(k + 4, k, MatrixKind::Vandermonde),
                Err(ConfigError::UnsupportedMatrix { .. })
            ));
        }
    }

    #[test]
    fn test_validate_counts() {
        assert!(matches!(
            validate_counts(3, 3),
            Err(ConfigError::InvalidCounts { m: 3, k: 3 })
        ));
        assert!(matches!(
            validate_counts(3, 0),
            Err(ConfigError::InvalidCounts { .. })
        ));
        assert!(matches!(
            validate_counts(2, 5),
            Err(ConfigError::InvalidCounts { .. })
        ));
        assert!(matches!(
            validate_counts(256, 10),
            Err(ConfigError::TooManyFragments { m: 256, max: 255 })
        ));
        assert!(validate_counts(255, 254).is_ok());
    }

    #[test]
    fn test_largest_cauchy_builds() {
        let m = cauchy(255, 128).unwrap();
        assert_eq!(m.rows(), 255);
        assert!(m.as_bytes()[128 * 128..].iter().all(|&v| v != 0));
    }

    #[test]
    fn test_every_square_submatrix_invertible() {
        for (m, k) in [(4, 2), (5, 3), (6, 3), (7, 4), (9, 6), (10, 5)] {
            for kind in [MatrixKind::Auto, MatrixKind::Cauchy] {
                let g = generator(m, k, kind).unwrap();
                for rows in combinations(m, k) {
                    assert!(
                        g.select_rows(&rows).invert().is_some(),
                        "m={m} k={k} {kind:?} rows={rows:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_small_vandermonde_invertible_with_many_parity_rows() {
        for k in 1..=VANDERMONDE_MAX_K {
            let g = vandermonde(40, k).unwrap();
            for rows in combinations(40, k) {
                assert!(g.select_rows(&rows).invert().is_some(), "k={k} rows={rows:?}");
            }
        }
    }

    #[test]
    fn test_combinations() {
        assert_eq!(combinations(4, 2).len(), 6);
        assert_eq!(combinations(5, 5), vec![vec![0, 1, 2, 3, 4]]);
        assert_eq!(combinations(3, 1), vec![vec![0], vec![1], vec![2]]);
    }
}
