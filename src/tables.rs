//! Split-nibble multiplication tables.
//!
//! For a coefficient `c`, a 32-byte table holds `c * x` for every low nibble
//! `x` (bytes 0..16) and for every high nibble `x << 4` (bytes 16..32), so
//! `c * b = lo[b & 0x0f] ^ hi[b >> 4]`. This is the same layout a `pshufb`
//! kernel consumes; the scalar loop below indexes it directly.

use crate::gf;
use crate::matrix::Matrix;

/// Nibble tables for one coefficient.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct NibbleTable {
    coefficient: u8,
    lo: [u8; 16],
    hi: [u8; 16],
}

impl NibbleTable {
    pub fn new(coefficient: u8) -> Self {
        let mut lo = [0u8; 16];
        let mut hi = [0u8; 16];
        for x in 0..16u8 {
            lo[x as usize] = gf::multiply(coefficient, x);
            hi[x as usize] = gf::multiply(coefficient, x << 4);
        }
        Self {
            coefficient,
            lo,
            hi,
        }
    }

    #[inline]
    pub fn multiply(&self, b: u8) -> u8 {
        self.lo[(b & 0x0f) as usize] ^ self.hi[(b >> 4) as usize]
    }

    /// `dst[i] ^= c * src[i]`
    fn mul_add(&self, src: &[u8], dst: &mut [u8]) {
        match self.coefficient {
            0 => {}
            1 => {
                for (d, &s) in dst.iter_mut().zip(src) {
                    *d ^= s;
                }
            }
            _ => {
                for (d, &s) in dst.iter_mut().zip(src) {
                    *d ^= self.multiply(s);
                }
            }
        }
    }
}

impl std::fmt::Debug for NibbleTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NibbleTable({:#04x})", self.coefficient)
    }
}

/// Tables for every coefficient of an `rows x cols` matrix.
///
/// [`apply`](Self::apply) computes, for each output row `r` and byte offset
/// `j`, `out_r[j] = sum_c coeff[r][c] * in_c[j]`.
#[derive(Debug, Clone)]
pub struct MulTables {
    rows: usize,
    cols: usize,
    tables: Vec<NibbleTable>,
}

impl MulTables {
    pub fn new(coefficients: &Matrix) -> Self {
        let tables = coefficients
            .as_bytes()
            .iter()
            .map(|&c| NibbleTable::new(c))
            .collect();
        Self {
            rows: coefficients.rows(),
            cols: coefficients.cols(),
            tables,
        }
    }

    /// Number of output vectors produced.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of input vectors consumed.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Multiply the coefficient matrix by `cols` input vectors of
    /// `vector_len` bytes each, packed back to back in `input`, writing
    /// `rows` vectors into `output`.
    ///
    /// Callers guarantee `input.len() == cols * vector_len` and
    /// `output.len() == rows * vector_len`.
    pub fn apply(&self, vector_len: usize, input: &[u8], output: &mut [u8]) {
        debug_assert_eq!(input.len(), self.cols * vector_len);
        debug_assert_eq!(output.len(), self.rows * vector_len);
        if vector_len == 0 {
            return;
        }
        output.fill(0);
        for (r, out) in output.chunks_exact_mut(vector_len).enumerate() {
            let row_tables = &self.tables[r * self.cols..(r + 1) * self.cols];
            for (table, src) in row_tables.iter().zip(input.chunks_exact(vector_len)) {
                table.mul_add(src, out);
            }
        }
    }
}
