//! GF(2^8) arithmetic
//!
//! Field elements are bytes. Addition is XOR; multiplication is carried out
//! through log/exp tables built at compile time for the reducing polynomial
//! x^8 + x^4 + x^3 + x^2 + 1 (0x11D) with generator 2.

use crate::error::DomainError;

/// Reducing polynomial, including the x^8 term.
pub const POLYNOMIAL: u16 = 0x11D;

/// Number of nonzero field elements (order of the multiplicative group).
pub const GROUP_ORDER: usize = 255;

static EXP_TABLE: [u8; 2 * GROUP_ORDER] = build_exp_table();
static LOG_TABLE: [u8; 256] = build_log_table();

const fn build_exp_table() -> [u8; 2 * GROUP_ORDER] {
    let mut table = [0u8; 2 * GROUP_ORDER];
    let mut val: u16 = 1;
    let mut i = 0;
    while i < GROUP_ORDER {
        table[i] = val as u8;
        // Doubled so log(a) + log(b) can index without a modulo.
        table[i + GROUP_ORDER] = val as u8;
        val <<= 1;
        if val & 0x100 != 0 {
            val ^= POLYNOMIAL;
        }
        i += 1;
    }
    table
}

const fn build_log_table() -> [u8; 256] {
    let exp = build_exp_table();
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < GROUP_ORDER {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// Field multiplication.
#[inline]
pub fn multiply(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let sum = LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize;
    EXP_TABLE[sum]
}

/// Multiplicative inverse of a nonzero element.
pub fn invert(a: u8) -> Result<u8, DomainError> {
    if a == 0 {
        return Err(DomainError);
    }
    Ok(EXP_TABLE[GROUP_ORDER - LOG_TABLE[a as usize] as usize])
}

/// Field division `a / b`.
#[cfg(test)]
pub(crate) fn divide(a: u8, b: u8) -> Result<u8, DomainError> {
    Ok(multiply(a, invert(b)?))
}

/// `dst[i] ^= c * src[i]`
pub fn mul_add_slice(c: u8, src: &[u8], dst: &mut [u8]) {
    debug_assert_eq!(src.len(), dst.len());
    match c {
        0 => {}
        1 => {
            for (d, &s) in dst.iter_mut().zip(src) {
                *d ^= s;
            }
        }
        _ => {
            for (d, &s) in dst.iter_mut().zip(src) {
                *d ^= multiply(c, s);
            }
        }
    }
}
