//! Reed-Solomon encoding and erasure decoding
//!
//! Buffers are flat: fragment `i` of a buffer occupies bytes
//! `i * shard_size..(i + 1) * shard_size`. [`ShardLayout`] does that slicing
//! with bounds checks so the engines never compute raw offsets.

use tracing::{debug, trace};

use crate::error::CodingError;
use crate::tables::MulTables;
use crate::types::Code;

/// A flat buffer of `count` fragments of `shard_size` bytes each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardLayout {
    pub count: usize,
    pub shard_size: usize,
}

impl ShardLayout {
    pub fn new(count: usize, shard_size: usize) -> Self {
        Self { count, shard_size }
    }

    /// Total bytes in the buffer.
    pub fn len(&self) -> usize {
        self.count * self.shard_size
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fail with [`CodingError::SizeMismatch`] unless `buf` is exactly
    /// [`len`](Self::len) bytes.
    pub fn check(&self, what: &'static str, buf: &[u8]) -> Result<(), CodingError> {
        if buf.len() != self.len() {
            return Err(CodingError::SizeMismatch {
                what,
                expected: self.len(),
                got: buf.len(),
            });
        }
        Ok(())
    }

    /// Fragment `index` of `buf`, or `None` if it lies outside the buffer.
    pub fn fragment<'a>(&self, buf: &'a [u8], index: usize) -> Option<&'a [u8]> {
        if index >= self.count {
            return None;
        }
        let start = index * self.shard_size;
        buf.get(start..start + self.shard_size)
    }
}

/// Compute the parity fragments for `data`.
///
/// `data` must be exactly `k * shard_size` bytes (fragments `0..k` in order).
/// Returns `(m - k) * shard_size` bytes holding fragments `k..m`; the data
/// fragments are not repeated since the code is systematic.
pub fn encode(code: &Code, data: &[u8]) -> Result<Vec<u8>, CodingError> {
    let layout = ShardLayout::new(code.data_fragments(), code.shard_size());
    layout.check("data", data)?;

    let mut parity = vec![0u8; code.parity_size()];
    code.parity_tables().apply(code.shard_size(), data, &mut parity);

    debug!(
        m = code.total_fragments(),
        k = code.data_fragments(),
        shard_size = code.shard_size(),
        "encoded parity fragments"
    );

    Ok(parity)
}

/// Encode and return all `m` fragments: `data` followed by its parity.
pub fn encode_all(code: &Code, data: &[u8]) -> Result<Vec<u8>, CodingError> {
    let parity = encode(code, data)?;
    let mut fragments = Vec::with_capacity(data.len() + parity.len());
    fragments.extend_from_slice(data);
    fragments.extend_from_slice(&parity);
    Ok(fragments)
}

/// Recover the original data from `k` surviving fragments.
///
/// `erased` lists the missing fragment slots (at most `m - k`, distinct, each
/// in `0..m`). The decoder reads the `k` lowest-numbered slots not in
/// `erased`; `available` must hold exactly those fragments in ascending slot
/// order. Use [`surviving_fragments`] to build it from a full fragment set.
///
/// Returns `k * shard_size` bytes: the original data.
pub fn decode(code: &Code, available: &[u8], erased: &[usize]) -> Result<Vec<u8>, CodingError> {
    let k = code.data_fragments();
    let shard_size = code.shard_size();
    ShardLayout::new(k, shard_size).check("available fragments", available)?;

    let survivors = surviving_slots(code, erased)?;
    let data_erasures = erased.iter().filter(|&&slot| slot < k).count();

    debug!(
        m = code.total_fragments(),
        k,
        shard_size,
        ?erased,
        data_erasures,
        "decoding fragments"
    );
    trace!(?survivors, "decode rows");

    let decode_matrix = code
        .generator()
        .select_rows(&survivors)
        .invert()
        .ok_or(CodingError::SingularMatrix { rows: survivors })?;

    // Rows of the inverse map the survivors back onto data slots 0..k.
    let mut data = vec![0u8; code.data_size()];
    MulTables::new(&decode_matrix).apply(shard_size, available, &mut data);

    Ok(data)
}

/// Pick, from a full `m`-fragment buffer, the `k` fragments [`decode`]
/// expects for the given erasure list.
pub fn surviving_fragments(
    code: &Code,
    fragments: &[u8],
    erased: &[usize],
) -> Result<Vec<u8>, CodingError> {
    let layout = ShardLayout::new(code.total_fragments(), code.shard_size());
    layout.check("fragments", fragments)?;

    let survivors = surviving_slots(code, erased)?;
    let mut available = Vec::with_capacity(code.data_size());
    for slot in survivors {
        let fragment = layout
            .fragment(fragments, slot)
            .ok_or(CodingError::InvalidErasure {
                index: slot,
                reason: "slot outside fragment buffer",
            })?;
        available.extend_from_slice(fragment);
    }
    Ok(available)
}

/// Validate `erased` and return the `k` lowest slots that survive, ascending.
fn surviving_slots(code: &Code, erased: &[usize]) -> Result<Vec<usize>, CodingError> {
    let m = code.total_fragments();
    let k = code.data_fragments();

    if erased.len() > m - k {
        return Err(CodingError::SizeMismatch {
            what: "erasure list",
            expected: m - k,
            got: erased.len(),
        });
    }

    let mut in_error = vec![false; m];
    for &slot in erased {
        if slot >= m {
            return Err(CodingError::InvalidErasure {
                index: slot,
                reason: "slot out of range",
            });
        }
        if in_error[slot] {
            return Err(CodingError::InvalidErasure {
                index: slot,
                reason: "duplicate slot",
            });
        }
        in_error[slot] = true;
    }

    Ok((0..m).filter(|&slot| !in_error[slot]).take(k).collect())
}
