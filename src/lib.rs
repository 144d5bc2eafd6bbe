//! gf-erasure: systematic Reed-Solomon erasure coding over GF(256)
//!
//! Given `k` data fragments, an `(m, k)` code produces `m - k` parity
//! fragments so that any `k` of the `m` fragments recover the data:
//! - `gf`: GF(2^8) arithmetic under the polynomial 0x11D
//! - `matrix`: generator matrices (Vandermonde, Cauchy) and Gauss-Jordan inversion
//! - `tables`: split-nibble multiplication tables driving encode and decode
//! - `erasure`: the encoder and the erasure decoder
//!
//! # Example
//!
//! ```
//! use gf_erasure::{decode, encode_all, surviving_fragments, Code};
//!
//! let code = Code::new(4, 2, 4)?;
//! let data = [0x01, 0x02, 0x03, 0x04];
//!
//! // Data fragments 0..2 followed by parity fragments 2..4.
//! let fragments = encode_all(&code, &data)?;
//!
//! // Lose fragment 0 and parity fragment 2.
//! let erased = [0, 2];
//! let available = surviving_fragments(&code, &fragments, &erased)?;
//! assert_eq!(decode(&code, &available, &erased)?, data);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod erasure;
pub mod error;
pub mod gf;
pub mod matrix;
pub mod tables;
pub mod types;

// Re-exports for convenient access
pub use erasure::{decode, encode, encode_all, surviving_fragments, ShardLayout};
pub use error::{CodingError, ConfigError, DomainError};
pub use matrix::{Matrix, MAX_FRAGMENTS};
pub use types::{Code, CodeParams, MatrixKind};
