//! HQC building blocks exercised by the unit suites.
//!
//! - [`params`]: the HQC-128/192/256 parameter sets
//! - [`gf`]: arithmetic in GF(2^8)
//! - [`reed_solomon`]: the outer shortened Reed-Solomon code
//! - [`vector`]: bit vectors over GF(2) and products modulo `X^n - 1`

pub mod gf;
pub mod params;
pub mod reed_solomon;
pub mod vector;

use thiserror::Error;

pub use params::{Variant, VariantParams};
pub use reed_solomon::ReedSolomon;
pub use vector::BitVector;

/// Misuse of a code or vector primitive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodeError {
    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("weight {weight} exceeds vector length {len}")]
    WeightTooLarge { weight: usize, len: usize },

    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid code parameters: {0}")]
    InvalidParameters(String),
}
