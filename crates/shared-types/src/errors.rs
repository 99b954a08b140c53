//! # Error Types
//!
//! Errors raised while decoding shared primitive types.

use thiserror::Error;

/// Errors produced when parsing hex or decimal encodings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EncodingError {
    /// The input is not valid hex.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Decoded byte length does not match the expected width.
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// The input is not a base-10 unsigned integer that fits in 256 bits.
    #[error("Invalid integer: {0}")]
    InvalidInteger(String),
}
