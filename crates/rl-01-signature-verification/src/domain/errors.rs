//! # Signature Errors
//!
//! Error types for attestation signing and verification.

use shared_types::{to_checksum_address, Address};
use thiserror::Error;

/// Errors that can occur while parsing, producing or checking a signature.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// r or s is zero or not below the curve order.
    #[error("Invalid signature format")]
    InvalidFormat,

    /// Serialized signature is not 65 bytes.
    #[error("Invalid signature length: expected 65 bytes, got {0}")]
    InvalidLength(usize),

    /// Signature string is not valid hex.
    #[error("Invalid signature hex")]
    InvalidHex,

    /// Signature has high S value (EIP-2 malleability protection).
    #[error("Malleable signature (high S value)")]
    MalleableSignature,

    /// Invalid recovery ID (v must be 0, 1, 27, or 28).
    #[error("Invalid recovery ID: {0}")]
    InvalidRecoveryId(u8),

    /// No public key could be recovered from the signature.
    #[error("Failed to recover public key")]
    RecoveryFailed,

    /// Recovered signer does not match the expected signer.
    #[error("Signer mismatch: expected {}, got {}", checksum(expected), checksum(actual))]
    SignerMismatch { expected: Address, actual: Address },

    /// The signing key rejected the digest.
    #[error("Signing failed: {0}")]
    SigningFailed(String),
}

fn checksum(address: &Address) -> String {
    to_checksum_address(address)
}
