//! # Domain Entities
//!
//! Core data structures for attestation signing and verification.

use super::errors::SignatureError;
use serde::{Deserialize, Serialize};
pub use shared_types::{Address, Hash, Timestamp, TokenId, U256};

/// Length of a serialized recoverable signature: r (32) || s (32) || v (1).
pub const SIGNATURE_LENGTH: usize = 65;

// =============================================================================
// ECDSA Types (secp256k1)
// =============================================================================

/// Recoverable ECDSA signature on the secp256k1 curve.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcdsaSignature {
    /// R component (32 bytes)
    pub r: [u8; 32],
    /// S component (32 bytes)
    pub s: [u8; 32],
    /// Recovery ID (0, 1, 27, or 28)
    pub v: u8,
}

impl EcdsaSignature {
    /// Parse the 65-byte `r || s || v` wire form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(SignatureError::InvalidLength(bytes.len()));
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Ok(Self { r, s, v: bytes[64] })
    }

    /// Parse a `0x`-prefixed (or bare) hex signature.
    pub fn from_hex(input: &str) -> Result<Self, SignatureError> {
        let bytes = shared_types::decode_hex(input).map_err(|_| SignatureError::InvalidHex)?;
        Self::from_bytes(&bytes)
    }

    /// Serialize to the 65-byte `r || s || v` wire form.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut out = [0u8; SIGNATURE_LENGTH];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }

    /// Serialize as `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        shared_types::to_hex_prefixed(&self.to_bytes())
    }
}

// =============================================================================
// Attestation Types
// =============================================================================

/// Message schema an attestation was signed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttestationSchema {
    /// Schema A: `(assetId, valuationWei)`, no expiry.
    Undated,
    /// Schema B: `(assetId, valuationWei, deadline)`.
    Dated,
    /// Pre-mint: `(description, valuationWei)`.
    Described,
}

/// The fields an oracle attestation commits to.
///
/// The signature is produced over the Keccak-256 hash of the tightly packed
/// fields, wrapped in the Ethereum signed-message prefix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttestationPayload {
    Undated {
        asset_id: TokenId,
        valuation_wei: U256,
    },
    Dated {
        asset_id: TokenId,
        valuation_wei: U256,
        deadline: Timestamp,
    },
    Described {
        description: String,
        valuation_wei: U256,
    },
}

impl AttestationPayload {
    /// Schema A payload.
    pub fn undated(asset_id: TokenId, valuation_wei: U256) -> Self {
        Self::Undated {
            asset_id,
            valuation_wei,
        }
    }

    /// Schema B payload.
    pub fn dated(asset_id: TokenId, valuation_wei: U256, deadline: Timestamp) -> Self {
        Self::Dated {
            asset_id,
            valuation_wei,
            deadline,
        }
    }

    /// Pre-mint payload keyed by a free-text description.
    pub fn described(description: impl Into<String>, valuation_wei: U256) -> Self {
        Self::Described {
            description: description.into(),
            valuation_wei,
        }
    }

    pub fn schema(&self) -> AttestationSchema {
        match self {
            Self::Undated { .. } => AttestationSchema::Undated,
            Self::Dated { .. } => AttestationSchema::Dated,
            Self::Described { .. } => AttestationSchema::Described,
        }
    }

    pub fn valuation_wei(&self) -> U256 {
        match self {
            Self::Undated { valuation_wei, .. }
            | Self::Dated { valuation_wei, .. }
            | Self::Described { valuation_wei, .. } => *valuation_wei,
        }
    }
}

// =============================================================================
// Verification Result Types
// =============================================================================

/// Result of signature verification.
#[derive(Clone, Debug)]
pub struct VerificationResult {
    /// Whether the signature is valid
    pub valid: bool,
    /// The recovered address (if verification succeeded)
    pub recovered_address: Option<Address>,
    /// Error details (if verification failed)
    pub error: Option<SignatureError>,
}

impl VerificationResult {
    /// Create a successful verification result.
    pub fn valid(recovered_address: Address) -> Self {
        Self {
            valid: true,
            recovered_address: Some(recovered_address),
            error: None,
        }
    }

    /// Create a failed verification result.
    pub fn invalid(error: SignatureError) -> Self {
        Self {
            valid: false,
            recovered_address: None,
            error: Some(error),
        }
    }
}
