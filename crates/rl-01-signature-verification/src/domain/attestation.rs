//! # Oracle Attestations
//!
//! Message encoding for valuation attestations and the signing/verification
//! wrappers around them.
//!
//! ## Message Construction
//!
//! ```text
//! packed   = field_1 || field_2 [|| field_3]       (tight packing, uint256 = 32 bytes BE)
//! digest   = keccak256(packed)
//! prehash  = keccak256("\x19Ethereum Signed Message:\n32" || digest)
//! ```
//!
//! The signature is over `prehash`. Any change to any field changes `digest`
//! and invalidates the signature.

use super::ecdsa::{keccak256, recover_address, sign_prehash, verify_ecdsa_signer};
use super::entities::{Address, AttestationPayload, EcdsaSignature, Hash};
use super::errors::SignatureError;
use k256::ecdsa::SigningKey;
use shared_types::u256_to_be_bytes;
use tracing::debug;

/// Prefix of an Ethereum personal-sign message over a 32-byte digest.
pub const ETH_SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

impl AttestationPayload {
    /// Tightly packed field bytes.
    ///
    /// Integers are 32-byte big-endian; the description is its raw UTF-8
    /// bytes with no length prefix.
    pub fn encode_packed(&self) -> Vec<u8> {
        match self {
            Self::Undated {
                asset_id,
                valuation_wei,
            } => {
                let mut out = Vec::with_capacity(64);
                out.extend_from_slice(&u256_to_be_bytes(*asset_id));
                out.extend_from_slice(&u256_to_be_bytes(*valuation_wei));
                out
            }
            Self::Dated {
                asset_id,
                valuation_wei,
                deadline,
            } => {
                let mut out = Vec::with_capacity(96);
                out.extend_from_slice(&u256_to_be_bytes(*asset_id));
                out.extend_from_slice(&u256_to_be_bytes(*valuation_wei));
                out.extend_from_slice(&u256_to_be_bytes((*deadline).into()));
                out
            }
            Self::Described {
                description,
                valuation_wei,
            } => {
                let mut out = Vec::with_capacity(description.len() + 32);
                out.extend_from_slice(description.as_bytes());
                out.extend_from_slice(&u256_to_be_bytes(*valuation_wei));
                out
            }
        }
    }

    /// Keccak-256 of the packed fields.
    pub fn message_hash(&self) -> Hash {
        keccak256(&self.encode_packed())
    }

    /// The digest actually signed: the message hash under the Ethereum
    /// signed-message prefix.
    pub fn signed_message_hash(&self) -> Hash {
        eth_signed_message_hash(&self.message_hash())
    }
}

/// `keccak256("\x19Ethereum Signed Message:\n32" || hash)`
pub fn eth_signed_message_hash(hash: &Hash) -> Hash {
    let mut buf = Vec::with_capacity(ETH_SIGNED_MESSAGE_PREFIX.len() + 32);
    buf.extend_from_slice(ETH_SIGNED_MESSAGE_PREFIX);
    buf.extend_from_slice(hash);
    keccak256(&buf)
}

/// Sign an attestation payload.
pub fn sign_attestation(
    key: &SigningKey,
    payload: &AttestationPayload,
) -> Result<EcdsaSignature, SignatureError> {
    sign_prehash(&payload.signed_message_hash(), key)
}

/// Recover the address that signed `payload`.
///
/// A wrong payload still recovers *some* address; compare against the
/// expected signer before trusting it.
pub fn recover_attestation_signer(
    payload: &AttestationPayload,
    signature: &EcdsaSignature,
) -> Result<Address, SignatureError> {
    recover_address(&payload.signed_message_hash(), signature)
}

/// True iff `signature` over `payload` was produced by `expected`.
///
/// Fails closed: a malformed, malleable or unrecoverable signature is
/// reported as `false`, never as an error.
pub fn verify_attestation(
    payload: &AttestationPayload,
    signature: &EcdsaSignature,
    expected: Address,
) -> bool {
    let result = verify_ecdsa_signer(&payload.signed_message_hash(), signature, expected);
    if let Some(error) = &result.error {
        debug!(schema = ?payload.schema(), %error, "attestation rejected");
    }
    result.valid
}
