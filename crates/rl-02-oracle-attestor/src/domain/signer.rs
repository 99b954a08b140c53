//! The oracle's signing key.
//!
//! Loaded once at startup and only read afterwards, so a single
//! `Arc<OracleSigner>` is shared by every request handler without locking.

use super::error::AttestorError;
use rl_01_signature_verification::{
    address_from_pubkey, sign_attestation, AttestationPayload, EcdsaSignature, SigningKey,
};
use shared_types::{decode_hex, to_checksum_address, Address};
use std::fmt;
use zeroize::Zeroizing;

/// Holds the oracle private key and its derived address.
pub struct OracleSigner {
    key: SigningKey,
    address: Address,
}

impl OracleSigner {
    pub fn new(key: SigningKey) -> Self {
        let address = address_from_pubkey(key.verifying_key());
        Self { key, address }
    }

    /// Parse a hex private key (`0x` optional).
    pub fn from_hex(input: &str) -> Result<Self, AttestorError> {
        let bytes = Zeroizing::new(
            decode_hex(input.trim()).map_err(|e| AttestorError::InvalidKey(e.to_string()))?,
        );
        let key = SigningKey::from_slice(&bytes)
            .map_err(|_| AttestorError::InvalidKey("not a valid secp256k1 scalar".into()))?;
        Ok(Self::new(key))
    }

    /// Address whose signatures the ledger must trust.
    pub fn address(&self) -> Address {
        self.address
    }

    /// EIP-55 rendering of [`address`](Self::address).
    pub fn checksum_address(&self) -> String {
        to_checksum_address(&self.address)
    }

    /// Sign an attestation.
    pub fn sign(&self, payload: &AttestationPayload) -> Result<EcdsaSignature, AttestorError> {
        Ok(sign_attestation(&self.key, payload)?)
    }
}

impl fmt::Debug for OracleSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OracleSigner")
            .field("address", &self.checksum_address())
            .finish_non_exhaustive()
    }
}
