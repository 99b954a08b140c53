//! # Inbound Ports (Driving Ports / API)
//!
//! Traits that define the public API of this subsystem.

use crate::domain::entities::{Address, AttestationPayload, EcdsaSignature, Hash, VerificationResult};
use crate::domain::errors::SignatureError;

/// Attestation verification API.
///
/// The lending ledger depends on this trait rather than on the concrete
/// verifier so tests can substitute it. Implementations must be thread-safe.
pub trait AttestationVerificationApi: Send + Sync {
    /// Verify an ECDSA signature over a raw digest and recover the signer.
    ///
    /// # Security
    /// - Rejects signatures with high S values (EIP-2 malleability protection)
    fn verify_ecdsa(&self, digest: &Hash, signature: &EcdsaSignature) -> VerificationResult;

    /// Recover the signer's address from a signature over a raw digest.
    fn recover_address(
        &self,
        digest: &Hash,
        signature: &EcdsaSignature,
    ) -> Result<Address, SignatureError>;

    /// Recover the address that signed an attestation payload.
    fn recover_attestation_signer(
        &self,
        payload: &AttestationPayload,
        signature: &EcdsaSignature,
    ) -> Result<Address, SignatureError>;

    /// True iff `signature` is a valid attestation of `payload` by `expected`.
    fn verify_attestation(
        &self,
        payload: &AttestationPayload,
        signature: &EcdsaSignature,
        expected: Address,
    ) -> bool;
}
