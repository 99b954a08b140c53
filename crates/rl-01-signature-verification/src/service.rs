//! # Attestation Verification Service
//!
//! Application service that implements [`AttestationVerificationApi`] by
//! delegating to the domain layer.

use crate::domain::attestation;
use crate::domain::ecdsa;
use crate::domain::entities::{
    Address, AttestationPayload, EcdsaSignature, Hash, VerificationResult,
};
use crate::domain::errors::SignatureError;
use crate::ports::inbound::AttestationVerificationApi;

/// Stateless attestation verifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttestationVerifier;

impl AttestationVerifier {
    pub fn new() -> Self {
        Self
    }
}

impl AttestationVerificationApi for AttestationVerifier {
    fn verify_ecdsa(&self, digest: &Hash, signature: &EcdsaSignature) -> VerificationResult {
        ecdsa::verify_ecdsa(digest, signature)
    }

    fn recover_address(
        &self,
        digest: &Hash,
        signature: &EcdsaSignature,
    ) -> Result<Address, SignatureError> {
        ecdsa::recover_address(digest, signature)
    }

    fn recover_attestation_signer(
        &self,
        payload: &AttestationPayload,
        signature: &EcdsaSignature,
    ) -> Result<Address, SignatureError> {
        attestation::recover_attestation_signer(payload, signature)
    }

    fn verify_attestation(
        &self,
        payload: &AttestationPayload,
        signature: &EcdsaSignature,
        expected: Address,
    ) -> bool {
        attestation::verify_attestation(payload, signature, expected)
    }
}
