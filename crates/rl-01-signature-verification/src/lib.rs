//! # Signature Verification Subsystem (RL-01)
//!
//! Signs and verifies oracle valuation attestations for RWA-Lending.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Pure cryptographic logic, no I/O
//! - **Ports Layer** (`ports/`): Trait definitions for inbound interfaces
//! - **Service Layer** (`service.rs`): Wires domain logic to ports
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: Signatures with high S values are rejected
//! - **Fail Closed**: attestation verification returns `false` on any malformed input
//! - **Schema A has no expiry**: an undated attestation stays valid until the
//!   trusted signer is rotated

pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use domain::attestation::{
    eth_signed_message_hash, recover_attestation_signer, sign_attestation, verify_attestation,
    ETH_SIGNED_MESSAGE_PREFIX,
};
pub use domain::ecdsa::{address_from_pubkey, keccak256, recover_address, sign_prehash, verify_ecdsa};
pub use domain::entities::{
    AttestationPayload, AttestationSchema, EcdsaSignature, VerificationResult, SIGNATURE_LENGTH,
};
pub use domain::errors::SignatureError;
pub use k256::ecdsa::SigningKey;
pub use ports::inbound::AttestationVerificationApi;
pub use service::AttestationVerifier;
