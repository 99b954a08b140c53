//! # ECDSA over secp256k1
//!
//! Recovery-based verification and signing of 32-byte digests.
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: S must be strictly below half the curve order
//! - **Scalar Range Validation**: R and S must be in [1, n-1]
//! - **Constant-Time Comparisons**: range checks use the `subtle` crate
//! - Signatures produced here are always low-S with `v` in {27, 28}

use super::entities::{Address, EcdsaSignature, Hash, VerificationResult};
use super::errors::SignatureError;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use sha3::{Digest, Keccak256};
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

/// secp256k1 curve order n
const SECP256K1_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// n / 2, the EIP-2 upper bound (exclusive) for S.
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// Offset added to the raw recovery id in the Ethereum `v` byte.
const V_OFFSET: u8 = 27;

// =============================================================================
// VERIFICATION
// =============================================================================

/// Verify an ECDSA signature over a digest and recover the signer address.
///
/// Checks, in order:
/// 1. R and S are in [1, n-1]
/// 2. S is in the lower half of the order
/// 3. `v` is a recognised recovery id
/// 4. Public key recovery succeeds
pub fn verify_ecdsa(digest: &Hash, signature: &EcdsaSignature) -> VerificationResult {
    if !is_valid_scalar(&signature.r) || !is_valid_scalar(&signature.s) {
        return VerificationResult::invalid(SignatureError::InvalidFormat);
    }

    if !is_low_s(&signature.s) {
        return VerificationResult::invalid(SignatureError::MalleableSignature);
    }

    match recover_address(digest, signature) {
        Ok(address) => VerificationResult::valid(address),
        Err(e) => VerificationResult::invalid(e),
    }
}

/// Verify an ECDSA signature and check that the recovered signer matches `expected`.
pub fn verify_ecdsa_signer(
    digest: &Hash,
    signature: &EcdsaSignature,
    expected: Address,
) -> VerificationResult {
    let result = verify_ecdsa(digest, signature);

    match result.recovered_address {
        Some(recovered) if recovered != expected => {
            VerificationResult::invalid(SignatureError::SignerMismatch {
                expected,
                actual: recovered,
            })
        }
        _ => result,
    }
}

/// Recover the signer's address from a signature over `digest`.
///
/// Performs no malleability check; use [`verify_ecdsa`] for that.
pub fn recover_address(digest: &Hash, signature: &EcdsaSignature) -> Result<Address, SignatureError> {
    let recovery_id = parse_recovery_id(signature.v)?;

    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(&signature.r);
    sig_bytes[32..].copy_from_slice(&signature.s);
    let parsed = Signature::from_slice(&sig_bytes);
    sig_bytes.zeroize();
    let sig = parsed.map_err(|_| SignatureError::InvalidFormat)?;

    let recovered_key = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
        .map_err(|_| SignatureError::RecoveryFailed)?;

    Ok(address_from_pubkey(&recovered_key))
}

// =============================================================================
// SIGNING
// =============================================================================

/// Sign a 32-byte digest, returning a low-S signature with `v` in {27, 28}.
pub fn sign_prehash(digest: &Hash, key: &SigningKey) -> Result<EcdsaSignature, SignatureError> {
    let (sig, recid) = key
        .sign_prehash_recoverable(digest)
        .map_err(|e| SignatureError::SigningFailed(e.to_string()))?;

    let sig_bytes = sig.to_bytes();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&sig_bytes[..32]);
    s.copy_from_slice(&sig_bytes[32..]);

    // Normalizing s to n - s mirrors R, so the recovery parity flips.
    let (s, parity) = if is_low_s(&s) {
        (s, recid.to_byte() & 1)
    } else {
        (invert_s(&s), (recid.to_byte() & 1) ^ 1)
    };

    Ok(EcdsaSignature {
        r,
        s,
        v: parity + V_OFFSET,
    })
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Keccak-256 hash function.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// Derive the Ethereum address of a public key: the last 20 bytes of the
/// Keccak-256 of the uncompressed point without its `0x04` tag.
pub fn address_from_pubkey(public_key: &VerifyingKey) -> Address {
    let encoded = public_key.to_encoded_point(false);
    let hash = keccak256(&encoded.as_bytes()[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// Constant-time big-endian comparison: returns (a < b, a > b).
fn ct_compare(a: &[u8; 32], b: &[u8; 32]) -> (Choice, Choice) {
    let mut less = Choice::from(0u8);
    let mut greater = Choice::from(0u8);

    for i in 0..32 {
        let undecided = !(less | greater);
        less |= undecided & Choice::from((a[i] < b[i]) as u8);
        greater |= undecided & Choice::from((a[i] > b[i]) as u8);
    }

    (less, greater)
}

/// S is strictly below n/2 (EIP-2).
pub fn is_low_s(s: &[u8; 32]) -> bool {
    let (less, _) = ct_compare(s, &SECP256K1_HALF_ORDER);
    less.into()
}

/// Scalar is in [1, n-1].
fn is_valid_scalar(scalar: &[u8; 32]) -> bool {
    let mut is_zero = Choice::from(1u8);
    for byte in scalar {
        is_zero &= byte.ct_eq(&0u8);
    }

    let (less, _) = ct_compare(scalar, &SECP256K1_ORDER);
    (!is_zero & less).into()
}

/// Map an Ethereum `v` byte to a k256 recovery id. Accepts 0, 1, 27, 28.
fn parse_recovery_id(v: u8) -> Result<RecoveryId, SignatureError> {
    let id = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(SignatureError::InvalidRecoveryId(v)),
    };

    RecoveryId::try_from(id).map_err(|_| SignatureError::InvalidRecoveryId(v))
}

/// Compute n - s.
pub fn invert_s(s: &[u8; 32]) -> [u8; 32] {
    let mut result = [0u8; 32];
    let mut borrow: i16 = 0;

    for i in (0..32).rev() {
        let diff = SECP256K1_ORDER[i] as i16 - s[i] as i16 - borrow;
        if diff < 0 {
            result[i] = (diff + 256) as u8;
            borrow = 1;
        } else {
            result[i] = diff as u8;
            borrow = 0;
        }
    }

    result
}

// =============================================================================
// TEST HELPERS
// =============================================================================
