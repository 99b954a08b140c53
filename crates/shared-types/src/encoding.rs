//! # Encodings
//!
//! Hex and decimal codecs for the wire formats the attestor and the ledger
//! exchange: `0x`-prefixed hex for addresses and signatures, base-10 strings
//! for `uint256` amounts (JSON cannot carry 256-bit integers natively).

use crate::entities::{Address, U256};
use crate::errors::EncodingError;
use sha3::{Digest, Keccak256};

/// Encode bytes as a lowercase `0x`-prefixed hex string.
pub fn to_hex_prefixed(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode a hex string with an optional `0x` prefix.
pub fn decode_hex(input: &str) -> Result<Vec<u8>, EncodingError> {
    let trimmed = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    hex::decode(trimmed).map_err(|e| EncodingError::InvalidHex(e.to_string()))
}

/// Parse a 20-byte address from hex (checksum casing is not enforced).
pub fn parse_address(input: &str) -> Result<Address, EncodingError> {
    let bytes = decode_hex(input)?;
    if bytes.len() != 20 {
        return Err(EncodingError::InvalidLength {
            expected: 20,
            actual: bytes.len(),
        });
    }
    let mut address = [0u8; 20];
    address.copy_from_slice(&bytes);
    Ok(address)
}

/// Render an address with EIP-55 mixed-case checksum.
pub fn to_checksum_address(address: &Address) -> String {
    let lower = hex::encode(address);
    let digest = Keccak256::digest(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            digest[i / 2] >> 4
        } else {
            digest[i / 2] & 0x0f
        };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Parse a base-10 `uint256`.
///
/// Only ASCII digits are accepted: no sign, no whitespace, no exponent.
pub fn parse_u256_dec(input: &str) -> Result<U256, EncodingError> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EncodingError::InvalidInteger(input.to_string()));
    }
    U256::from_dec_str(input).map_err(|_| EncodingError::InvalidInteger(input.to_string()))
}

/// Big-endian 32-byte encoding of a `uint256`.
pub fn u256_to_be_bytes(value: U256) -> [u8; 32] {
    let mut out = [0u8; 32];
    value.to_big_endian(&mut out);
    out
}
