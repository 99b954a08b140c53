//! # Core Domain Entities
//!
//! Primitive identifiers and amounts shared across subsystems.
//!
//! ## Units
//!
//! - Amounts are fixed-point integers in the smallest stablecoin unit (wei,
//!   18 decimals).
//! - Timestamps are Unix seconds, matching the ledger clock used for
//!   attestation deadlines.

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

/// A 32-byte Keccak-256 digest.
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style address.
pub type Address = [u8; 20];

/// Identifier of a collateral token (ERC-721 style `uint256`).
pub type TokenId = U256;

/// Identifier of a loan recorded by the ledger.
pub type LoanId = u64;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// The zero address. Used as the "unset" value for registry entries.
pub const ZERO_ADDRESS: Address = [0u8; 20];

/// Number of decimals of the stablecoin.
pub const STABLECOIN_DECIMALS: u32 = 18;

/// Convert a whole-unit stablecoin amount (e.g. DAI) into wei.
pub fn units_to_wei(units: u64) -> U256 {
    U256::from(units) * U256::exp10(STABLECOIN_DECIMALS as usize)
}

/// Returns true if the address is the zero address.
pub fn is_zero_address(address: &Address) -> bool {
    address == &ZERO_ADDRESS
}
