//! # Shared Types Crate
//!
//! Primitive types used by every RWA-Lending subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Addresses, hashes and amounts are defined once
//!   here so the attestor and the ledger agree byte-for-byte on encodings.
//! - **EVM-compatible widths**: token ids and amounts are `U256`, addresses are
//!   20 bytes, hashes are 32 bytes.

pub mod encoding;
pub mod entities;
pub mod errors;

pub use encoding::*;
pub use entities::*;
pub use errors::*;
