//! Adapters layer for the Loan Ledger.
//!
//! - `memory`: in-memory token capabilities
//! - `bus`: forwards ledger signals to the shared event bus

pub mod bus;
pub mod memory;

pub use bus::LedgerBusAdapter;
pub use memory::{InMemoryAssetToken, InMemoryStablecoin};
