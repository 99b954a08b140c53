//! Ports layer for the Loan Ledger.
//!
//! - `inbound`: the API the ledger offers
//! - `outbound`: the token capabilities and clock it depends on

pub mod inbound;
pub mod outbound;

pub use inbound::LendingPoolApi;
pub use outbound::{
    CapabilityError, CollateralCapability, MockTimeSource, StablecoinCapability, SystemTimeSource,
    TimeSource,
};
