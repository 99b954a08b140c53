//! Cross-subsystem integration flows.

pub mod fixture;
pub mod oracle_ledger;
pub mod scenarios;
