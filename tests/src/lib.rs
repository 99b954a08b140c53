//! # RWA-Lending Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── lending_benchmarks.rs  # Attestation verification, borrow/repay cycle
//! └── src/integration/
//!     ├── fixture.rs             # Attestor + ledger + tokens on one clock
//!     ├── oracle_ledger.rs       # Attestor → verifier → ledger → bus
//!     └── scenarios.rs           # Borrow, repay, liquidate lifecycle
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p rl-tests
//!
//! # By category
//! cargo test -p rl-tests integration::scenarios::
//! cargo test -p rl-tests integration::oracle_ledger::
//!
//! # Benchmarks
//! cargo bench -p rl-tests
//! ```

#![allow(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod integration;
