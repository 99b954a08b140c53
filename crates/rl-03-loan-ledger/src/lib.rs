//! # Loan Ledger Subsystem (RL-03)
//!
//! State machine for loans secured by tokenized real-world assets: verifies
//! oracle attestations, enforces loan-to-value, locks NFT collateral,
//! disburses and collects stablecoin, and records every loan forever.
//!
//! ## Loan Lifecycle
//!
//! ```text
//! [None] ──borrow──→ [Active] ──repay─────→ [Repaid]
//!                        │
//!                        └────liquidate──→ [Liquidated]
//! ```
//!
//! | Operation | Signal | Custody effect |
//! |-----------|--------|----------------|
//! | `borrow` | `LoanCreated(loanId, tokenId, amount)` | NFT borrower → pool, funds pool → borrower |
//! | `borrow_with_signature` | `ValuationUsed(tokenId, valuationWei, amount)` | none |
//! | `repay` | `LoanRepaid(loanId, totalPaid)` | funds payer → pool, NFT pool → borrower |
//! | `liquidate` | `LoanLiquidated(loanId)` | NFT pool → liquidator |
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | One active loan per token | `LoanBook::ensure_token_free`, custody transfer |
//! | Interest frozen at open | `Loan::interest_due` written once in `LoanBook::open_loan` |
//! | Ids global, first id 2 | `LoanBook` counter starts at `RESERVED_LOAN_ID` |
//! | All-or-nothing transactions | stage/revert in `service.rs` |
//!
//! ## Outbound Dependencies
//!
//! | Dependency | Trait | Purpose |
//! |------------|-------|---------|
//! | Collateral NFT | `CollateralCapability` | ownership, approval, transfer |
//! | Stablecoin | `StablecoinCapability` | balance, allowance, transfer |
//! | RL-01 | `AttestationVerificationApi` | oracle signature recovery |
//! | Clock | `TimeSource` | deadlines, loan start time |
//!
//! ## Security Notes
//!
//! An undated attestation has no expiry or nonce. It can be presented again
//! whenever no active loan holds its token, including after the loan it first
//! backed was repaid. Rotating the oracle signer invalidates all outstanding
//! attestations.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export main types
pub use adapters::{InMemoryAssetToken, InMemoryStablecoin, LedgerBusAdapter};
pub use domain::{
    CollateralCustody, ErrorKind, LedgerConfig, LedgerError, LendingEvent, Loan, LoanBook,
    LoanStatus, OracleRegistry, Receipt, StablecoinCustody, DEFAULT_LOAN_TERM_SECS,
    RESERVED_LOAN_ID,
};
pub use ports::{
    CapabilityError, CollateralCapability, LendingPoolApi, MockTimeSource, StablecoinCapability,
    SystemTimeSource, TimeSource,
};
pub use service::LendingPoolService;
