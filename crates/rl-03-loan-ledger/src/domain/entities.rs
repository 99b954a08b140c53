//! Core domain entities for the Loan Ledger.
//!
//! Defines loans, their lifecycle status, the ledger's policy configuration and
//! the oracle registry.

use super::errors::LedgerError;
use primitive_types::U512;
use serde::{Deserialize, Serialize};

// Re-export shared primitives so the rest of the crate imports from one place
pub use shared_types::{Address, LoanId, Timestamp, TokenId, U256, ZERO_ADDRESS};

/// Thirty days in seconds.
pub const DEFAULT_LOAN_TERM_SECS: u64 = 30 * 24 * 60 * 60;

/// Lifecycle status of a loan.
///
/// ```text
/// (none) ──borrow──→ Active ──repay─────→ Repaid
///                      │
///                      └────liquidate──→ Liquidated
/// ```
///
/// `Repaid` and `Liquidated` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanStatus {
    /// Collateral is locked and the debt is outstanding.
    Active,
    /// Principal and interest were paid; collateral returned to the borrower.
    Repaid,
    /// Collateral was transferred to a liquidator.
    Liquidated,
}

impl LoanStatus {
    /// Returns true for `Repaid` and `Liquidated`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LoanStatus::Active)
    }
}

/// A loan recorded by the ledger. Never deleted once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    /// Sequential identifier, global across both borrow entry points.
    pub id: LoanId,
    /// Collateral token locked by this loan.
    pub token_id: TokenId,
    /// Owner of the collateral when the loan was opened.
    pub borrower: Address,
    /// Principal disbursed, in stablecoin wei.
    pub amount: U256,
    /// Interest owed, frozen when the loan was opened.
    pub interest_due: U256,
    /// Ledger clock at open.
    pub start_time: Timestamp,
    /// Current lifecycle status.
    pub status: LoanStatus,
}

impl Loan {
    /// Principal plus frozen interest, or `None` on overflow.
    pub fn total_due(&self) -> Option<U256> {
        self.amount.checked_add(self.interest_due)
    }

    /// End of the nominal loan term. Informational only; nothing enforces it.
    pub fn due_at(&self, loan_term_secs: u64) -> Timestamp {
        self.start_time.saturating_add(loan_term_secs)
    }

    /// Returns true while the loan holds its collateral.
    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }
}

/// Lending policy owned by a ledger instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// LTV numerator (default 70).
    pub ltv_numerator: u64,
    /// LTV denominator (default 100).
    pub ltv_denominator: u64,
    /// Interest rates are expressed over this denominator (basis points).
    pub rate_denominator: u64,
    /// Interest rate in effect when the ledger is created.
    pub initial_interest_rate_bps: u64,
    /// Nominal loan term reported by [`Loan::due_at`].
    pub loan_term_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            ltv_numerator: 70,
            ltv_denominator: 100,
            rate_denominator: 10_000,
            initial_interest_rate_bps: 500,
            loan_term_secs: DEFAULT_LOAN_TERM_SECS,
        }
    }
}

impl LedgerConfig {
    /// Reject policies whose ratios are undefined or exceed the collateral.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.ltv_denominator == 0 {
            return Err(LedgerError::InvalidConfig(
                "ltv_denominator cannot be 0".into(),
            ));
        }

        if self.ltv_numerator > self.ltv_denominator {
            return Err(LedgerError::InvalidConfig(format!(
                "ltv {}/{} exceeds the collateral value",
                self.ltv_numerator, self.ltv_denominator
            )));
        }

        if self.rate_denominator == 0 {
            return Err(LedgerError::InvalidConfig(
                "rate_denominator cannot be 0".into(),
            ));
        }

        Ok(())
    }

    /// Largest amount that may be borrowed against `valuation_wei`.
    ///
    /// `valuation × ltv_numerator / ltv_denominator`, rounded down. The product
    /// is taken in 512 bits so no valuation can overflow.
    pub fn max_borrow(&self, valuation_wei: U256) -> U256 {
        mul_div(valuation_wei, self.ltv_numerator, self.ltv_denominator)
    }

    /// Interest frozen at open: `amount × rate_bps / rate_denominator`.
    pub fn interest_for(&self, amount: U256, rate_bps: u64) -> U256 {
        mul_div(amount, rate_bps, self.rate_denominator)
    }
}

/// `value × numerator / denominator` without intermediate overflow.
///
/// Saturates at `U256::MAX` when the quotient does not fit. A zero
/// denominator also saturates; [`LedgerConfig::validate`] keeps it out of
/// any running ledger.
fn mul_div(value: U256, numerator: u64, denominator: u64) -> U256 {
    if denominator == 0 {
        return U256::MAX;
    }
    let product: U512 = value.full_mul(U256::from(numerator));
    let quotient = product / U512::from(denominator);
    U256::try_from(quotient).unwrap_or(U256::MAX)
}

/// Registered oracle addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OracleRegistry {
    /// Administrative alias for the oracle. Not used for verification.
    pub oracle: Address,
    /// The key whose attestations the ledger trusts.
    pub oracle_signer: Address,
}
