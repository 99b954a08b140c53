//! # Inbound Port - LendingPoolApi
//!
//! The ledger surface consumed by wallet-driven clients.
//!
//! Every state-changing method takes the `caller` explicitly and either
//! applies the whole transaction and returns a [`Receipt`], or leaves the
//! ledger untouched and returns the rejection.
//!
//! | Method | Caller |
//! |--------|--------|
//! | `borrow`, `borrow_with_signature` | collateral owner |
//! | `repay` | anyone holding the amount owed |
//! | `liquidate` | anyone |
//! | `update_interest_rate`, `set_oracle`, `set_oracle_signer` | admin |

use crate::domain::{
    Address, LedgerConfig, LedgerError, LendingEvent, Loan, LoanId, Receipt, Timestamp, TokenId,
    U256,
};

/// Primary API of the loan ledger.
pub trait LendingPoolApi: Send + Sync {
    /// Open a loan against an undated (Schema A) attestation.
    ///
    /// # Errors
    /// - `InvalidSignature`: not signed by the registered oracle signer
    /// - `ExceedsLtv`: `amount` above 70% of `valuation_wei`
    /// - `NotTokenOwner` / `NotApproved`: collateral preconditions
    /// - `InsufficientLiquidity`: the pool cannot fund `amount`
    fn borrow(
        &self,
        caller: Address,
        token_id: TokenId,
        amount: U256,
        valuation_wei: U256,
        signature: &[u8],
    ) -> Result<Receipt, LedgerError>;

    /// Validate a dated (Schema B) attestation and signal its acceptance.
    ///
    /// Checks the same preconditions as [`borrow`](Self::borrow) plus the
    /// deadline, then emits `ValuationUsed`. Does not open a loan.
    fn borrow_with_signature(
        &self,
        caller: Address,
        token_id: TokenId,
        amount: U256,
        valuation_wei: U256,
        deadline: Timestamp,
        signature: &[u8],
    ) -> Result<Receipt, LedgerError>;

    /// Pay `amount + interest_due` and return the collateral to the borrower.
    fn repay(&self, caller: Address, loan_id: LoanId) -> Result<Receipt, LedgerError>;

    /// Transfer the collateral of an active loan to `caller`.
    fn liquidate(&self, caller: Address, loan_id: LoanId) -> Result<Receipt, LedgerError>;

    /// Set the rate (basis points) for loans opened from now on.
    fn update_interest_rate(&self, caller: Address, rate_bps: u64) -> Result<(), LedgerError>;

    /// Set the administrative oracle alias.
    fn set_oracle(&self, caller: Address, oracle: Address) -> Result<(), LedgerError>;

    /// Set the address whose attestations are trusted.
    fn set_oracle_signer(&self, caller: Address, signer: Address) -> Result<(), LedgerError>;

    /// Every loan id `borrower` ever opened, oldest first.
    fn get_user_loans(&self, borrower: Address) -> Vec<LoanId>;

    /// Active loan holding `token_id`, if any.
    fn token_to_loan_id(&self, token_id: TokenId) -> Option<LoanId>;

    /// Whether `signature` is a Schema A attestation of `(token_id, valuation_wei)`
    /// by the registered oracle signer. Malformed signatures yield `false`.
    fn verify_valuation_signature(
        &self,
        token_id: TokenId,
        valuation_wei: U256,
        signature: &[u8],
    ) -> bool;

    /// Any loan, including repaid and liquidated ones.
    fn loan(&self, loan_id: LoanId) -> Option<Loan>;

    /// Current rate for new loans, in basis points.
    fn interest_rate(&self) -> u64;

    /// Last issued loan id.
    fn loan_id_counter(&self) -> LoanId;

    /// Administrative oracle alias.
    fn oracle(&self) -> Address;

    /// Trusted attestation signer.
    fn oracle_signer(&self) -> Address;

    /// Lending policy of this ledger.
    fn config(&self) -> LedgerConfig;

    /// Every signal emitted so far, in order.
    fn events(&self) -> Vec<LendingEvent>;
}
