//! # Lending Pool Service
//!
//! Implements [`LendingPoolApi`] over the loan book, the custody wrappers and
//! the attestation verifier.
//!
//! ## Transactions
//!
//! One mutex guards the book for the full duration of every state-changing
//! call, so transactions are globally serialized and every check sees a single
//! consistent snapshot. Each transaction runs in three steps:
//!
//! 1. **Check**: every precondition is evaluated read-only.
//! 2. **Stage**: the book records the change.
//! 3. **Effect**: token capabilities are called in order. If one fails, the
//!    earlier effects are compensated and the staged change is reverted.
//!
//! Only after all effects succeed are the signals appended to the event log
//! and returned in the [`Receipt`].

use crate::domain::{
    Address, CollateralCustody, LedgerConfig, LedgerError, LendingEvent, Loan, LoanBook, LoanId,
    LoanStatus, Receipt, StablecoinCustody, Timestamp, TokenId, U256,
};
use crate::ports::inbound::LendingPoolApi;
use crate::ports::outbound::{
    CollateralCapability, StablecoinCapability, SystemTimeSource, TimeSource,
};
use parking_lot::Mutex;
use rl_01_signature_verification::{
    AttestationPayload, AttestationVerificationApi, AttestationVerifier, EcdsaSignature,
};
use shared_types::to_checksum_address;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// The loan ledger.
pub struct LendingPoolService {
    config: LedgerConfig,
    admin: Address,
    pool: Address,
    book: Mutex<LoanBook>,
    collateral: CollateralCustody,
    stablecoin: StablecoinCustody,
    verifier: Arc<dyn AttestationVerificationApi>,
    clock: Arc<dyn TimeSource>,
}

impl LendingPoolService {
    /// Create a ledger administered by `admin` whose custody account is `pool`.
    ///
    /// No oracle signer is registered initially, so no attestation verifies
    /// until the admin calls `set_oracle_signer`. Fails with
    /// [`LedgerError::InvalidConfig`] when `config` does not validate.
    pub fn new(
        config: LedgerConfig,
        admin: Address,
        pool: Address,
        collateral: Arc<dyn CollateralCapability>,
        stablecoin: Arc<dyn StablecoinCapability>,
    ) -> Result<Self, LedgerError> {
        config.validate()?;

        Ok(Self {
            book: Mutex::new(LoanBook::new(config.initial_interest_rate_bps)),
            config,
            admin,
            pool,
            collateral: CollateralCustody::new(collateral, pool),
            stablecoin: StablecoinCustody::new(stablecoin, pool),
            verifier: Arc::new(AttestationVerifier::new()),
            clock: Arc::new(SystemTimeSource),
        })
    }

    /// Replace the clock used for deadlines and loan start times.
    pub fn with_time_source(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the attestation verifier.
    pub fn with_verifier(mut self, verifier: Arc<dyn AttestationVerificationApi>) -> Self {
        self.verifier = verifier;
        self
    }

    /// Address that holds collateral and funds.
    pub fn pool_address(&self) -> Address {
        self.pool
    }

    /// Administrator address.
    pub fn admin(&self) -> Address {
        self.admin
    }

    /// Stablecoin available for new loans.
    pub fn available_liquidity(&self) -> U256 {
        self.stablecoin.pool_balance()
    }

    // =========================================================================
    // Checks
    // =========================================================================

    /// Signature over `payload` recovers to the registered signer. Fails closed.
    fn attestation_valid(
        &self,
        book: &LoanBook,
        payload: &AttestationPayload,
        signature: &[u8],
    ) -> bool {
        let signature = match EcdsaSignature::from_bytes(signature) {
            Ok(sig) => sig,
            Err(e) => {
                debug!(error = %e, "Malformed attestation signature");
                return false;
            }
        };
        self.verifier
            .verify_attestation(payload, &signature, book.registry().oracle_signer)
    }

    /// Preconditions shared by both borrow entry points.
    fn check_borrow(
        &self,
        book: &LoanBook,
        caller: Address,
        amount: U256,
        payload: &AttestationPayload,
        token_id: TokenId,
        signature: &[u8],
    ) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }

        if !self.attestation_valid(book, payload, signature) {
            return Err(LedgerError::InvalidSignature);
        }

        let max = self.config.max_borrow(payload.valuation_wei());
        if amount > max {
            return Err(LedgerError::ExceedsLtv {
                requested: amount,
                max,
            });
        }

        book.ensure_token_free(token_id)?;
        self.collateral.check_lockable(token_id, caller)?;
        self.stablecoin.check_liquidity(amount)
    }

    fn ensure_admin(&self, caller: Address) -> Result<(), LedgerError> {
        if caller != self.admin {
            return Err(LedgerError::NotAdmin);
        }
        Ok(())
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    fn try_borrow(
        &self,
        caller: Address,
        token_id: TokenId,
        amount: U256,
        valuation_wei: U256,
        signature: &[u8],
    ) -> Result<Receipt, LedgerError> {
        let mut book = self.book.lock();

        let payload = AttestationPayload::undated(token_id, valuation_wei);
        self.check_borrow(&book, caller, amount, &payload, token_id, signature)?;

        let interest_due = self.config.interest_for(amount, book.interest_rate());
        let loan_id = book.open_loan(token_id, caller, amount, interest_due, self.clock.now())?;

        if let Err(e) = self.collateral.lock(token_id, caller) {
            book.revert_open(loan_id);
            return Err(e.into());
        }
        if let Err(e) = self.stablecoin.disburse(caller, amount) {
            self.compensate(
                "return collateral",
                self.collateral.release(token_id, caller),
            );
            book.revert_open(loan_id);
            return Err(e.into());
        }

        let receipt = Receipt::single(LendingEvent::LoanCreated {
            loan_id,
            token_id,
            amount,
        });
        book.record(&receipt.events);

        info!(
            loan_id,
            %token_id,
            %amount,
            %interest_due,
            borrower = %to_checksum_address(&caller),
            "Loan opened"
        );
        Ok(receipt)
    }

    fn try_borrow_with_signature(
        &self,
        caller: Address,
        token_id: TokenId,
        amount: U256,
        valuation_wei: U256,
        deadline: Timestamp,
        signature: &[u8],
    ) -> Result<Receipt, LedgerError> {
        let mut book = self.book.lock();

        let now = self.clock.now();
        if now > deadline {
            return Err(LedgerError::SignatureExpired { deadline, now });
        }

        let payload = AttestationPayload::dated(token_id, valuation_wei, deadline);
        self.check_borrow(&book, caller, amount, &payload, token_id, signature)?;

        let receipt = Receipt::single(LendingEvent::ValuationUsed {
            token_id,
            valuation_wei,
            amount,
        });
        book.record(&receipt.events);

        info!(%token_id, %valuation_wei, %amount, deadline, "Dated valuation accepted");
        Ok(receipt)
    }

    fn try_repay(&self, caller: Address, loan_id: LoanId) -> Result<Receipt, LedgerError> {
        let mut book = self.book.lock();

        let loan = book.active_loan(loan_id)?.clone();
        let total_paid = loan.total_due().ok_or(LedgerError::Overflow)?;
        self.stablecoin.check_payment(caller, total_paid)?;

        book.close_loan(loan_id, LoanStatus::Repaid)?;

        if let Err(e) = self.stablecoin.collect(caller, total_paid) {
            book.revert_close(loan_id);
            return Err(e.into());
        }
        if let Err(e) = self.collateral.release(loan.token_id, loan.borrower) {
            self.compensate("refund repayment", self.stablecoin.disburse(caller, total_paid));
            book.revert_close(loan_id);
            return Err(e.into());
        }

        let receipt = Receipt::single(LendingEvent::LoanRepaid {
            loan_id,
            total_paid,
        });
        book.record(&receipt.events);

        info!(
            loan_id,
            token_id = %loan.token_id,
            %total_paid,
            payer = %to_checksum_address(&caller),
            "Loan repaid"
        );
        Ok(receipt)
    }

    fn try_liquidate(&self, caller: Address, loan_id: LoanId) -> Result<Receipt, LedgerError> {
        let mut book = self.book.lock();

        let loan = book.close_loan(loan_id, LoanStatus::Liquidated)?;

        if let Err(e) = self.collateral.release(loan.token_id, caller) {
            book.revert_close(loan_id);
            return Err(e.into());
        }

        let receipt = Receipt::single(LendingEvent::LoanLiquidated { loan_id });
        book.record(&receipt.events);

        info!(
            loan_id,
            token_id = %loan.token_id,
            liquidator = %to_checksum_address(&caller),
            "Loan liquidated"
        );
        Ok(receipt)
    }

    /// Log a compensation that could not be applied. The original error is
    /// still returned to the caller.
    fn compensate<E: std::fmt::Display>(&self, action: &'static str, result: Result<(), E>) {
        if let Err(e) = result {
            error!(action, error = %e, "Compensation failed");
        }
    }
}

/// Log a rejected transaction and pass the error through.
fn rejected(op: &'static str, err: LedgerError) -> LedgerError {
    warn!(op, kind = ?err.kind(), reason = %err, "Transaction rejected");
    err
}

impl LendingPoolApi for LendingPoolService {
    fn borrow(
        &self,
        caller: Address,
        token_id: TokenId,
        amount: U256,
        valuation_wei: U256,
        signature: &[u8],
    ) -> Result<Receipt, LedgerError> {
        self.try_borrow(caller, token_id, amount, valuation_wei, signature)
            .map_err(|e| rejected("borrow", e))
    }

    fn borrow_with_signature(
        &self,
        caller: Address,
        token_id: TokenId,
        amount: U256,
        valuation_wei: U256,
        deadline: Timestamp,
        signature: &[u8],
    ) -> Result<Receipt, LedgerError> {
        self.try_borrow_with_signature(caller, token_id, amount, valuation_wei, deadline, signature)
            .map_err(|e| rejected("borrow_with_signature", e))
    }

    fn repay(&self, caller: Address, loan_id: LoanId) -> Result<Receipt, LedgerError> {
        self.try_repay(caller, loan_id)
            .map_err(|e| rejected("repay", e))
    }

    fn liquidate(&self, caller: Address, loan_id: LoanId) -> Result<Receipt, LedgerError> {
        self.try_liquidate(caller, loan_id)
            .map_err(|e| rejected("liquidate", e))
    }

    fn update_interest_rate(&self, caller: Address, rate_bps: u64) -> Result<(), LedgerError> {
        self.ensure_admin(caller)
            .map_err(|e| rejected("update_interest_rate", e))?;

        let mut book = self.book.lock();
        let previous = book.interest_rate();
        book.set_interest_rate(rate_bps);
        info!(previous, rate_bps, "Interest rate updated");
        Ok(())
    }

    fn set_oracle(&self, caller: Address, oracle: Address) -> Result<(), LedgerError> {
        self.ensure_admin(caller)
            .map_err(|e| rejected("set_oracle", e))?;

        self.book.lock().registry_mut().oracle = oracle;
        info!(oracle = %to_checksum_address(&oracle), "Oracle updated");
        Ok(())
    }

    fn set_oracle_signer(&self, caller: Address, signer: Address) -> Result<(), LedgerError> {
        self.ensure_admin(caller)
            .map_err(|e| rejected("set_oracle_signer", e))?;

        self.book.lock().registry_mut().oracle_signer = signer;
        info!(signer = %to_checksum_address(&signer), "Oracle signer updated");
        Ok(())
    }

    fn get_user_loans(&self, borrower: Address) -> Vec<LoanId> {
        self.book.lock().user_loans(&borrower).to_vec()
    }

    fn token_to_loan_id(&self, token_id: TokenId) -> Option<LoanId> {
        self.book.lock().token_to_loan_id(token_id)
    }

    fn verify_valuation_signature(
        &self,
        token_id: TokenId,
        valuation_wei: U256,
        signature: &[u8],
    ) -> bool {
        let book = self.book.lock();
        let payload = AttestationPayload::undated(token_id, valuation_wei);
        self.attestation_valid(&book, &payload, signature)
    }

    fn loan(&self, loan_id: LoanId) -> Option<Loan> {
        self.book.lock().loan(loan_id).cloned()
    }

    fn interest_rate(&self) -> u64 {
        self.book.lock().interest_rate()
    }

    fn loan_id_counter(&self) -> LoanId {
        self.book.lock().loan_id_counter()
    }

    fn oracle(&self) -> Address {
        self.book.lock().registry().oracle
    }

    fn oracle_signer(&self) -> Address {
        self.book.lock().registry().oracle_signer
    }

    fn config(&self) -> LedgerConfig {
        self.config.clone()
    }

    fn events(&self) -> Vec<LendingEvent> {
        self.book.lock().events().to_vec()
    }
}
