//! # Loan Book - Ledger State
//!
//! Pure in-memory state of the ledger. No I/O, no capabilities: the service
//! decides *whether* a transaction may happen, the book records *that* it did.
//!
//! ## Indices
//!
//! - `loans`: every loan ever opened, by id (never pruned)
//! - `token_to_loan`: active loan per collateral token
//! - `user_loans`: every loan id opened by a borrower, in creation order
//!
//! ## Invariants
//!
//! - At most one active loan per token; `token_to_loan` holds exactly the
//!   tokens of active loans.
//! - Loan ids are issued by pre-incrementing a counter that starts at 1, so
//!   the first id is 2 and id 1 is never issued.
//! - A loan leaves `Active` at most once.
//!
//! ## Staging
//!
//! The service stages a transaction in the book before touching external
//! token capabilities. If a capability then fails, the staged change is
//! undone with [`LoanBook::revert_open`] or [`LoanBook::revert_close`], which
//! restore the book exactly as it was.

use super::entities::{Address, Loan, LoanId, LoanStatus, OracleRegistry, Timestamp, TokenId, U256};
use super::errors::LedgerError;
use super::events::LendingEvent;
use std::collections::{BTreeMap, HashMap};

/// Initial value of the loan id counter. Never issued.
pub const RESERVED_LOAN_ID: LoanId = 1;

/// Ledger state.
#[derive(Debug, Clone)]
pub struct LoanBook {
    loans: BTreeMap<LoanId, Loan>,
    token_to_loan: HashMap<TokenId, LoanId>,
    user_loans: HashMap<Address, Vec<LoanId>>,
    loan_id_counter: LoanId,
    interest_rate_bps: u64,
    registry: OracleRegistry,
    log: Vec<LendingEvent>,
}

impl LoanBook {
    /// Empty book with the given starting interest rate.
    pub fn new(interest_rate_bps: u64) -> Self {
        Self {
            loans: BTreeMap::new(),
            token_to_loan: HashMap::new(),
            user_loans: HashMap::new(),
            loan_id_counter: RESERVED_LOAN_ID,
            interest_rate_bps,
            registry: OracleRegistry::default(),
            log: Vec::new(),
        }
    }

    /// Any loan, active or historical.
    pub fn loan(&self, loan_id: LoanId) -> Option<&Loan> {
        self.loans.get(&loan_id)
    }

    /// The loan if it exists and is active.
    pub fn active_loan(&self, loan_id: LoanId) -> Result<&Loan, LedgerError> {
        self.loans
            .get(&loan_id)
            .filter(|loan| loan.is_active())
            .ok_or(LedgerError::LoanNotActive(loan_id))
    }

    /// Active loan occupying `token_id`.
    pub fn token_to_loan_id(&self, token_id: TokenId) -> Option<LoanId> {
        self.token_to_loan.get(&token_id).copied()
    }

    /// Every loan id ever opened by `borrower`, oldest first.
    pub fn user_loans(&self, borrower: &Address) -> &[LoanId] {
        self.user_loans
            .get(borrower)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Last issued loan id ([`RESERVED_LOAN_ID`] before any loan).
    pub fn loan_id_counter(&self) -> LoanId {
        self.loan_id_counter
    }

    /// Number of loans ever opened.
    pub fn len(&self) -> usize {
        self.loans.len()
    }

    /// Returns true if no loan was ever opened.
    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }

    /// Number of active loans.
    pub fn active_count(&self) -> usize {
        self.token_to_loan.len()
    }

    /// Fails if an active loan already holds `token_id`.
    pub fn ensure_token_free(&self, token_id: TokenId) -> Result<(), LedgerError> {
        match self.token_to_loan.get(&token_id) {
            Some(&loan_id) => Err(LedgerError::TokenAlreadyCollateralized { token_id, loan_id }),
            None => Ok(()),
        }
    }

    /// Record a new active loan and return its id.
    pub fn open_loan(
        &mut self,
        token_id: TokenId,
        borrower: Address,
        amount: U256,
        interest_due: U256,
        start_time: Timestamp,
    ) -> Result<LoanId, LedgerError> {
        self.ensure_token_free(token_id)?;

        let id = self
            .loan_id_counter
            .checked_add(1)
            .ok_or(LedgerError::Overflow)?;
        self.loan_id_counter = id;

        self.loans.insert(
            id,
            Loan {
                id,
                token_id,
                borrower,
                amount,
                interest_due,
                start_time,
                status: LoanStatus::Active,
            },
        );
        self.token_to_loan.insert(token_id, id);
        self.user_loans.entry(borrower).or_default().push(id);

        Ok(id)
    }

    /// Move an active loan to a terminal status and free its token.
    pub fn close_loan(&mut self, loan_id: LoanId, status: LoanStatus) -> Result<Loan, LedgerError> {
        debug_assert!(status.is_terminal());

        let loan = self
            .loans
            .get_mut(&loan_id)
            .filter(|loan| loan.is_active())
            .ok_or(LedgerError::LoanNotActive(loan_id))?;

        loan.status = status;
        let closed = loan.clone();
        self.token_to_loan.remove(&closed.token_id);
        Ok(closed)
    }

    /// Undo the most recent [`open_loan`](Self::open_loan).
    pub fn revert_open(&mut self, loan_id: LoanId) {
        debug_assert_eq!(loan_id, self.loan_id_counter);

        let Some(loan) = self.loans.remove(&loan_id) else {
            return;
        };
        self.token_to_loan.remove(&loan.token_id);
        if let Some(ids) = self.user_loans.get_mut(&loan.borrower) {
            ids.retain(|id| *id != loan_id);
            if ids.is_empty() {
                self.user_loans.remove(&loan.borrower);
            }
        }
        self.loan_id_counter = loan_id - 1;
    }

    /// Undo a [`close_loan`](Self::close_loan), making the loan active again.
    pub fn revert_close(&mut self, loan_id: LoanId) {
        if let Some(loan) = self.loans.get_mut(&loan_id) {
            loan.status = LoanStatus::Active;
            self.token_to_loan.insert(loan.token_id, loan_id);
        }
    }

    /// Rate applied to loans opened from now on.
    pub fn interest_rate(&self) -> u64 {
        self.interest_rate_bps
    }

    /// Replace the rate for future loans. Existing loans keep their frozen interest.
    pub fn set_interest_rate(&mut self, rate_bps: u64) {
        self.interest_rate_bps = rate_bps;
    }

    /// Registered oracle addresses.
    pub fn registry(&self) -> &OracleRegistry {
        &self.registry
    }

    /// Mutable access for administrative updates.
    pub fn registry_mut(&mut self) -> &mut OracleRegistry {
        &mut self.registry
    }

    /// Append signals to the event log.
    pub fn record(&mut self, events: &[LendingEvent]) {
        self.log.extend_from_slice(events);
    }

    /// Every signal emitted so far, in order.
    pub fn events(&self) -> &[LendingEvent] {
        &self.log
    }
}

impl Default for LoanBook {
    fn default() -> Self {
        Self::new(super::entities::LedgerConfig::default().initial_interest_rate_bps)
    }
}
