//! # Lending Events
//!
//! The signals emitted by accepted ledger transactions. The loan ledger
//! records these exact values in its event log and hands them to the bus
//! unchanged.
//!
//! | Signal | Topic | Loan | Token | Ends the loan |
//! |--------|-------|------|-------|---------------|
//! | `LoanCreated` | `Loans` | yes | yes | no |
//! | `ValuationUsed` | `Valuations` | no | yes | no |
//! | `LoanRepaid` | `Loans` | yes | no | yes |
//! | `LoanLiquidated` | `Loans` | yes | no | yes |

use serde::{Deserialize, Serialize};
use shared_types::{LoanId, TokenId, U256};

/// A signal emitted by an accepted ledger transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LendingEvent {
    /// `LoanCreated(loanId, tokenId, amount)`
    LoanCreated {
        loan_id: LoanId,
        token_id: TokenId,
        amount: U256,
    },

    /// `ValuationUsed(tokenId, valuationWei, amount)`
    ValuationUsed {
        token_id: TokenId,
        valuation_wei: U256,
        amount: U256,
    },

    /// `LoanRepaid(loanId, totalPaid)`
    LoanRepaid { loan_id: LoanId, total_paid: U256 },

    /// `LoanLiquidated(loanId)`
    LoanLiquidated { loan_id: LoanId },
}

impl LendingEvent {
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::ValuationUsed { .. } => EventTopic::Valuations,
            _ => EventTopic::Loans,
        }
    }

    /// The loan this event concerns, if any.
    #[must_use]
    pub fn loan_id(&self) -> Option<LoanId> {
        match self {
            Self::LoanCreated { loan_id, .. }
            | Self::LoanRepaid { loan_id, .. }
            | Self::LoanLiquidated { loan_id } => Some(*loan_id),
            Self::ValuationUsed { .. } => None,
        }
    }

    /// The collateral token named by the event itself.
    ///
    /// Repayment and liquidation only carry the loan id; a
    /// [`Subscription`](crate::Subscription) following a token resolves those
    /// through the `LoanCreated` it saw earlier.
    #[must_use]
    pub fn token_id(&self) -> Option<TokenId> {
        match self {
            Self::LoanCreated { token_id, .. } | Self::ValuationUsed { token_id, .. } => {
                Some(*token_id)
            }
            Self::LoanRepaid { .. } | Self::LoanLiquidated { .. } => None,
        }
    }

    /// Returns true when the event moves its loan to a terminal status.
    #[must_use]
    pub fn closes_loan(&self) -> bool {
        matches!(self, Self::LoanRepaid { .. } | Self::LoanLiquidated { .. })
    }
}

/// Coarse event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Loan lifecycle: created, repaid, liquidated.
    Loans,
    /// Accepted dated attestations.
    Valuations,
}

/// What a subscription follows beyond its topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Subject {
    /// Every event on the selected topics.
    #[default]
    Any,
    /// One loan, from creation until it is repaid or liquidated.
    Loan(LoanId),
    /// Every loan and valuation that involves one collateral token.
    Token(TokenId),
}

/// Subscription filter.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    pub subject: Subject,
}

impl EventFilter {
    /// Accept every event.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Accept events on the given topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            subject: Subject::Any,
        }
    }

    /// Follow a single loan. The subscription ends after the loan closes.
    #[must_use]
    pub fn loan(loan_id: LoanId) -> Self {
        Self {
            topics: Vec::new(),
            subject: Subject::Loan(loan_id),
        }
    }

    /// Follow every loan and valuation backed by `token_id`.
    #[must_use]
    pub fn token(token_id: TokenId) -> Self {
        Self {
            topics: Vec::new(),
            subject: Subject::Token(token_id),
        }
    }

    /// Returns true if `event` is on one of the selected topics.
    #[must_use]
    pub fn accepts_topic(&self, event: &LendingEvent) -> bool {
        self.topics.is_empty() || self.topics.contains(&event.topic())
    }
}
