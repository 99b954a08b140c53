//! # Subscriptions
//!
//! A subscription narrows the broadcast stream by topic and by subject.
//! Following a loan or a token is stateful: a loan watch ends once the loan
//! is repaid or liquidated, and a token watch learns which loans the token
//! backs from their `LoanCreated` signal so it can attribute the closing
//! signals, which carry only the loan id.

use crate::events::{EventFilter, LendingEvent, Subject};
use shared_types::LoanId;
use std::collections::BTreeSet;
use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, warn};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The bus was dropped.
    #[error("Event bus closed")]
    Closed,

    /// The followed loan was repaid or liquidated; nothing more will arrive.
    #[error("Loan {0} is closed")]
    LoanClosed(LoanId),
}

/// Receiving end of an [`InMemoryEventBus`](crate::InMemoryEventBus).
pub struct Subscription {
    receiver: broadcast::Receiver<LendingEvent>,
    filter: EventFilter,
    /// Loans opened against the followed token and not yet closed.
    open_loans: BTreeSet<LoanId>,
    /// Set once a followed loan closes.
    closed: Option<LoanId>,
    missed: u64,
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<LendingEvent>, filter: EventFilter) -> Self {
        Self {
            receiver,
            filter,
            open_loans: BTreeSet::new(),
            closed: None,
            missed: 0,
        }
    }

    /// Wait for the next matching event.
    ///
    /// Returns `None` once the bus is dropped or, for a loan watch, after the
    /// closing signal has been delivered.
    pub async fn recv(&mut self) -> Option<LendingEvent> {
        loop {
            if self.closed.is_some() {
                return None;
            }
            match self.receiver.recv().await {
                Ok(event) => {
                    if self.admit(&event) {
                        return Some(event);
                    }
                }
                Err(RecvError::Lagged(skipped)) => self.lagged(skipped),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next matching event if one is already buffered.
    pub fn try_recv(&mut self) -> Result<Option<LendingEvent>, SubscriptionError> {
        loop {
            if let Some(loan_id) = self.closed {
                return Err(SubscriptionError::LoanClosed(loan_id));
            }
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.admit(&event) {
                        return Ok(Some(event));
                    }
                }
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Lagged(skipped)) => self.lagged(skipped),
                Err(TryRecvError::Closed) => return Err(SubscriptionError::Closed),
            }
        }
    }

    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Loans a token watch currently considers open, ascending.
    #[must_use]
    pub fn open_loans(&self) -> Vec<LoanId> {
        self.open_loans.iter().copied().collect()
    }

    /// Events dropped because this subscription fell behind the bus.
    #[must_use]
    pub fn missed(&self) -> u64 {
        self.missed
    }

    /// Update subject state for `event` and decide whether to deliver it.
    ///
    /// Subject state is updated before the topic check so a token watch
    /// restricted to valuations still tracks its loans.
    fn admit(&mut self, event: &LendingEvent) -> bool {
        let concerns_subject = match self.filter.subject {
            Subject::Any => true,
            Subject::Loan(loan_id) => {
                let ours = event.loan_id() == Some(loan_id);
                if ours && event.closes_loan() {
                    debug!(loan_id, "Followed loan closed");
                    self.closed = Some(loan_id);
                }
                ours
            }
            Subject::Token(token_id) => match event {
                LendingEvent::LoanCreated {
                    loan_id,
                    token_id: backing,
                    ..
                } if *backing == token_id => {
                    self.open_loans.insert(*loan_id);
                    true
                }
                LendingEvent::ValuationUsed {
                    token_id: valued, ..
                } => *valued == token_id,
                _ if event.closes_loan() => event
                    .loan_id()
                    .is_some_and(|loan_id| self.open_loans.remove(&loan_id)),
                _ => false,
            },
        };

        concerns_subject && self.filter.accepts_topic(event)
    }

    fn lagged(&mut self, skipped: u64) {
        self.missed = self.missed.saturating_add(skipped);
        warn!(
            skipped,
            subject = ?self.filter.subject,
            "Subscriber lagged, events dropped"
        );
    }
}
