//! Signals emitted by ledger transactions.

use super::entities::LoanId;
use serde::{Deserialize, Serialize};

// The bus and the ledger log carry the same values
pub use shared_bus::LendingEvent;

/// Outcome of an accepted transaction: the signals it emitted, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub events: Vec<LendingEvent>,
}

impl Receipt {
    /// Receipt carrying a single signal.
    pub fn single(event: LendingEvent) -> Self {
        Self {
            events: vec![event],
        }
    }

    /// Id of the loan created by this transaction, if any.
    pub fn created_loan_id(&self) -> Option<LoanId> {
        self.events.iter().find_map(|e| match e {
            LendingEvent::LoanCreated { loan_id, .. } => Some(*loan_id),
            _ => None,
        })
    }
}
