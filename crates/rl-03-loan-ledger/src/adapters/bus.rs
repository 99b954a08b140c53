//! Event bus adapter for the Loan Ledger.
//!
//! Forwards the signals of accepted transactions to the shared bus so that
//! off-ledger consumers can follow topics, loans or tokens. Delivery is
//! best-effort; the ledger's own event log stays authoritative.

use crate::domain::Receipt;
use shared_bus::EventPublisher;
use std::sync::Arc;
use tracing::debug;

/// Publishes ledger receipts to the shared bus.
#[derive(Clone)]
pub struct LedgerBusAdapter {
    bus: Arc<dyn EventPublisher>,
}

impl LedgerBusAdapter {
    pub fn new(bus: Arc<dyn EventPublisher>) -> Self {
        Self { bus }
    }

    /// Publish every signal of `receipt` in order.
    ///
    /// Returns the total number of deliveries across all signals.
    pub async fn forward(&self, receipt: &Receipt) -> usize {
        let delivered = self.bus.publish_all(&receipt.events).await;
        debug!(
            events = receipt.events.len(),
            loan_id = ?receipt.created_loan_id(),
            delivered,
            "Forwarded ledger receipt"
        );
        delivered
    }
}
