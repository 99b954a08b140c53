//! # Event Publisher
//!
//! The ledger side of the bus. Publishing never fails: an event nobody is
//! listening for is counted and dropped.

use crate::events::{EventFilter, EventTopic, LendingEvent};
use crate::subscriber::Subscription;
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::debug;

/// Sink for ledger signals.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish one event. Returns the number of live subscriptions it reached.
    async fn publish(&self, event: LendingEvent) -> usize;

    /// Publish the signals of one transaction in order.
    ///
    /// Returns the total number of deliveries.
    async fn publish_all(&self, events: &[LendingEvent]) -> usize {
        let mut delivered = 0;
        for event in events {
            delivered += self.publish(event.clone()).await;
        }
        delivered
    }

    /// Total events accepted for publishing.
    fn events_published(&self) -> u64;
}

/// Broadcast bus backed by `tokio::sync::broadcast`.
///
/// Every subscription sees every event and filters on receive, so a slow
/// subscriber lags independently of the others.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<LendingEvent>,
    loan_events: AtomicU64,
    valuation_events: AtomicU64,
}

impl InMemoryEventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Bus buffering at most `capacity` events per subscription.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            loan_events: AtomicU64::new(0),
            valuation_events: AtomicU64::new(0),
        }
    }

    /// Subscribe from now on. Events published earlier are not replayed.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, subject = ?filter.subject, "New subscription");
        Subscription::new(self.sender.subscribe(), filter)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Events published on `topic` so far.
    #[must_use]
    pub fn published_on(&self, topic: EventTopic) -> u64 {
        self.counter(topic).load(Ordering::Relaxed)
    }

    fn counter(&self, topic: EventTopic) -> &AtomicU64 {
        match topic {
            EventTopic::Loans => &self.loan_events,
            EventTopic::Valuations => &self.valuation_events,
        }
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: LendingEvent) -> usize {
        let topic = event.topic();
        let loan_id = event.loan_id();
        self.counter(topic).fetch_add(1, Ordering::Relaxed);

        // An error only means there are no receivers
        let receivers = self.sender.send(event).unwrap_or(0);
        debug!(topic = ?topic, loan_id = ?loan_id, receivers, "Lending event published");
        receivers
    }

    fn events_published(&self) -> u64 {
        self.published_on(EventTopic::Loans) + self.published_on(EventTopic::Valuations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::U256;

    fn repaid(loan_id: u64) -> LendingEvent {
        LendingEvent::LoanRepaid {
            loan_id,
            total_paid: U256::from(73u64),
        }
    }

    fn valuation_used() -> LendingEvent {
        LendingEvent::ValuationUsed {
            token_id: U256::one(),
            valuation_wei: U256::from(100u64),
            amount: U256::from(70u64),
        }
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_counted() {
        let bus = InMemoryEventBus::new();

        assert_eq!(bus.publish(repaid(2)).await, 0);
        assert_eq!(bus.events_published(), 1);
        assert_eq!(bus.published_on(EventTopic::Loans), 1);
    }

    #[tokio::test]
    async fn test_every_subscription_receives_the_broadcast() {
        let bus = InMemoryEventBus::new();
        let _all = bus.subscribe(EventFilter::all());
        let _loan = bus.subscribe(EventFilter::loan(9));
        let _token = bus.subscribe(EventFilter::token(U256::one()));

        // Filtering happens on receive
        assert_eq!(bus.publish(repaid(2)).await, 3);
        assert_eq!(bus.subscriber_count(), 3);
    }

    #[tokio::test]
    async fn test_publish_all_keeps_order_and_counts_topics() {
        let bus = InMemoryEventBus::new();
        let mut sub = bus.subscribe(EventFilter::all());

        let delivered = bus.publish_all(&[valuation_used(), repaid(2)]).await;

        assert_eq!(delivered, 2);
        assert_eq!(bus.published_on(EventTopic::Valuations), 1);
        assert_eq!(bus.published_on(EventTopic::Loans), 1);
        assert_eq!(sub.try_recv(), Ok(Some(valuation_used())));
        assert_eq!(sub.try_recv(), Ok(Some(repaid(2))));
    }

    #[test]
    fn test_dropped_subscription_detaches() {
        let bus = InMemoryEventBus::default();
        {
            let _sub = bus.subscribe(EventFilter::all());
            assert_eq!(bus.subscriber_count(), 1);
        }
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.events_published(), 0);
    }
}
