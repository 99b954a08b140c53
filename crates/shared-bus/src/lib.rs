//! # Shared Bus - Event Bus for Lending Signals
//!
//! Carries the signals emitted by the loan ledger to any number of
//! off-ledger consumers (dashboards, indexers, notification services).
//! [`LendingEvent`] is defined here once; the ledger records and publishes
//! the same values.
//!
//! | Filter | Delivers | Ends |
//! |--------|----------|------|
//! | `EventFilter::all()` / `topics(..)` | every event on the topics | when the bus drops |
//! | `EventFilter::loan(id)` | one loan's lifecycle | after `LoanRepaid` / `LoanLiquidated` |
//! | `EventFilter::token(id)` | valuations and loans backed by one token | when the bus drops |
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ Loan Ledger  │                    │  Dashboard   │
//! │              │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! Delivery is best-effort: the ledger's own event log is the record of
//! truth, and a slow subscriber that lags simply misses events.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, LendingEvent, Subject};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before old events are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
